pub mod action_runner;
