pub mod action;
pub mod change_log;
pub mod unit_of_work;
