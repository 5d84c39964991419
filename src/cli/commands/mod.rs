pub mod actions;
pub mod comment;
pub mod init;
pub mod log;
pub mod run;
pub mod store_helpers;
