pub mod clock;
pub mod comment;
pub mod comment_view;
pub mod log_record;
