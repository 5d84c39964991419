pub mod comment_actions;
pub mod registry;
