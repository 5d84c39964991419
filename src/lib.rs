//! # datalog
//!
//! Records a changelog of write operations ("actions") next to the data they
//! change. Every action runs in one transaction together with the insert of
//! its log record: either both are kept or neither is.
//!
//! ## Example
//!
//! ```no_run
//! use datalog::{perform, ChangeLog, CreateComment, SqliteStore, SourceTag};
//! use uuid::Uuid;
//!
//! # fn main() -> datalog::Result<()> {
//! let mut store = SqliteStore::open("datalog.db", SourceTag::default())?;
//! let comment = perform(
//!     &mut store,
//!     &CreateComment {
//!         target_uuid: Uuid::new_v4(),
//!         author_uuid: Uuid::new_v4(),
//!         text: "first!".into(),
//!     },
//! )?;
//!
//! let log = store.records(None, None)?;
//! assert_eq!(log.last().unwrap().operation_name, "create_comment");
//! # let _ = comment;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod config;
pub mod core;

pub use crate::adapters::store::sqlite_store::SqliteStore;
pub use crate::adapters::store::sqlite_transaction::SqliteTransaction;
pub use crate::core::actions::comment_actions::{
    CreateComment, DeleteComment, EditComment, StoreCommentView,
};
pub use crate::core::actions::registry::ActionRegistry;
pub use crate::core::errors::{DatalogError, Result};
pub use crate::core::models::comment::Comment;
pub use crate::core::models::comment_view::CommentView;
pub use crate::core::models::log_record::{LogRecord, SourceTag};
pub use crate::core::services::action_runner::{perform, perform_in};
pub use crate::core::traits::action::Action;
pub use crate::core::traits::change_log::ChangeLog;
pub use crate::core::traits::unit_of_work::{TransactionalStore, UnitOfWork};
