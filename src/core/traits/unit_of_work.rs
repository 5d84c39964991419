use uuid::Uuid;

use crate::core::errors::Result;
use crate::core::models::comment::Comment;
use crate::core::models::comment_view::CommentView;
use crate::core::models::log_record::{LogRecord, SourceTag};

/// Marker for a savepoint opened inside a unit of work.
///
/// Savepoints nest strictly: the most recently opened one must be released
/// or rolled back before an outer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Savepoint(pub u32);

/// Port for the writes an action may perform inside one transaction.
///
/// Implementations live in `adapters::store`. Action bodies only see this
/// trait, so every write they make shares the transaction of the action
/// that logged it.
pub trait UnitOfWork {
    /// The source tag recorded on log entries written in this unit of work.
    fn source(&self) -> &SourceTag;

    /// Append a change log entry.
    fn insert_log_record(&self, record: &LogRecord) -> Result<()>;

    /// Insert a new comment row.
    fn insert_comment(&self, comment: &Comment) -> Result<()>;

    /// Set the text of the comment with the given id. Returns the number of
    /// rows matched.
    fn update_comment_text(&self, comment_uuid: &Uuid, text: &str) -> Result<usize>;

    /// Delete the comment with the given id. Returns the number of rows deleted.
    fn delete_comment(&self, comment_uuid: &Uuid) -> Result<usize>;

    /// Insert a new comment view row.
    fn insert_comment_view(&self, view: &CommentView) -> Result<()>;

    /// Open a nested savepoint within the current transaction.
    fn savepoint(&self) -> Result<Savepoint>;

    /// Keep the writes made since `savepoint`; they commit with the enclosing
    /// transaction.
    fn release(&self, savepoint: Savepoint) -> Result<()>;

    /// Undo every write made since `savepoint` and close it.
    fn rollback_to(&self, savepoint: Savepoint) -> Result<()>;

    /// Commit the whole unit of work. Dropping it without committing rolls
    /// everything back.
    fn commit(self) -> Result<()>
    where
        Self: Sized;
}

/// Port for a store that can hand out units of work.
pub trait TransactionalStore {
    type Tx<'a>: UnitOfWork
    where
        Self: 'a;

    /// Begin a new top-level transaction.
    fn begin(&mut self) -> Result<Self::Tx<'_>>;
}
