use std::cell::Cell;

use rusqlite::{Transaction, params};
use uuid::Uuid;

use super::sqlite_store::format_ts;
use crate::core::errors::Result;
use crate::core::models::comment::Comment;
use crate::core::models::comment_view::CommentView;
use crate::core::models::log_record::{LogRecord, SourceTag};
use crate::core::traits::unit_of_work::{Savepoint, UnitOfWork};

/// One SQLite transaction, with nested savepoints for joined actions.
///
/// Dropping it without calling `commit` rolls everything back.
pub struct SqliteTransaction<'a> {
    tx: Transaction<'a>,
    source: &'a SourceTag,
    depth: Cell<u32>,
}

impl<'a> SqliteTransaction<'a> {
    pub(super) fn new(tx: Transaction<'a>, source: &'a SourceTag) -> Self {
        Self {
            tx,
            source,
            depth: Cell::new(0),
        }
    }

    fn savepoint_name(savepoint: Savepoint) -> String {
        format!("action_{}", savepoint.0)
    }

    fn close(&self, savepoint: Savepoint) {
        debug_assert_eq!(
            savepoint.0,
            self.depth.get(),
            "savepoints must be closed innermost first"
        );
        self.depth.set(savepoint.0.saturating_sub(1));
    }
}

impl UnitOfWork for SqliteTransaction<'_> {
    fn source(&self) -> &SourceTag {
        self.source
    }

    fn insert_log_record(&self, record: &LogRecord) -> Result<()> {
        self.tx.execute(
            "INSERT INTO data_log (operation_uuid, operation_name, source, source_version, \
                                   created_ts, data, parent_operation_uuid) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.operation_uuid.to_string(),
                record.operation_name,
                record.source,
                record.source_version,
                format_ts(&record.created_ts),
                record.data,
                record.parent_operation_uuid.map(|p| p.to_string()),
            ],
        )?;
        Ok(())
    }

    fn insert_comment(&self, comment: &Comment) -> Result<()> {
        self.tx.execute(
            "INSERT INTO comment (comment_uuid, target_uuid, author_uuid, text, created_ts) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                comment.comment_uuid.to_string(),
                comment.target_uuid.to_string(),
                comment.author_uuid.to_string(),
                comment.text,
                format_ts(&comment.created_ts),
            ],
        )?;
        Ok(())
    }

    fn update_comment_text(&self, comment_uuid: &Uuid, text: &str) -> Result<usize> {
        let matched = self.tx.execute(
            "UPDATE comment SET text = ?1 WHERE comment_uuid = ?2",
            params![text, comment_uuid.to_string()],
        )?;
        Ok(matched)
    }

    fn delete_comment(&self, comment_uuid: &Uuid) -> Result<usize> {
        let deleted = self.tx.execute(
            "DELETE FROM comment WHERE comment_uuid = ?1",
            params![comment_uuid.to_string()],
        )?;
        Ok(deleted)
    }

    fn insert_comment_view(&self, view: &CommentView) -> Result<()> {
        self.tx.execute(
            "INSERT INTO comment_view (view_uuid, comment_uuid, viewer_uuid, created_ts) \
             VALUES (?1, ?2, ?3, ?4)",
            params![
                view.view_uuid.to_string(),
                view.comment_uuid.to_string(),
                view.viewer_uuid.to_string(),
                format_ts(&view.created_ts),
            ],
        )?;
        Ok(())
    }

    fn savepoint(&self) -> Result<Savepoint> {
        let savepoint = Savepoint(self.depth.get() + 1);
        self.tx
            .execute_batch(&format!("SAVEPOINT {}", Self::savepoint_name(savepoint)))?;
        self.depth.set(savepoint.0);
        Ok(savepoint)
    }

    fn release(&self, savepoint: Savepoint) -> Result<()> {
        self.tx.execute_batch(&format!(
            "RELEASE SAVEPOINT {}",
            Self::savepoint_name(savepoint)
        ))?;
        self.close(savepoint);
        Ok(())
    }

    fn rollback_to(&self, savepoint: Savepoint) -> Result<()> {
        let name = Self::savepoint_name(savepoint);
        self.tx
            .execute_batch(&format!("ROLLBACK TO SAVEPOINT {name}; RELEASE SAVEPOINT {name}"))?;
        self.close(savepoint);
        Ok(())
    }

    fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}
