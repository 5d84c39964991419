//! SQLite-backed storage for comments, comment views and the change log.
//!
//! # Schema
//!
//! - `comment`: (comment_uuid, target_uuid, author_uuid, text, created_ts)
//! - `comment_view`: (view_uuid, comment_uuid, viewer_uuid, created_ts)
//! - `data_log`: (operation_uuid, operation_name, source, source_version,
//!   created_ts, data, parent_operation_uuid)
//!
//! UUIDs are stored in their canonical hyphenated form and timestamps as
//! fixed-width RFC 3339 UTC text, so ordering by `created_ts` is
//! chronological. `comment_view` has no foreign key to `comment`: views of a
//! deleted comment are kept. `data_log` and `comment_view` are append-only,
//! enforced by triggers.
//!
//! Reads go through `SqliteStore` directly. Writes only happen inside a
//! `SqliteTransaction`, handed out by `begin`.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};
use uuid::Uuid;

use super::sqlite_transaction::SqliteTransaction;
use crate::core::errors::Result;
use crate::core::models::comment::Comment;
use crate::core::models::comment_view::CommentView;
use crate::core::models::log_record::{LogRecord, SourceTag};
use crate::core::traits::change_log::ChangeLog;
use crate::core::traits::unit_of_work::TransactionalStore;

/// Default database filename inside the datalog directory.
pub const DEFAULT_DB_FILENAME: &str = "datalog.db";

/// Default time to wait for another writer to release its lock.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS comment (
        comment_uuid TEXT PRIMARY KEY,
        target_uuid TEXT NOT NULL,
        author_uuid TEXT NOT NULL,
        text TEXT NOT NULL,
        created_ts TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS comment_view (
        view_uuid TEXT PRIMARY KEY,
        comment_uuid TEXT NOT NULL,
        viewer_uuid TEXT NOT NULL,
        created_ts TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS data_log (
        operation_uuid TEXT PRIMARY KEY,
        operation_name TEXT NOT NULL,
        source TEXT NOT NULL,
        source_version TEXT NOT NULL,
        created_ts TEXT NOT NULL,
        data TEXT NOT NULL,
        parent_operation_uuid TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_comment_target ON comment(target_uuid);
    CREATE INDEX IF NOT EXISTS idx_comment_view_comment ON comment_view(comment_uuid);
    CREATE INDEX IF NOT EXISTS idx_data_log_created ON data_log(created_ts);

    CREATE TRIGGER IF NOT EXISTS data_log_no_update BEFORE UPDATE ON data_log
    BEGIN SELECT RAISE(ABORT, 'data_log is append-only'); END;

    CREATE TRIGGER IF NOT EXISTS data_log_no_delete BEFORE DELETE ON data_log
    BEGIN SELECT RAISE(ABORT, 'data_log is append-only'); END;

    CREATE TRIGGER IF NOT EXISTS comment_view_no_update BEFORE UPDATE ON comment_view
    BEGIN SELECT RAISE(ABORT, 'comment_view is append-only'); END;

    CREATE TRIGGER IF NOT EXISTS comment_view_no_delete BEFORE DELETE ON comment_view
    BEGIN SELECT RAISE(ABORT, 'comment_view is append-only'); END;
"#;

const COMMENT_COLUMNS: &str = "comment_uuid, target_uuid, author_uuid, text, created_ts";
const VIEW_COLUMNS: &str = "view_uuid, comment_uuid, viewer_uuid, created_ts";
const LOG_COLUMNS: &str = "operation_uuid, operation_name, source, source_version, \
                           created_ts, data, parent_operation_uuid";

/// SQLite database holding the domain tables and the change log.
pub struct SqliteStore {
    conn: Connection,
    source: SourceTag,
}

impl SqliteStore {
    /// Open (or create) the database at `path`.
    ///
    /// Creates the schema if it doesn't exist and enables WAL mode so readers
    /// in other processes don't block the writer.
    pub fn open(path: impl AsRef<Path>, source: SourceTag) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;

        let store = Self { conn, source };
        store.create_schema()?;
        tracing::debug!(path = %path.as_ref().display(), "opened datalog store");
        Ok(store)
    }

    /// Open a private in-memory database. Everything is lost on drop.
    pub fn open_in_memory(source: SourceTag) -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
            source,
        };
        store.create_schema()?;
        Ok(store)
    }

    /// Change how long a write waits on another process's lock before failing.
    pub fn set_busy_timeout(&self, timeout: Duration) -> Result<()> {
        self.conn.busy_timeout(timeout)?;
        Ok(())
    }

    /// The source tag stamped on log records written through this store.
    pub fn source(&self) -> &SourceTag {
        &self.source
    }

    fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Look up a comment by id.
    pub fn get_comment(&self, comment_uuid: &Uuid) -> Result<Option<Comment>> {
        let sql = format!("SELECT {COMMENT_COLUMNS} FROM comment WHERE comment_uuid = ?1");
        let comment = self
            .conn
            .query_row(&sql, [comment_uuid.to_string()], comment_from_row)
            .optional()?;
        Ok(comment)
    }

    /// All comments in creation order, optionally only those on `target`.
    pub fn list_comments(&self, target: Option<&Uuid>) -> Result<Vec<Comment>> {
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comment \
             WHERE (?1 IS NULL OR target_uuid = ?1) \
             ORDER BY created_ts, rowid"
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([target.map(Uuid::to_string)], comment_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    /// All comment views in creation order, optionally only those of `comment`.
    pub fn list_comment_views(&self, comment: Option<&Uuid>) -> Result<Vec<CommentView>> {
        let sql = format!(
            "SELECT {VIEW_COLUMNS} FROM comment_view \
             WHERE (?1 IS NULL OR comment_uuid = ?1) \
             ORDER BY created_ts, rowid"
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([comment.map(Uuid::to_string)], view_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn count_comments(&self) -> Result<usize> {
        self.count("comment")
    }

    pub fn count_comment_views(&self) -> Result<usize> {
        self.count("comment_view")
    }

    fn count(&self, table: &str) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })?;
        Ok(usize::try_from(n).unwrap_or_default())
    }
}

impl TransactionalStore for SqliteStore {
    type Tx<'a> = SqliteTransaction<'a>;

    /// Start an immediate transaction, taking the write lock up front so a
    /// row-count check and the write that follows it see the same state.
    fn begin(&mut self) -> Result<SqliteTransaction<'_>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        Ok(SqliteTransaction::new(tx, &self.source))
    }
}

impl ChangeLog for SqliteStore {
    fn records(
        &self,
        operation: Option<&str>,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<LogRecord>> {
        let sql = format!(
            "SELECT {LOG_COLUMNS} FROM data_log \
             WHERE (?1 IS NULL OR operation_name = ?1) \
               AND (?2 IS NULL OR created_ts >= ?2) \
             ORDER BY created_ts, rowid"
        );
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(
            params![operation, since.as_ref().map(format_ts)],
            log_record_from_row,
        )?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    fn record_count(&self) -> Result<usize> {
        self.count("data_log")
    }
}

/// Fixed-width UTC timestamp; lexical order equals chronological order.
pub(super) fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn ts_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        comment_uuid: uuid_column(row, 0)?,
        target_uuid: uuid_column(row, 1)?,
        author_uuid: uuid_column(row, 2)?,
        text: row.get(3)?,
        created_ts: ts_column(row, 4)?,
    })
}

fn view_from_row(row: &Row<'_>) -> rusqlite::Result<CommentView> {
    Ok(CommentView {
        view_uuid: uuid_column(row, 0)?,
        comment_uuid: uuid_column(row, 1)?,
        viewer_uuid: uuid_column(row, 2)?,
        created_ts: ts_column(row, 3)?,
    })
}

fn log_record_from_row(row: &Row<'_>) -> rusqlite::Result<LogRecord> {
    let parent: Option<String> = row.get(6)?;
    let parent_operation_uuid = parent
        .map(|raw| {
            Uuid::parse_str(&raw)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))
        })
        .transpose()?;

    Ok(LogRecord {
        operation_uuid: uuid_column(row, 0)?,
        operation_name: row.get(1)?,
        source: row.get(2)?,
        source_version: row.get(3)?,
        created_ts: ts_column(row, 4)?,
        data: row.get(5)?,
        parent_operation_uuid,
    })
}
