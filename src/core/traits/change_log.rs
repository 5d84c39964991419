use chrono::{DateTime, Utc};

use crate::core::errors::Result;
use crate::core::models::log_record::LogRecord;

/// Port for reading the change log.
///
/// Writing happens only through actions; this side is read-only.
pub trait ChangeLog {
    /// All records in creation order, optionally filtered by operation name
    /// and by a lower bound on the creation timestamp.
    fn records(
        &self,
        operation: Option<&str>,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<LogRecord>>;

    /// Number of records in the log.
    fn record_count(&self) -> Result<usize>;
}
