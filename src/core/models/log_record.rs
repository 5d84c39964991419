use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::clock;
use crate::core::errors::Result;

/// Identifies the system (and its version) that performed an operation.
///
/// Set by the environment when the store is opened, never by an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTag {
    pub source: String,
    pub source_version: String,
}

impl SourceTag {
    pub fn new(source: impl Into<String>, source_version: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            source_version: source_version.into(),
        }
    }
}

impl Default for SourceTag {
    fn default() -> Self {
        Self::new("datalog", env!("CARGO_PKG_VERSION"))
    }
}

/// A single entry in the change log.
///
/// Stores a denormalized copy of the arguments an action was called with,
/// so it stays meaningful after the rows it touched change or disappear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub operation_uuid: Uuid,
    pub operation_name: String,
    pub source: String,
    pub source_version: String,
    pub created_ts: DateTime<Utc>,
    /// The action's named arguments as a JSON object.
    pub data: String,
    /// Reserved for linking nested actions into one changeset. Always `None`
    /// for now: a nested action is logged as an independent record.
    pub parent_operation_uuid: Option<Uuid>,
}

impl LogRecord {
    /// Create a record for `operation_name` with a fresh id and timestamp.
    pub fn new(operation_name: impl Into<String>, data: String, source: &SourceTag) -> Self {
        Self {
            operation_uuid: Uuid::new_v4(),
            operation_name: operation_name.into(),
            source: source.source.clone(),
            source_version: source.source_version.clone(),
            created_ts: clock::now(),
            data,
            parent_operation_uuid: None,
        }
    }

    /// Decode the stored arguments.
    pub fn arguments(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.data)?)
    }
}
