use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::clock;

/// A comment attached to some object (the target) identified by its UUID.
///
/// Identity and creation time are fixed at creation; only `text` changes
/// afterwards, through the `edit_comment` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_uuid: Uuid,
    pub target_uuid: Uuid,
    pub author_uuid: Uuid,
    pub text: String,
    pub created_ts: DateTime<Utc>,
}

impl Comment {
    /// Build a new comment with a fresh identifier and timestamp.
    pub fn new(target_uuid: Uuid, author_uuid: Uuid, text: impl Into<String>) -> Self {
        Self {
            comment_uuid: Uuid::new_v4(),
            target_uuid,
            author_uuid,
            text: text.into(),
            created_ts: clock::now(),
        }
    }
}
