use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::clock;

/// A record of someone viewing a single comment.
///
/// `comment_uuid` is a plain reference: deleting the comment leaves its
/// views in place, pointing at a comment that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub view_uuid: Uuid,
    pub comment_uuid: Uuid,
    pub viewer_uuid: Uuid,
    pub created_ts: DateTime<Utc>,
}

impl CommentView {
    pub fn new(comment_uuid: Uuid, viewer_uuid: Uuid) -> Self {
        Self {
            view_uuid: Uuid::new_v4(),
            comment_uuid,
            viewer_uuid,
            created_ts: clock::now(),
        }
    }
}
