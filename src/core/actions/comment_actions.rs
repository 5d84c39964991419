//! Actions registered by the comments domain.
//!
//! Each struct is the argument record of one action. Outside of these
//! actions the comment tables are only ever read.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::errors::{DatalogError, Result};
use crate::core::models::comment::Comment;
use crate::core::models::comment_view::CommentView;
use crate::core::traits::action::Action;
use crate::core::traits::unit_of_work::UnitOfWork;

/// Create a comment. Authors see their own comments immediately, so a view
/// by the author is recorded alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateComment {
    pub target_uuid: Uuid,
    pub author_uuid: Uuid,
    pub text: String,
}

impl Action for CreateComment {
    const NAME: &'static str = "create_comment";
    type Output = Comment;

    fn apply(&self, uow: &dyn UnitOfWork) -> Result<Comment> {
        let comment = Comment::new(self.target_uuid, self.author_uuid, self.text.clone());
        uow.insert_comment(&comment)?;
        uow.insert_comment_view(&CommentView::new(
            comment.comment_uuid,
            comment.author_uuid,
        ))?;
        Ok(comment)
    }
}

/// Replace the text of an existing comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditComment {
    pub comment_uuid: Uuid,
    pub text: String,
}

impl Action for EditComment {
    const NAME: &'static str = "edit_comment";
    type Output = ();

    fn apply(&self, uow: &dyn UnitOfWork) -> Result<()> {
        let matched = uow.update_comment_text(&self.comment_uuid, &self.text)?;
        expect_one_row(Self::NAME, &self.comment_uuid, matched)
    }
}

/// Delete a comment. Its views are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteComment {
    pub comment_uuid: Uuid,
}

impl Action for DeleteComment {
    const NAME: &'static str = "delete_comment";
    type Output = ();

    fn apply(&self, uow: &dyn UnitOfWork) -> Result<()> {
        let deleted = uow.delete_comment(&self.comment_uuid)?;
        expect_one_row(Self::NAME, &self.comment_uuid, deleted)
    }
}

/// Record that someone viewed a comment.
///
/// The comment is not checked for existence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreCommentView {
    pub comment_uuid: Uuid,
    pub viewer_uuid: Uuid,
}

impl Action for StoreCommentView {
    const NAME: &'static str = "store_comment_view";
    type Output = CommentView;

    fn apply(&self, uow: &dyn UnitOfWork) -> Result<CommentView> {
        let view = CommentView::new(self.comment_uuid, self.viewer_uuid);
        uow.insert_comment_view(&view)?;
        Ok(view)
    }
}

fn expect_one_row(operation: &str, key: &Uuid, actual: usize) -> Result<()> {
    if actual == 1 {
        Ok(())
    } else {
        Err(DatalogError::RowCountMismatch {
            operation: operation.to_string(),
            key: key.to_string(),
            expected: 1,
            actual,
        })
    }
}
