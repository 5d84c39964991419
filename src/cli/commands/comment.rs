use colored::Colorize;
use datalog::core::errors::Result;
use datalog::{Comment, CreateComment, DeleteComment, EditComment, StoreCommentView, perform};

use super::store_helpers::open_store;
use crate::cli::CommentAction;
use crate::cli::output;

/// Execute a `datalog comment` subcommand.
///
/// Every write goes through its registered action, so each one lands in
/// the change log.
pub fn execute(action: &CommentAction) -> Result<()> {
    let mut store = open_store()?;

    match action {
        CommentAction::Create {
            target,
            author,
            text,
        } => {
            let comment = perform(
                &mut store,
                &CreateComment {
                    target_uuid: *target,
                    author_uuid: *author,
                    text: text.clone(),
                },
            )?;
            output::success(&format!("Created comment {}", comment.comment_uuid));
            print_comment(&comment);
        }
        CommentAction::Edit { comment, text } => {
            perform(
                &mut store,
                &EditComment {
                    comment_uuid: *comment,
                    text: text.clone(),
                },
            )?;
            output::success(&format!("Edited comment {comment}"));
        }
        CommentAction::Delete { comment } => {
            perform(
                &mut store,
                &DeleteComment {
                    comment_uuid: *comment,
                },
            )?;
            output::success(&format!("Deleted comment {comment}"));
        }
        CommentAction::View { comment, viewer } => {
            let view = perform(
                &mut store,
                &StoreCommentView {
                    comment_uuid: *comment,
                    viewer_uuid: *viewer,
                },
            )?;
            output::success(&format!("Recorded view {}", view.view_uuid));
        }
        CommentAction::List { target } => {
            let comments = store.list_comments(target.as_ref())?;
            if comments.is_empty() {
                output::header("datalog comments");
                output::warning("No comments found");
                return Ok(());
            }
            output::header(&format!("datalog comments ({})", comments.len()));
            for comment in &comments {
                println!();
                println!("  {}", comment.comment_uuid.to_string().bold());
                print_comment(comment);
            }
        }
    }

    Ok(())
}

fn print_comment(comment: &Comment) {
    output::field("target", &comment.target_uuid.to_string());
    output::field("author", &comment.author_uuid.to_string());
    output::field(
        "created",
        &comment.created_ts.format("%Y-%m-%d %H:%M:%S").to_string(),
    );
    output::field("text", &comment.text);
}
