pub mod commands;
pub mod context;
pub mod output;

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Atomic, logged write actions over a small relational store.
#[derive(Parser, Debug)]
#[command(name = "datalog", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to an alternative datalog directory
    #[arg(long, global = true, env = "DATALOG_DIR")]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize datalog in the current project
    Init,

    /// Create, edit, delete and view comments
    Comment {
        #[command(subcommand)]
        action: CommentAction,
    },

    /// Run a registered action by name with JSON arguments
    Run {
        /// Registered action name (see `datalog actions`)
        name: String,
        /// Named arguments as a JSON object
        args: String,
    },

    /// List registered actions
    Actions,

    /// Show the change log
    Log {
        /// Only show records of this operation
        #[arg(long)]
        operation: Option<String>,
        /// Filter entries since this date (ISO 8601)
        #[arg(long)]
        since: Option<String>,
        /// Show last N entries
        #[arg(long)]
        last: Option<usize>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CommentAction {
    /// Create a comment on a target
    Create {
        /// UUID of the commented-upon object
        #[arg(long)]
        target: Uuid,
        /// UUID of the author
        #[arg(long)]
        author: Uuid,
        /// Comment text
        #[arg(long)]
        text: String,
    },
    /// Replace the text of a comment
    Edit {
        /// Comment UUID
        comment: Uuid,
        /// New text
        #[arg(long)]
        text: String,
    },
    /// Delete a comment
    Delete {
        /// Comment UUID
        comment: Uuid,
    },
    /// Record that someone viewed a comment
    View {
        /// Comment UUID
        comment: Uuid,
        /// UUID of the viewer
        #[arg(long)]
        viewer: Uuid,
    },
    /// List comments
    List {
        /// Only comments on this target
        #[arg(long)]
        target: Option<Uuid>,
    },
}
