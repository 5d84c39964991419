use std::path::PathBuf;

/// All domain errors for datalog.
///
/// Each variant provides enough context to diagnose the issue
/// without needing a debugger. Any of them aborts the enclosing
/// transaction: when an action fails, neither its data change nor its
/// log record is kept.
#[derive(Debug, thiserror::Error)]
pub enum DatalogError {
    #[error(
        "Invalid arguments for '{operation}': {detail}\n\n  \
         Actions only accept a flat object of named arguments,\n  \
         e.g. {{\"comment_uuid\": \"...\", \"text\": \"...\"}}."
    )]
    ArgumentShape { operation: String, detail: String },

    #[error(
        "Action '{name}' is not registered\n\n  \
         Available actions: {available}\n  \
         Run 'datalog actions' to list them."
    )]
    UnknownAction { name: String, available: String },

    #[error("Action '{name}' is already registered")]
    DuplicateAction { name: String },

    #[error(
        "{operation} expected to affect {expected} row(s) for {key}, but affected {actual}\n\n  \
         The target may have been deleted or never existed.\n  \
         Nothing was written. Re-read the current state before retrying."
    )]
    RowCountMismatch {
        operation: String,
        key: String,
        expected: usize,
        actual: usize,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Encoding error: {detail}")]
    Encoding { detail: String },

    #[error(
        "Database not found: {path}\n\n  \
         Run 'datalog init' to create it."
    )]
    DatabaseNotFound { path: PathBuf },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(
        "This project uses format version {project_version}, but your datalog \
         only supports up to version {supported_version}.\n\n  \
         Solutions:\n    \
         → Update datalog: cargo install datalog --force"
    )]
    FormatVersionTooNew {
        project_version: u32,
        supported_version: u32,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for DatalogError {
    fn from(e: serde_json::Error) -> Self {
        DatalogError::Encoding {
            detail: e.to_string(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DatalogError>;
