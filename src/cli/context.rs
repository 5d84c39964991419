use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use datalog::config::app_config::DATALOG_DIR;

static DATALOG_DIR_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Initialize the global datalog directory path.
/// If `custom` is provided, uses that path; otherwise defaults to `.datalog`.
pub fn init(custom: Option<&str>) {
    let dir = custom
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DATALOG_DIR));
    let _ = DATALOG_DIR_PATH.set(dir);
}

/// Get the current datalog directory path.
pub fn datalog_dir() -> &'static Path {
    DATALOG_DIR_PATH
        .get()
        .map(|p| p.as_path())
        .unwrap_or(Path::new(DATALOG_DIR))
}
