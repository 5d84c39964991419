use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::adapters::store::sqlite_store::{DEFAULT_BUSY_TIMEOUT, DEFAULT_DB_FILENAME};
use crate::core::errors::{DatalogError, Result};
use crate::core::models::log_record::SourceTag;

/// Name of the directory holding the config file and the database.
pub const DATALOG_DIR: &str = ".datalog";

/// Top-level datalog configuration read from `.datalog/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub datalog: DatalogSection,
    pub source: Option<SourceSection>,
}

impl AppConfig {
    /// Load the configuration from `{datalog_dir}/config.toml`.
    ///
    /// After parsing, validates the database filename so a config file
    /// cannot point the store outside its directory.
    pub fn load(datalog_dir: &Path) -> Result<Self> {
        let config_path = datalog_dir.join("config.toml");
        if !config_path.exists() {
            return Err(DatalogError::InvalidConfig {
                detail: "config.toml not found. Run 'datalog init' first.".into(),
            });
        }
        let content = std::fs::read_to_string(&config_path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| DatalogError::InvalidConfig {
            detail: format!("Failed to parse config.toml: {e}"),
        })?;

        if config.datalog.format_version > CURRENT_FORMAT_VERSION {
            return Err(DatalogError::FormatVersionTooNew {
                project_version: config.datalog.format_version,
                supported_version: CURRENT_FORMAT_VERSION,
            });
        }

        validate_simple_filename(&config.datalog.database, "database file")?;

        Ok(config)
    }

    /// Path of the SQLite database, relative to `datalog_dir`.
    pub fn database_path(&self, datalog_dir: &Path) -> PathBuf {
        datalog_dir.join(&self.datalog.database)
    }

    /// How long a write waits for another process's lock.
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.datalog.busy_timeout_ms)
    }

    /// Source tag stamped on every log record, defaulting to this binary.
    pub fn source_tag(&self) -> SourceTag {
        match &self.source {
            Some(s) => SourceTag::new(&s.name, &s.version),
            None => SourceTag::default(),
        }
    }
}

/// Current format version supported by this build of datalog.
pub const CURRENT_FORMAT_VERSION: u32 = 1;

/// The `[datalog]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DatalogSection {
    pub version: String,
    /// Format version for backward compatibility. Defaults to 1 if missing.
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_format_version() -> u32 {
    1
}

fn default_database() -> String {
    DEFAULT_DB_FILENAME.to_string()
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT.as_millis() as u64
}

/// The optional `[source]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSection {
    pub name: String,
    pub version: String,
}

/// Default `config.toml` written by `datalog init`.
pub fn default_config_toml() -> String {
    format!(
        r#"[datalog]
version = "{version}"
format_version = {CURRENT_FORMAT_VERSION}
database = "{DEFAULT_DB_FILENAME}"
busy_timeout_ms = {timeout}

# Stamped on every change log record. Defaults to this binary.
# [source]
# name = "datalog"
# version = "{version}"
"#,
        version = env!("CARGO_PKG_VERSION"),
        timeout = default_busy_timeout_ms(),
    )
}

/// Reject anything but a plain file name (no directories, no `..`).
pub fn validate_simple_filename(name: &str, what: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if invalid {
        return Err(DatalogError::InvalidConfig {
            detail: format!("Invalid {what} name '{name}': must be a plain file name"),
        });
    }
    Ok(())
}
