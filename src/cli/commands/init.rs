use datalog::SqliteStore;
use datalog::config::app_config::{AppConfig, default_config_toml};
use datalog::core::errors::{DatalogError, Result};

use crate::cli::{context, output};

/// Execute the `datalog init` command.
///
/// Creates the datalog directory, writes a default `config.toml` and
/// creates the database schema.
pub fn execute() -> Result<()> {
    let datalog_dir = context::datalog_dir();

    if datalog_dir.join("config.toml").exists() {
        return Err(DatalogError::InvalidConfig {
            detail: format!(
                "datalog is already initialized in this project ({} exists)",
                datalog_dir.display()
            ),
        });
    }

    output::header("datalog — Initializing project");

    std::fs::create_dir_all(datalog_dir)?;
    output::success(&format!("Created {}/", datalog_dir.display()));

    std::fs::write(datalog_dir.join("config.toml"), default_config_toml())?;
    output::success("Generated config.toml with defaults");

    let config = AppConfig::load(datalog_dir)?;
    let db_path = config.database_path(datalog_dir);
    SqliteStore::open(&db_path, config.source_tag())?;
    output::success(&format!("Created database {}", db_path.display()));

    Ok(())
}
