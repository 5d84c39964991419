use datalog::SqliteStore;
use datalog::config::app_config::AppConfig;
use datalog::core::errors::{DatalogError, Result};

use crate::cli::context;

/// Open the project's store using `.datalog/config.toml`.
///
/// Fails if datalog has not been initialized here; the database is never
/// created implicitly outside of `datalog init`.
pub fn open_store() -> Result<SqliteStore> {
    let datalog_dir = context::datalog_dir();
    if !datalog_dir.exists() {
        return Err(DatalogError::InvalidConfig {
            detail: "datalog not initialized. Run 'datalog init' first.".into(),
        });
    }

    let config = AppConfig::load(datalog_dir)?;
    let db_path = config.database_path(datalog_dir);
    if !db_path.exists() {
        return Err(DatalogError::DatabaseNotFound { path: db_path });
    }

    let store = SqliteStore::open(&db_path, config.source_tag())?;
    store.set_busy_timeout(config.busy_timeout())?;
    Ok(store)
}
