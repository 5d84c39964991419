use datalog::core::errors::{DatalogError, Result};
use datalog::{ActionRegistry, SqliteStore};

use super::store_helpers::open_store;
use crate::cli::output;

/// Execute the `datalog run` command.
///
/// Dispatches to a registered action by name. `args` is parsed as JSON
/// before the store is touched, so malformed input never starts a
/// transaction.
pub fn execute(name: &str, args: &str) -> Result<()> {
    let args: serde_json::Value =
        serde_json::from_str(args).map_err(|e| DatalogError::ArgumentShape {
            operation: name.to_string(),
            detail: format!("arguments are not valid JSON: {e}"),
        })?;

    let registry = ActionRegistry::<SqliteStore>::with_comment_actions();
    let mut store = open_store()?;
    let result = registry.dispatch(&mut store, name, args)?;

    output::success(&format!("{name} committed"));
    if !result.is_null() {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(())
}
