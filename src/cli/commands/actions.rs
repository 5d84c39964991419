use datalog::core::errors::Result;
use datalog::{ActionRegistry, SqliteStore};

use crate::cli::output;

/// Execute the `datalog actions` command.
pub fn execute() -> Result<()> {
    let registry = ActionRegistry::<SqliteStore>::with_comment_actions();

    output::header("Registered actions");
    for name in registry.names() {
        println!("  {name}");
    }
    Ok(())
}
