//! Init command implementation.

use crate::config;
use crate::error::Result;
use crate::store::SqliteStore;
use std::env;
use tracing::info;

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the workspace already exists (without `--force`)
/// or the database cannot be created.
pub fn execute(force: bool, json: bool) -> Result<()> {
    let root = env::current_dir()?;
    let paths = config::init_workspace(&root, force)?;

    // Create the database and apply the schema eagerly so the first
    // real command doesn't pay for it.
    let _store = SqliteStore::open(&paths.db_path)?;

    info!(dir = %paths.bughive_dir.display(), "initialized workspace");

    if json {
        let out = serde_json::json!({
            "initialized": true,
            "dir": paths.bughive_dir.display().to_string(),
            "database": paths.db_path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Initialized bughive workspace at {}", paths.bughive_dir.display());
    }
    Ok(())
}
