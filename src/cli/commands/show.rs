//! Show command implementation.

use crate::config::CliOverrides;
use crate::error::{BugHiveError, Result};
use crate::format::text;

use super::open_workspace;

/// Execute the show command.
///
/// # Errors
///
/// Returns `BugNotFound` if the id doesn't exist.
pub fn execute(id: i64, json: bool, use_color: bool, cli: &CliOverrides) -> Result<()> {
    let (store, _paths) = open_workspace(cli)?;
    let bug = store.get_bug(id)?.ok_or(BugHiveError::BugNotFound { id })?;

    if json {
        println!("{}", crate::format::to_json_pretty(&bug)?);
    } else {
        let users = store.user_directory()?;
        print!("{}", text::bug_details(&bug, &users, use_color));
    }
    Ok(())
}
