//! Update command implementation.

use crate::cli::UpdateArgs;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::format::text;
use crate::store::BugUpdate;

use super::open_workspace;

/// Execute the update command.
///
/// # Errors
///
/// Returns an error if the bug doesn't exist or a flag value cannot be
/// parsed.
pub fn execute(args: &UpdateArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (mut store, _paths) = open_workspace(cli)?;

    let assignee_id = if args.unassign {
        Some(None)
    } else {
        args.assignee.map(Some)
    };

    let updates = BugUpdate {
        title: args.title.clone(),
        description: args.description.clone().map(Some),
        steps_to_reproduce: args.steps.clone().map(Some),
        status: args.status.as_deref().map(str::parse).transpose()?,
        priority: args.priority.as_deref().map(str::parse).transpose()?,
        severity: args.severity.as_deref().map(str::parse).transpose()?,
        assignee_id,
    };

    let bug = store.update_bug(args.id, &updates)?;

    if json {
        println!("{}", crate::format::to_json_pretty(&bug)?);
    } else {
        let users = store.user_directory()?;
        println!("{}", text::bug_line(&bug, &users, false));
    }
    Ok(())
}
