//! Create command implementation.

use crate::cli::CreateArgs;
use crate::config::CliOverrides;
use crate::error::{BugHiveError, Result};
use crate::format::text;
use crate::model::Environment;
use crate::store::BugDraft;

use super::open_workspace;

/// Execute the create command.
///
/// # Errors
///
/// Returns an error if the workspace is missing, the reporter cannot be
/// resolved, or validation fails.
pub fn execute(args: &CreateArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (mut store, paths) = open_workspace(cli)?;

    let reporter_id = args
        .reporter
        .or_else(|| paths.current_user_id(cli))
        .ok_or_else(|| {
            BugHiveError::validation("reporter", "set --reporter, --user, or BUGHIVE_USER")
        })?;

    // Project default priority applies when no explicit priority given.
    let priority = match args.priority.as_deref() {
        Some(p) => p.parse()?,
        None => store
            .get_project(args.project)?
            .ok_or(BugHiveError::ProjectNotFound { id: args.project })?
            .default_priority,
    };

    let draft = BugDraft {
        title: args.title.clone(),
        description: args.description.clone(),
        steps_to_reproduce: args.steps.clone(),
        priority,
        severity: args.severity.as_deref().map(str::parse).transpose()?.unwrap_or_default(),
        assignee_id: args.assignee,
        reporter_id,
        project_id: args.project,
        environment: Environment {
            browser: args.browser.clone(),
            os: args.os.clone(),
            device: args.device.clone(),
        },
        attachments: vec![],
    };

    let bug = store.create_bug(&draft)?;

    if json {
        println!("{}", crate::format::to_json_pretty(&bug)?);
    } else {
        let users = store.user_directory()?;
        println!("{}", text::bug_line(&bug, &users, false));
    }
    Ok(())
}
