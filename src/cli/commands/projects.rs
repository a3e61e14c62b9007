//! Projects command implementation.

use crate::cli::ProjectCommands;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::Project;

use super::open_workspace;

/// Execute a projects subcommand.
///
/// # Errors
///
/// Returns an error if the workspace is missing or the store fails.
pub fn execute(command: &ProjectCommands, json: bool, cli: &CliOverrides) -> Result<()> {
    let (mut store, _paths) = open_workspace(cli)?;

    match command {
        ProjectCommands::List => {
            let projects = store.list_projects()?;
            if json {
                println!("{}", crate::format::to_json_pretty(&projects)?);
            } else {
                for project in &projects {
                    println!(
                        "{:>4}  {:<24} {:<9} lead: {}",
                        project.id,
                        project.name,
                        project.status,
                        project
                            .lead_id
                            .map_or_else(|| "-".to_string(), |id| format!("#{id}")),
                    );
                }
            }
        }
        ProjectCommands::Add {
            name,
            description,
            lead,
            default_priority,
        } => {
            let project = store.create_project(&Project {
                id: 0,
                name: name.clone(),
                description: description.clone(),
                lead_id: *lead,
                status: Default::default(),
                team_member_ids: vec![],
                default_priority: default_priority
                    .as_deref()
                    .map(str::parse)
                    .transpose()?
                    .unwrap_or_default(),
                environments: vec![],
                created_at: None,
            })?;
            if json {
                println!("{}", crate::format::to_json_pretty(&project)?);
            } else {
                println!("Created project #{} {}", project.id, project.name);
            }
        }
    }
    Ok(())
}
