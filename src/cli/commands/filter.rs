//! Filter command implementation.

use crate::cli::{FilterCommands, FilterEditArgs, FilterSaveArgs};
use crate::config::CliOverrides;
use crate::error::Result;
use crate::filter::saved::FilterManager;
use crate::format::text;
use crate::model::SavedFilter;

use super::{criteria_from_flags, open_workspace};

/// Execute a filter subcommand.
///
/// # Errors
///
/// Returns an error if the workspace is missing, the filter doesn't
/// exist, or a preset mutation is attempted.
pub fn execute(command: &FilterCommands, json: bool, cli: &CliOverrides) -> Result<()> {
    let (mut store, paths) = open_workspace(cli)?;
    let current_user = paths.current_user_id(cli);
    let mut manager = FilterManager::new(&mut store, &paths.active_filter_path, current_user);

    match command {
        FilterCommands::List => {
            let filters = manager.list_filters()?;
            print_filters(&filters, json)?;
        }
        FilterCommands::Save(args) => {
            let criteria = save_args_criteria(args)?;
            let saved = manager.save_filter(&args.name, &criteria)?;
            if json {
                println!("{}", crate::format::to_json_pretty(&saved)?);
            } else {
                println!("Saved filter #{} {}", saved.id, saved.name);
            }
        }
        FilterCommands::Delete { id } => {
            manager.delete_filter(*id)?;
            if json {
                println!("{}", serde_json::json!({"deleted": id}));
            } else {
                println!("Deleted filter #{id}");
            }
        }
        FilterCommands::Edit(args) => {
            let replacement = edit_args_criteria(args)?;
            let updated = manager.update_filter(args.id, &args.name, replacement.as_ref())?;
            if json {
                println!("{}", crate::format::to_json_pretty(&updated)?);
            } else {
                println!("Updated filter, now #{} {}", updated.id, updated.name);
            }
        }
        FilterCommands::Apply { id } => {
            let filter = manager.get_filter(*id)?;
            manager.save_active(&filter)?;
            if json {
                println!("{}", crate::format::to_json_pretty(&filter)?);
            } else {
                println!("Applied filter #{} {}", filter.id, filter.name);
            }
        }
        FilterCommands::Active => match manager.load_active()? {
            Some(active) => {
                if json {
                    println!("{}", crate::format::to_json_pretty(&active)?);
                } else {
                    println!("Active filter: #{} {}", active.filter_id, active.name);
                }
            }
            None => {
                if json {
                    println!("null");
                } else {
                    println!("No active filter.");
                }
            }
        },
        FilterCommands::Clear => {
            manager.clear_active()?;
            if !json {
                println!("Cleared active filter.");
            }
        }
    }
    Ok(())
}

fn print_filters(filters: &[SavedFilter], json: bool) -> Result<()> {
    if json {
        println!("{}", crate::format::to_json_pretty(&filters)?);
    } else {
        for filter in filters {
            println!("{}", text::filter_line(filter));
        }
    }
    Ok(())
}

fn save_args_criteria(args: &FilterSaveArgs) -> Result<crate::model::FilterCriteria> {
    criteria_from_flags(
        args.search.as_deref(),
        args.status.as_deref(),
        args.priority.as_deref(),
        args.severity.as_deref(),
        args.assignee,
        args.updated_within,
    )
}

fn edit_args_criteria(args: &FilterEditArgs) -> Result<Option<crate::model::FilterCriteria>> {
    if !args.replace_criteria {
        return Ok(None);
    }
    criteria_from_flags(
        args.search.as_deref(),
        args.status.as_deref(),
        args.priority.as_deref(),
        args.severity.as_deref(),
        args.assignee,
        args.updated_within,
    )
    .map(Some)
}
