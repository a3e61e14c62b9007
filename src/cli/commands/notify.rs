//! Notify command implementation.

use crate::cli::NotifyCommands;
use crate::config::CliOverrides;
use crate::error::{BugHiveError, Result};
use crate::format::text;
use crate::notify::NotificationFeed;

use super::open_workspace;

/// Execute a notify subcommand.
///
/// # Errors
///
/// Returns an error if the workspace is missing or the store fails.
pub fn execute(command: &NotifyCommands, json: bool, use_color: bool, cli: &CliOverrides) -> Result<()> {
    let (mut store, _paths) = open_workspace(cli)?;

    match command {
        NotifyCommands::List => {
            let mut feed = NotificationFeed::new();
            feed.refresh(&store)?;
            if json {
                println!("{}", crate::format::to_json_pretty(&feed.notifications())?);
            } else {
                for notification in feed.notifications() {
                    println!("{}", text::notification_line(notification, use_color));
                }
                if feed.notifications().is_empty() {
                    println!("No notifications.");
                }
            }
        }
        NotifyCommands::Unread => {
            let count = store.unread_count()?;
            if json {
                println!("{}", serde_json::json!({"unread": count}));
            } else {
                println!("{count}");
            }
        }
        NotifyCommands::Read { id, all } => {
            if *all {
                let marked = store.mark_all_read()?;
                if json {
                    println!("{}", serde_json::json!({"marked_read": marked}));
                } else {
                    println!("Marked {marked} notifications read.");
                }
            } else {
                let id = id.ok_or_else(|| {
                    BugHiveError::validation("id", "give a notification id or --all")
                })?;
                store.mark_read(id)?;
                if !json {
                    println!("Marked notification #{id} read.");
                }
            }
        }
        NotifyCommands::Clear => {
            let removed = store.delete_all_notifications()?;
            if json {
                println!("{}", serde_json::json!({"removed": removed}));
            } else {
                println!("Removed {removed} notifications.");
            }
        }
    }
    Ok(())
}
