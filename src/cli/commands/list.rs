//! List command implementation.
//!
//! The primary discovery interface: loads the full bug set into a
//! `BugListView`, applies criteria from flags or a saved filter, sorts,
//! and prints.

use crate::cli::ListArgs;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::filter::saved::{ActiveFilterStore, FilterManager};
use crate::format::text;
use crate::view::BugListView;

use super::{criteria_from_flags, open_workspace};

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if the workspace is missing or a flag value cannot
/// be parsed.
pub fn execute(args: &ListArgs, json: bool, use_color: bool, cli: &CliOverrides) -> Result<()> {
    let (mut store, paths) = open_workspace(cli)?;
    let current_user = paths.current_user_id(cli);

    let bugs = store.list_bugs()?;
    let users = store.user_directory()?;

    let active_store = ActiveFilterStore::new(&paths.active_filter_path);
    let mut view = BugListView::new(bugs, users.clone()).with_active_store(active_store);

    if let Some(filter_id) = args.filter {
        let manager = FilterManager::new(&mut store, &paths.active_filter_path, current_user);
        let filter = manager.get_filter(filter_id)?;
        view.apply_named_filter(&filter)?;
    }

    // Explicit flags layer on top of (or replace parts of) the applied
    // filter's criteria.
    let flags = criteria_from_flags(
        args.search.as_deref(),
        args.status.as_deref(),
        args.priority.as_deref(),
        args.severity.as_deref(),
        args.assignee,
        args.updated_within,
    )?;
    if flags.search.is_some() {
        view.set_search(flags.search);
    }
    if flags.status.is_some() {
        view.set_status(flags.status);
    }
    if flags.priority.is_some() {
        view.set_priority(flags.priority);
    }
    if flags.severity.is_some() {
        view.set_severity(flags.severity);
    }
    if flags.assignee_id.is_some() {
        view.set_assignee(flags.assignee_id);
    }
    if flags.updated_within.is_some() {
        view.set_updated_within(flags.updated_within);
    }

    if let Some(field) = args.sort.as_deref() {
        view.toggle_sort(field.parse()?);
    }
    // --direction applies to whatever field is in effect, the default
    // recency sort included.
    if let Some(direction) = args.direction.as_deref() {
        let direction = direction.parse()?;
        if view.sort_direction() != direction {
            view.toggle_sort(view.sort_field());
        }
    }

    let visible = view.visible();

    if json {
        println!("{}", crate::format::to_json_pretty(&visible)?);
        return Ok(());
    }

    if args.badges {
        let badges = view.active_badges();
        if !badges.is_empty() {
            println!("filters: {}", text::badge_summary(&badges));
        }
    }
    for bug in &visible {
        println!("{}", text::bug_line(bug, &users, use_color));
    }
    if visible.is_empty() {
        println!("No bugs match.");
    }
    Ok(())
}
