//! Command implementations.

pub mod create;
pub mod filter;
pub mod import;
pub mod init;
pub mod list;
pub mod notify;
pub mod projects;
pub mod show;
pub mod update;
pub mod users;
pub mod version;

use crate::config::{self, CliOverrides, ConfigPaths};
use crate::error::Result;
use crate::model::FilterCriteria;
use crate::store::SqliteStore;

/// Discover the workspace (walking up from the CWD) and open the store.
pub(crate) fn open_workspace(cli: &CliOverrides) -> Result<(SqliteStore, ConfigPaths)> {
    let bughive_dir = config::discover_bughive_dir(None)?;
    config::open_store(&bughive_dir, cli)
}

/// Build filter criteria from the common flag set shared by `list`,
/// `filter save`, and `filter edit`.
pub(crate) fn criteria_from_flags(
    search: Option<&str>,
    status: Option<&str>,
    priority: Option<&str>,
    severity: Option<&str>,
    assignee: Option<i64>,
    updated_within: Option<u32>,
) -> Result<FilterCriteria> {
    Ok(FilterCriteria {
        search: search.map(str::to_string),
        status: status.map(str::parse).transpose()?,
        priority: priority.map(str::parse).transpose()?,
        severity: severity.map(str::parse).transpose()?,
        assignee_id: assignee,
        updated_within,
    })
}
