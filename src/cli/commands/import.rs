//! Import command implementation.
//!
//! Reads JSON arrays of upstream records, normalizes each through the
//! ingestion adapter, and inserts them with their upstream ids. Users
//! and projects import before bugs so lookups resolve.

use crate::cli::ImportArgs;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::ingest::{self, RawBug, RawProject, RawUser};
use std::fs;
use std::path::Path;
use tracing::info;

use super::open_workspace;

#[derive(Debug, Default, serde::Serialize)]
struct ImportSummary {
    users: usize,
    projects: usize,
    bugs: usize,
}

/// Execute the import command.
///
/// # Errors
///
/// Returns an error if a file cannot be read or a record fails to
/// normalize. Normalization errors abort the import; nothing after the
/// failing record is inserted.
pub fn execute(args: &ImportArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (mut store, _paths) = open_workspace(cli)?;
    let mut summary = ImportSummary::default();

    if let Some(path) = &args.users {
        let raw: Vec<RawUser> = read_records(path)?;
        for (index, record) in raw.iter().enumerate() {
            let user = ingest::normalize_user(record, index)?;
            store.import_user(&user)?;
        }
        summary.users = raw.len();
        info!(count = raw.len(), "imported users");
    }

    if let Some(path) = &args.projects {
        let raw: Vec<RawProject> = read_records(path)?;
        for (index, record) in raw.iter().enumerate() {
            let project = ingest::normalize_project(record, index)?;
            store.import_project(&project)?;
        }
        summary.projects = raw.len();
        info!(count = raw.len(), "imported projects");
    }

    if let Some(path) = &args.bugs {
        let raw: Vec<RawBug> = read_records(path)?;
        for (index, record) in raw.iter().enumerate() {
            let bug = ingest::normalize_bug(record, index)?;
            store.import_bug(&bug)?;
        }
        summary.bugs = raw.len();
        info!(count = raw.len(), "imported bugs");
    }

    if json {
        println!("{}", crate::format::to_json_pretty(&summary)?);
    } else {
        println!(
            "Imported {} users, {} projects, {} bugs.",
            summary.users, summary.projects, summary.bugs
        );
    }
    Ok(())
}

fn read_records<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
