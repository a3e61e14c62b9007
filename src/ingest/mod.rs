//! Ingestion adapter for upstream record exports.
//!
//! Upstream exports come in two naming conventions: plain snake_case
//! (`title`, `updated_at`) and a suffixed variant (`title_c`,
//! `updated_at_c`) with `Id`/`Name` system fields and lookup references
//! that may be a bare number, a numeric string, or an object carrying an
//! `Id`. The raw types below accept all of them via serde aliases and an
//! untagged id type; each `normalize_*` function converts a raw record
//! into the canonical model exactly once, at this boundary. Business
//! logic never sees upstream names.

use crate::error::{BugHiveError, Result};
use crate::model::{Bug, Environment, Project, User};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::str::FromStr;
use tracing::warn;

/// A lookup reference: bare number, numeric string, or `{ "Id": n }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdRef {
    Number(i64),
    Text(String),
    Object {
        #[serde(rename = "Id", alias = "id")]
        id: i64,
    },
}

impl IdRef {
    /// Resolve to a numeric id. Unparseable text yields `None`.
    #[must_use]
    pub fn resolve(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Object { id } => Some(*id),
        }
    }
}

fn parse_date(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Raw bug record as exported upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBug {
    #[serde(default, alias = "Id")]
    pub id: Option<IdRef>,

    #[serde(default, alias = "title_c")]
    pub title: Option<String>,
    /// System display name, used as the title fallback.
    #[serde(default, rename = "Name")]
    pub name: Option<String>,

    #[serde(default, alias = "description_c")]
    pub description: Option<String>,
    #[serde(default, alias = "steps_to_reproduce_c")]
    pub steps_to_reproduce: Option<String>,

    #[serde(default, alias = "status_c")]
    pub status: Option<String>,
    #[serde(default, alias = "priority_c")]
    pub priority: Option<String>,
    #[serde(default, alias = "severity_c")]
    pub severity: Option<String>,

    #[serde(default, alias = "assignee_id_c")]
    pub assignee_id: Option<IdRef>,
    #[serde(default, alias = "reporter_id_c")]
    pub reporter_id: Option<IdRef>,
    #[serde(default, alias = "project_id_c")]
    pub project_id: Option<IdRef>,

    #[serde(default, alias = "created_at_c", alias = "CreatedOn")]
    pub created_at: Option<String>,
    #[serde(default, alias = "updated_at_c", alias = "ModifiedOn")]
    pub updated_at: Option<String>,

    /// Environment, either inline or as a JSON-encoded string.
    #[serde(default, alias = "environment_c")]
    pub environment: Option<serde_json::Value>,

    #[serde(default, alias = "attachments_c")]
    pub attachments: Option<Vec<String>>,
}

/// Raw user record as exported upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    #[serde(default, alias = "Id")]
    pub id: Option<IdRef>,
    #[serde(default, alias = "first_name_c", alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "last_name_c", alias = "lastName")]
    pub last_name: Option<String>,
    #[serde(default, alias = "email_c")]
    pub email: Option<String>,
    #[serde(default, alias = "role_c")]
    pub role: Option<String>,
    #[serde(default, alias = "is_active_c", alias = "isActive")]
    pub active: Option<bool>,
    /// "First Last" fallback when the name fields are absent.
    #[serde(default, rename = "Name")]
    pub name: Option<String>,
}

/// Raw project record as exported upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProject {
    #[serde(default, alias = "Id")]
    pub id: Option<IdRef>,
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
    #[serde(default, alias = "description_c")]
    pub description: Option<String>,
    #[serde(default, alias = "lead_id_c")]
    pub lead_id: Option<IdRef>,
    #[serde(default, alias = "status_c")]
    pub status: Option<String>,
    /// Comma-separated ids upstream, or a proper array.
    #[serde(default, alias = "team_members_c")]
    pub team_members: Option<serde_json::Value>,
    #[serde(default, alias = "bug_priority_default_c")]
    pub default_priority: Option<String>,
    #[serde(default, alias = "environments_c")]
    pub environments: Option<serde_json::Value>,
    #[serde(default, alias = "created_at_c", alias = "CreatedOn")]
    pub created_at: Option<String>,
}

fn parse_environment(value: Option<&serde_json::Value>) -> Environment {
    let Some(value) = value else {
        return Environment::default();
    };
    // Upstream stores the environment as a JSON string inside the record.
    let parsed = match value {
        serde_json::Value::String(s) => serde_json::from_str(s).ok(),
        other => serde_json::from_value(other.clone()).ok(),
    };
    parsed.unwrap_or_default()
}

fn parse_string_list(value: Option<&serde_json::Value>) -> Vec<String> {
    match value {
        Some(serde_json::Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(other) => serde_json::from_value(other.clone()).unwrap_or_default(),
        None => Vec::new(),
    }
}

fn parse_id_list(value: Option<&serde_json::Value>) -> Vec<i64> {
    parse_string_list(value)
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect()
}

/// Convert a raw bug into the canonical model.
///
/// `index` is the record's position in the input, used in error
/// messages. Unknown enum text and unparseable dates degrade to defaults
/// with a warning; a missing title or reporter is a hard error.
///
/// # Errors
///
/// Returns `ImportRecord` when a required field is missing.
pub fn normalize_bug(raw: &RawBug, index: usize) -> Result<Bug> {
    let id = raw
        .id
        .as_ref()
        .and_then(IdRef::resolve)
        .ok_or_else(|| BugHiveError::ImportRecord {
            index,
            reason: "missing or unparseable id".to_string(),
        })?;

    let title = raw
        .title
        .clone()
        .or_else(|| raw.name.clone())
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| BugHiveError::ImportRecord {
            index,
            reason: "missing title".to_string(),
        })?;

    let reporter_id = raw
        .reporter_id
        .as_ref()
        .and_then(IdRef::resolve)
        .ok_or_else(|| BugHiveError::ImportRecord {
            index,
            reason: "missing reporter id".to_string(),
        })?;

    let project_id = raw
        .project_id
        .as_ref()
        .and_then(IdRef::resolve)
        .ok_or_else(|| BugHiveError::ImportRecord {
            index,
            reason: "missing project id".to_string(),
        })?;

    Ok(Bug {
        id,
        title,
        description: raw.description.clone(),
        steps_to_reproduce: raw.steps_to_reproduce.clone(),
        status: parse_enum_or_default(raw.status.as_deref(), index, "status"),
        priority: parse_enum_or_default(raw.priority.as_deref(), index, "priority"),
        severity: parse_enum_or_default(raw.severity.as_deref(), index, "severity"),
        assignee_id: raw.assignee_id.as_ref().and_then(IdRef::resolve),
        reporter_id,
        project_id,
        created_at: parse_date(raw.created_at.as_deref()),
        updated_at: parse_date(raw.updated_at.as_deref()),
        environment: parse_environment(raw.environment.as_ref()),
        attachments: raw.attachments.clone().unwrap_or_default(),
    })
}

fn parse_enum_or_default<T: FromStr + Default>(
    value: Option<&str>,
    index: usize,
    field: &str,
) -> T {
    match value {
        None => T::default(),
        Some(s) => T::from_str(s).unwrap_or_else(|_| {
            warn!(index, field, value = s, "unknown value, using default");
            T::default()
        }),
    }
}

/// Convert a raw user into the canonical model.
///
/// # Errors
///
/// Returns `ImportRecord` when the id or every name source is missing.
pub fn normalize_user(raw: &RawUser, index: usize) -> Result<User> {
    let id = raw
        .id
        .as_ref()
        .and_then(IdRef::resolve)
        .ok_or_else(|| BugHiveError::ImportRecord {
            index,
            reason: "missing or unparseable id".to_string(),
        })?;

    let (first_name, last_name) = match (raw.first_name.clone(), raw.last_name.clone()) {
        (Some(first), Some(last)) => (first, last),
        (first, last) => {
            // Fall back to splitting the system display name.
            let name = raw.name.clone().unwrap_or_default();
            let mut parts = name.splitn(2, ' ');
            let derived_first = parts.next().unwrap_or("").to_string();
            let derived_last = parts.next().unwrap_or("").to_string();
            (
                first.unwrap_or(derived_first),
                last.unwrap_or(derived_last),
            )
        }
    };

    if first_name.trim().is_empty() {
        return Err(BugHiveError::ImportRecord {
            index,
            reason: "missing user name".to_string(),
        });
    }

    Ok(User {
        id,
        first_name,
        last_name,
        email: raw.email.clone().unwrap_or_default(),
        role: raw.role.clone(),
        active: raw.active.unwrap_or(true),
    })
}

/// Convert a raw project into the canonical model.
///
/// # Errors
///
/// Returns `ImportRecord` when the id or name is missing.
pub fn normalize_project(raw: &RawProject, index: usize) -> Result<Project> {
    let id = raw
        .id
        .as_ref()
        .and_then(IdRef::resolve)
        .ok_or_else(|| BugHiveError::ImportRecord {
            index,
            reason: "missing or unparseable id".to_string(),
        })?;

    let name = raw
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| BugHiveError::ImportRecord {
            index,
            reason: "missing project name".to_string(),
        })?;

    Ok(Project {
        id,
        name,
        description: raw.description.clone(),
        lead_id: raw.lead_id.as_ref().and_then(IdRef::resolve),
        status: parse_enum_or_default(raw.status.as_deref(), index, "project status"),
        team_member_ids: parse_id_list(raw.team_members.as_ref()),
        default_priority: parse_enum_or_default(
            raw.default_priority.as_deref(),
            index,
            "default priority",
        ),
        environments: parse_string_list(raw.environments.as_ref()),
        created_at: parse_date(raw.created_at.as_deref()),
    })
}
