//! Sort comparator for bug lists.

use crate::error::BugHiveError;
use crate::model::Bug;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Which bug attribute to sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedAt,
    #[default]
    UpdatedAt,
    Title,
    Priority,
    Severity,
    Status,
    Id,
}

impl SortField {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Title => "title",
            Self::Priority => "priority",
            Self::Severity => "severity",
            Self::Status => "status",
            Self::Id => "id",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortField {
    type Err = BugHiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created_at" | "created" => Ok(Self::CreatedAt),
            "updated_at" | "updated" => Ok(Self::UpdatedAt),
            "title" => Ok(Self::Title),
            "priority" => Ok(Self::Priority),
            "severity" => Ok(Self::Severity),
            "status" => Ok(Self::Status),
            "id" => Ok(Self::Id),
            other => Err(BugHiveError::InvalidSortField {
                field: other.to_string(),
            }),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = BugHiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(BugHiveError::validation(
                "direction",
                format!("unknown sort direction '{other}' (use asc or desc)"),
            )),
        }
    }
}

/// Missing timestamps fall back to the Unix epoch, so undated bugs sort
/// first ascending and last descending.
fn ts_or_epoch(ts: Option<DateTime<Utc>>) -> DateTime<Utc> {
    ts.unwrap_or(DateTime::UNIX_EPOCH)
}

/// Compare two bugs on a field. Descending reverses the ascending
/// ordering; equal keys return `Equal` so a stable sort preserves input
/// order.
#[must_use]
pub fn compare(a: &Bug, b: &Bug, field: SortField, direction: SortDirection) -> Ordering {
    let ascending = match field {
        SortField::CreatedAt => ts_or_epoch(a.created_at).cmp(&ts_or_epoch(b.created_at)),
        SortField::UpdatedAt => ts_or_epoch(a.updated_at).cmp(&ts_or_epoch(b.updated_at)),
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortField::Priority => a.priority.cmp(&b.priority),
        SortField::Severity => a.severity.cmp(&b.severity),
        SortField::Status => (a.status as u8).cmp(&(b.status as u8)),
        SortField::Id => a.id.cmp(&b.id),
    };

    match direction {
        SortDirection::Ascending => ascending,
        SortDirection::Descending => ascending.reverse(),
    }
}

/// Sort a bug list in place. `sort_by` is stable, so bugs with equal
/// keys keep their relative input order.
pub fn sort_bugs(bugs: &mut [Bug], field: SortField, direction: SortDirection) {
    bugs.sort_by(|a, b| compare(a, b, field, direction));
}
