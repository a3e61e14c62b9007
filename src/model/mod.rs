//! Core data types for `bughive`.
//!
//! This module defines the fundamental types used throughout the application:
//! - `Bug` - The core defect record
//! - `Status` / `Priority` / `Severity` - Bug classification enums
//! - `User` / `UserDirectory` - People referenced by bugs
//! - `Project` - Grouping of bugs
//! - `SavedFilter` / `FilterCriteria` - Reusable filter definitions
//! - `Notification` - Status-change notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Bug lifecycle status.
///
/// Transitions are unconstrained; any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = crate::error::BugHiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "in_progress" | "inprogress" | "in-progress" | "in progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            other => Err(crate::error::BugHiveError::InvalidStatus {
                status: other.to_string(),
            }),
        }
    }
}

/// Bug priority. Variant order defines the sort order (Low < Critical).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = crate::error::BugHiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(crate::error::BugHiveError::InvalidPriority {
                priority: other.to_string(),
            }),
        }
    }
}

/// Bug severity. Variant order defines the sort order (Minor < Critical).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Minor,
    #[default]
    Medium,
    Major,
    Critical,
}

impl Severity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Medium => "medium",
            Self::Major => "major",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = crate::error::BugHiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minor" => Ok(Self::Minor),
            "medium" => Ok(Self::Medium),
            "major" => Ok(Self::Major),
            "critical" => Ok(Self::Critical),
            other => Err(crate::error::BugHiveError::InvalidSeverity {
                severity: other.to_string(),
            }),
        }
    }
}

/// Where a bug was observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Environment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl Environment {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.browser.is_none() && self.os.is_none() && self.device.is_none()
    }
}

/// The primary bug entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bug {
    /// Store-assigned unique id.
    pub id: i64,

    /// Title (1-200 chars).
    pub title: String,

    /// Detailed description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Steps to reproduce.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps_to_reproduce: Option<String>,

    /// Workflow status.
    #[serde(default)]
    pub status: Status,

    /// Scheduling priority.
    #[serde(default)]
    pub priority: Priority,

    /// Impact severity.
    #[serde(default)]
    pub severity: Severity,

    /// Assigned user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<i64>,

    /// Reporting user.
    pub reporter_id: i64,

    /// Owning project.
    pub project_id: i64,

    /// Creation timestamp. `None` when the upstream record had no
    /// parseable date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Last update timestamp. Same degradation rule as `created_at`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Observed environment.
    #[serde(default, skip_serializing_if = "Environment::is_empty")]
    pub environment: Environment,

    /// Attachment file references (names/paths only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

impl Bug {
    /// Render the id as the decimal text matched by free-text search.
    #[must_use]
    pub fn id_text(&self) -> String {
        self.id.to_string()
    }
}

/// A person who reports or is assigned bugs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

const fn default_true() -> bool {
    true
}

impl User {
    /// Full display name, "First Last".
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Id-indexed lookup of users for name resolution during filtering.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<i64, User>,
}

impl UserDirectory {
    #[must_use]
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<&User> {
        self.users.get(&id)
    }

    /// Display name for a user id, if the user is known.
    #[must_use]
    pub fn display_name(&self, id: i64) -> Option<String> {
        self.users.get(&id).map(User::display_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    #[default]
    Active,
    OnHold,
}

impl ProjectStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Active => "active",
            Self::OnHold => "on_hold",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = crate::error::BugHiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planning" => Ok(Self::Planning),
            "active" => Ok(Self::Active),
            "on_hold" | "onhold" | "on-hold" | "on hold" => Ok(Self::OnHold),
            other => Err(crate::error::BugHiveError::validation(
                "project_status",
                format!("unknown project status '{other}'"),
            )),
        }
    }
}

/// A project that bugs belong to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<i64>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub team_member_ids: Vec<i64>,
    #[serde(default)]
    pub default_priority: Priority,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Whether a saved filter is a built-in preset or user-created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Built in, negative id, immutable.
    Preset,
    /// User-created, positive id.
    Custom,
}

impl FilterKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Preset => "preset",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sparse filter criteria. `None` in any dimension means "match all"
/// on that dimension; the default value matches every bug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FilterCriteria {
    /// Case-insensitive free-text search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Exact status match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    /// Exact priority match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    /// Exact severity match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    /// Exact assignee match by user id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<i64>,

    /// Only bugs updated within the last N days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_within: Option<u32>,
}

impl FilterCriteria {
    /// Number of active (non-default) dimensions. A `search` of
    /// whitespace only does not count.
    #[must_use]
    pub fn active_count(&self) -> usize {
        let mut count = 0;
        if self
            .search
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
        {
            count += 1;
        }
        if self.status.is_some() {
            count += 1;
        }
        if self.priority.is_some() {
            count += 1;
        }
        if self.severity.is_some() {
            count += 1;
        }
        if self.assignee_id.is_some() {
            count += 1;
        }
        if self.updated_within.is_some() {
            count += 1;
        }
        count
    }

    /// Whether every dimension is inactive (the identity filter).
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.active_count() == 0
    }
}

/// A named, reusable filter definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedFilter {
    /// Negative for presets, positive for custom filters.
    pub id: i64,
    pub name: String,
    pub kind: FilterKind,
    pub criteria: FilterCriteria,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl SavedFilter {
    #[must_use]
    pub const fn is_preset(&self) -> bool {
        matches!(self.kind, FilterKind::Preset)
    }
}

/// A status-change notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: i64,
    pub bug_id: i64,
    pub old_status: Status,
    pub new_status: Status,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
