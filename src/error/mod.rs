//! Error types and handling for `bughive`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Supports `anyhow` integration at the edges
//! - Provides recovery hints for user-facing errors
//! - Provides structured JSON output for scripting

mod structured;

pub use structured::{ErrorCode, StructuredError};

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `bughive` operations.
#[derive(Error, Debug)]
pub enum BugHiveError {
    // === Store Errors ===
    /// Database file not found at the specified path.
    #[error("Database not found at '{path}'")]
    DatabaseNotFound { path: PathBuf },

    /// `SQLite` database error (wraps the underlying cause).
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    // === Not-Found Errors ===
    /// Bug with the specified id was not found.
    #[error("Bug not found: {id}")]
    BugNotFound { id: i64 },

    /// User with the specified id was not found.
    #[error("User not found: {id}")]
    UserNotFound { id: i64 },

    /// Project with the specified id was not found.
    #[error("Project not found: {id}")]
    ProjectNotFound { id: i64 },

    /// Saved filter with the specified id was not found.
    #[error("Filter not found: {id}")]
    FilterNotFound { id: i64 },

    /// Notification with the specified id was not found.
    #[error("Notification not found: {id}")]
    NotificationNotFound { id: i64 },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Invalid status value.
    #[error("Invalid status: {status}")]
    InvalidStatus { status: String },

    /// Invalid priority value.
    #[error("Invalid priority: {priority}")]
    InvalidPriority { priority: String },

    /// Invalid severity value.
    #[error("Invalid severity: {severity}")]
    InvalidSeverity { severity: String },

    /// Invalid sort field name.
    #[error("Invalid sort field: {field}")]
    InvalidSortField { field: String },

    // === Saved Filter Errors ===
    /// Preset filters are built in and cannot be edited or deleted.
    #[error("Filter {id} is a built-in preset and cannot be modified")]
    PresetImmutable { id: i64 },

    // === Import Errors ===
    /// Failed to normalize an upstream record during import.
    #[error("Import error at record {index}: {reason}")]
    ImportRecord { index: usize, reason: String },

    // === Configuration Errors ===
    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// BugHive workspace not initialized.
    #[error("BugHive not initialized: run 'bh init' first")]
    NotInitialized,

    /// Already initialized.
    #[error("Already initialized at '{path}'")]
    AlreadyInitialized { path: PathBuf },

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Wrapped anyhow error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BugHiveError {
    /// Can the user fix this without code changes?
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DatabaseNotFound { .. }
                | Self::NotInitialized
                | Self::BugNotFound { .. }
                | Self::FilterNotFound { .. }
                | Self::Validation { .. }
                | Self::InvalidStatus { .. }
                | Self::InvalidPriority { .. }
                | Self::InvalidSeverity { .. }
                | Self::InvalidSortField { .. }
                | Self::PresetImmutable { .. }
        )
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run: bh init"),
            Self::DatabaseNotFound { .. } => Some("Check path or run: bh init"),
            Self::AlreadyInitialized { .. } => Some("Use --force to reinitialize"),
            Self::PresetImmutable { .. } => {
                Some("Only custom filters can be edited or deleted; save a copy instead")
            }
            Self::InvalidStatus { .. } => {
                Some("Valid statuses: open, in_progress, resolved, closed")
            }
            Self::InvalidPriority { .. } => Some("Valid priorities: low, medium, high, critical"),
            Self::InvalidSeverity { .. } => Some("Valid severities: minor, medium, major, critical"),
            Self::InvalidSortField { .. } => Some(
                "Valid sort fields: created_at, updated_at, title, priority, severity, status, id",
            ),
            _ => None,
        }
    }

    /// Create a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type using `BugHiveError`.
pub type Result<T> = std::result::Result<T, BugHiveError>;
