//! Structured error output for scripts and automation.
//!
//! Provides machine-parseable error information with:
//! - Error codes for categorization
//! - Hints for self-correction
//! - Retryability flags
//! - Context for debugging

use crate::error::BugHiveError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Machine-readable error codes.
///
/// These codes are stable and can be used for programmatic error handling.
/// Format: `SCREAMING_SNAKE_CASE` for easy parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // === Store Errors (exit code 2) ===
    /// Database file not found
    DatabaseNotFound,
    /// Database operation failed
    StoreError,
    /// BugHive workspace not initialized
    NotInitialized,
    /// Already initialized
    AlreadyInitialized,

    // === Record Errors (exit code 3) ===
    /// Bug with specified id not found
    BugNotFound,
    /// User with specified id not found
    UserNotFound,
    /// Project with specified id not found
    ProjectNotFound,
    /// Saved filter with specified id not found
    FilterNotFound,
    /// Notification with specified id not found
    NotificationNotFound,

    // === Validation Errors (exit code 4) ===
    /// Field validation failed
    ValidationFailed,
    /// Invalid status value
    InvalidStatus,
    /// Invalid priority value
    InvalidPriority,
    /// Invalid severity value
    InvalidSeverity,
    /// Invalid sort field name
    InvalidSortField,

    // === Saved Filter Errors (exit code 5) ===
    /// Preset filter is immutable
    PresetImmutable,

    // === Import Errors (exit code 6) ===
    /// Failed to normalize an upstream record
    ImportError,

    // === Config Errors (exit code 7) ===
    /// Configuration error
    ConfigError,

    // === I/O Errors (exit code 8) ===
    /// File I/O error
    IoError,
    /// JSON serialization error
    JsonError,
    /// YAML parsing error
    YamlError,

    // === Internal Errors (exit code 1) ===
    /// Unexpected internal error
    InternalError,
}

impl ErrorCode {
    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DatabaseNotFound => "DATABASE_NOT_FOUND",
            Self::StoreError => "STORE_ERROR",
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::BugNotFound => "BUG_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ProjectNotFound => "PROJECT_NOT_FOUND",
            Self::FilterNotFound => "FILTER_NOT_FOUND",
            Self::NotificationNotFound => "NOTIFICATION_NOT_FOUND",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::InvalidPriority => "INVALID_PRIORITY",
            Self::InvalidSeverity => "INVALID_SEVERITY",
            Self::InvalidSortField => "INVALID_SORT_FIELD",
            Self::PresetImmutable => "PRESET_IMMUTABLE",
            Self::ImportError => "IMPORT_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::YamlError => "YAML_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether this error is potentially retryable.
    ///
    /// Retryable means the caller might succeed if it fixes the input
    /// and retries (e.g., a validation error).
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed
                | Self::InvalidStatus
                | Self::InvalidPriority
                | Self::InvalidSeverity
                | Self::InvalidSortField
        )
    }

    /// Get the exit code for this error category.
    ///
    /// Exit codes are grouped by error category:
    /// - 1: Internal/unknown errors
    /// - 2: Store errors
    /// - 3: Record not-found errors
    /// - 4: Validation errors
    /// - 5: Saved filter errors
    /// - 6: Import errors
    /// - 7: Config errors
    /// - 8: I/O errors
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::DatabaseNotFound
            | Self::StoreError
            | Self::NotInitialized
            | Self::AlreadyInitialized => 2,
            Self::BugNotFound
            | Self::UserNotFound
            | Self::ProjectNotFound
            | Self::FilterNotFound
            | Self::NotificationNotFound => 3,
            Self::ValidationFailed
            | Self::InvalidStatus
            | Self::InvalidPriority
            | Self::InvalidSeverity
            | Self::InvalidSortField => 4,
            Self::PresetImmutable => 5,
            Self::ImportError => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError | Self::YamlError => 8,
            Self::InternalError => 1,
        }
    }
}

/// Structured error for machine-parseable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional hint for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether the operation can be retried
    pub retryable: bool,
    /// Additional context data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    /// Create a new structured error from a `BugHiveError`.
    #[must_use]
    pub fn from_error(err: &BugHiveError) -> Self {
        let (code, context) = Self::extract_code_and_context(err);
        let hint = Self::generate_hint(err);

        Self {
            code,
            message: err.to_string(),
            hint,
            retryable: code.is_retryable(),
            context,
        }
    }

    /// Serialize to JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "retryable": self.retryable,
                "context": self.context,
            }
        })
    }

    /// Format for human-readable output.
    #[must_use]
    pub fn to_human(&self, color: bool) -> String {
        let mut output = String::new();

        if color {
            output.push_str("\x1b[31mError:\x1b[0m ");
        } else {
            output.push_str("Error: ");
        }

        output.push_str(&self.message);

        if let Some(hint) = &self.hint {
            output.push('\n');
            if color {
                output.push_str("\x1b[33mHint:\x1b[0m ");
            } else {
                output.push_str("Hint: ");
            }
            output.push_str(hint);
        }

        output
    }

    /// Extract error code and context from a `BugHiveError`.
    fn extract_code_and_context(err: &BugHiveError) -> (ErrorCode, Option<Value>) {
        match err {
            BugHiveError::DatabaseNotFound { path } => (
                ErrorCode::DatabaseNotFound,
                Some(json!({"path": path.display().to_string()})),
            ),
            BugHiveError::Store(_) => (ErrorCode::StoreError, None),
            BugHiveError::NotInitialized => (ErrorCode::NotInitialized, None),
            BugHiveError::AlreadyInitialized { path } => (
                ErrorCode::AlreadyInitialized,
                Some(json!({"path": path.display().to_string()})),
            ),
            BugHiveError::BugNotFound { id } => {
                (ErrorCode::BugNotFound, Some(json!({"searched_id": id})))
            }
            BugHiveError::UserNotFound { id } => {
                (ErrorCode::UserNotFound, Some(json!({"searched_id": id})))
            }
            BugHiveError::ProjectNotFound { id } => {
                (ErrorCode::ProjectNotFound, Some(json!({"searched_id": id})))
            }
            BugHiveError::FilterNotFound { id } => {
                (ErrorCode::FilterNotFound, Some(json!({"searched_id": id})))
            }
            BugHiveError::NotificationNotFound { id } => (
                ErrorCode::NotificationNotFound,
                Some(json!({"searched_id": id})),
            ),
            BugHiveError::Validation { field, reason } => (
                ErrorCode::ValidationFailed,
                Some(json!({"field": field, "reason": reason})),
            ),
            BugHiveError::InvalidStatus { status } => {
                let hint = detect_status_intent(status);
                (
                    ErrorCode::InvalidStatus,
                    Some(json!({"status": status, "suggested": hint})),
                )
            }
            BugHiveError::InvalidPriority { priority } => {
                let hint = detect_priority_intent(priority);
                (
                    ErrorCode::InvalidPriority,
                    Some(json!({"priority": priority, "suggested": hint})),
                )
            }
            BugHiveError::InvalidSeverity { severity } => {
                let hint = detect_severity_intent(severity);
                (
                    ErrorCode::InvalidSeverity,
                    Some(json!({"severity": severity, "suggested": hint})),
                )
            }
            BugHiveError::InvalidSortField { field } => {
                (ErrorCode::InvalidSortField, Some(json!({"field": field})))
            }
            BugHiveError::PresetImmutable { id } => {
                (ErrorCode::PresetImmutable, Some(json!({"id": id})))
            }
            BugHiveError::ImportRecord { index, reason } => (
                ErrorCode::ImportError,
                Some(json!({"index": index, "reason": reason})),
            ),
            BugHiveError::Config(_) => (ErrorCode::ConfigError, None),
            BugHiveError::Io(_) => (ErrorCode::IoError, None),
            BugHiveError::Json(_) => (ErrorCode::JsonError, None),
            BugHiveError::Yaml(_) => (ErrorCode::YamlError, None),
            BugHiveError::Other(_) => (ErrorCode::InternalError, None),
        }
    }

    /// Generate context-aware hint from error.
    fn generate_hint(err: &BugHiveError) -> Option<String> {
        match err {
            BugHiveError::BugNotFound { .. } => {
                Some("Run 'bh list' to see available bugs.".to_string())
            }
            BugHiveError::FilterNotFound { .. } => {
                Some("Run 'bh filter list' to see available filters.".to_string())
            }
            BugHiveError::InvalidStatus { status } => detect_status_intent(status)
                .map(|detected| format!("Did you mean --status {detected}?"))
                .or_else(|| err.suggestion().map(str::to_string)),
            BugHiveError::InvalidPriority { priority } => detect_priority_intent(priority)
                .map(|detected| format!("Did you mean --priority {detected}?"))
                .or_else(|| err.suggestion().map(str::to_string)),
            BugHiveError::InvalidSeverity { severity } => detect_severity_intent(severity)
                .map(|detected| format!("Did you mean --severity {detected}?"))
                .or_else(|| err.suggestion().map(str::to_string)),
            _ => err.suggestion().map(str::to_string),
        }
    }
}

// === Precomputed Synonyms (O(1) lookup) ===

/// Status synonyms for intent detection.
static STATUS_SYNONYMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("new", "open"),
        ("todo", "open"),
        ("pending", "open"),
        ("wip", "in_progress"),
        ("working", "in_progress"),
        ("active", "in_progress"),
        ("started", "in_progress"),
        ("fixed", "resolved"),
        ("done", "resolved"),
        ("complete", "resolved"),
        ("completed", "resolved"),
        ("finished", "closed"),
        ("wontfix", "closed"),
    ]
    .into_iter()
    .collect()
});

/// Priority synonyms for intent detection.
static PRIORITY_SYNONYMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("urgent", "critical"),
        ("crit", "critical"),
        ("highest", "critical"),
        ("important", "high"),
        ("normal", "medium"),
        ("default", "medium"),
        ("minor", "low"),
        ("trivial", "low"),
        ("lowest", "low"),
    ]
    .into_iter()
    .collect()
});

/// Severity synonyms for intent detection.
static SEVERITY_SYNONYMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("trivial", "minor"),
        ("cosmetic", "minor"),
        ("low", "minor"),
        ("normal", "medium"),
        ("severe", "major"),
        ("high", "major"),
        ("blocker", "critical"),
        ("crash", "critical"),
    ]
    .into_iter()
    .collect()
});

const VALID_STATUSES: [&str; 4] = ["open", "in_progress", "resolved", "closed"];
const VALID_PRIORITIES: [&str; 4] = ["low", "medium", "high", "critical"];
const VALID_SEVERITIES: [&str; 4] = ["minor", "medium", "major", "critical"];

fn detect_intent(
    input: &str,
    valid: &[&'static str],
    synonyms: &HashMap<&'static str, &'static str>,
) -> Option<&'static str> {
    let lower = input.to_lowercase();

    if let Some(&exact) = valid.iter().find(|&&v| v == lower) {
        return Some(exact);
    }

    if let Some(&canonical) = synonyms.get(lower.as_str()) {
        return Some(canonical);
    }

    // Prefix match
    valid.iter().find(|v| v.starts_with(&lower)).copied()
}

/// Detect what status the user likely meant.
fn detect_status_intent(input: &str) -> Option<&'static str> {
    detect_intent(input, &VALID_STATUSES, &STATUS_SYNONYMS)
}

/// Detect what priority the user likely meant.
fn detect_priority_intent(input: &str) -> Option<&'static str> {
    detect_intent(input, &VALID_PRIORITIES, &PRIORITY_SYNONYMS)
}

/// Detect what severity the user likely meant.
fn detect_severity_intent(input: &str) -> Option<&'static str> {
    detect_intent(input, &VALID_SEVERITIES, &SEVERITY_SYNONYMS)
}
