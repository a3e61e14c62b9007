//! Output formatting.

pub mod text;

use serde::Serialize;

/// Serialize any value as pretty JSON for `--json` output.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_pretty<T: Serialize>(value: &T) -> crate::error::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
