//! Bug filtering.
//!
//! `FilterCriteria::matches` is implemented here as a free function over
//! the criteria so the model stays plain data. All dimensions AND
//! together; an unset dimension always matches. The evaluation is total:
//! it never fails, it only includes or excludes.

pub mod saved;
pub mod sort;

use crate::model::{Bug, FilterCriteria, UserDirectory};
use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: u64 = 86_400;

impl FilterCriteria {
    /// Does `bug` pass every active dimension of this filter?
    ///
    /// Free-text search is case-insensitive and matches if ANY of title,
    /// description, resolved assignee name, resolved reporter name, or
    /// the bug id rendered as decimal text contains the needle.
    #[must_use]
    pub fn matches(&self, bug: &Bug, users: &UserDirectory, now: DateTime<Utc>) -> bool {
        if let Some(needle) = self.search.as_deref() {
            let needle = needle.trim().to_lowercase();
            if !needle.is_empty() && !search_matches(bug, users, &needle) {
                return false;
            }
        }

        if let Some(status) = self.status {
            if bug.status != status {
                return false;
            }
        }

        if let Some(priority) = self.priority {
            if bug.priority != priority {
                return false;
            }
        }

        if let Some(severity) = self.severity {
            if bug.severity != severity {
                return false;
            }
        }

        if let Some(assignee_id) = self.assignee_id {
            if bug.assignee_id != Some(assignee_id) {
                return false;
            }
        }

        if let Some(days) = self.updated_within {
            if !updated_within(bug.updated_at, now, days) {
                return false;
            }
        }

        true
    }
}

fn search_matches(bug: &Bug, users: &UserDirectory, needle: &str) -> bool {
    if bug.title.to_lowercase().contains(needle) {
        return true;
    }
    if bug
        .description
        .as_deref()
        .is_some_and(|d| d.to_lowercase().contains(needle))
    {
        return true;
    }
    if bug
        .assignee_id
        .and_then(|id| users.display_name(id))
        .is_some_and(|name| name.to_lowercase().contains(needle))
    {
        return true;
    }
    if users
        .display_name(bug.reporter_id)
        .is_some_and(|name| name.to_lowercase().contains(needle))
    {
        return true;
    }
    bug.id_text().contains(needle)
}

/// Recency check: a bug updated exactly N days ago is INSIDE a window of
/// N days (the elapsed time is rounded up to whole days before the
/// comparison). A bug with no update timestamp is always outside.
fn updated_within(updated_at: Option<DateTime<Utc>>, now: DateTime<Utc>, days: u32) -> bool {
    let Some(updated_at) = updated_at else {
        return false;
    };

    let elapsed_secs = now.signed_duration_since(updated_at).num_seconds().unsigned_abs();
    let elapsed_days = elapsed_secs.div_ceil(SECONDS_PER_DAY);
    elapsed_days <= u64::from(days)
}
