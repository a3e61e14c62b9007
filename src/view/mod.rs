//! Bug list view-model.
//!
//! `BugListView` holds the loaded bug set, the user directory, the
//! current filter criteria, and the sort state. The visible list is
//! always derived wholesale from the full set — filtering and sorting
//! never mutate the loaded bugs, so clearing a filter restores the
//! original data exactly.

pub mod events;

use crate::error::Result;
use crate::filter::saved::ActiveFilterStore;
use crate::filter::sort::{SortDirection, SortField, sort_bugs};
use crate::model::{Bug, FilterCriteria, Priority, SavedFilter, Severity, Status, UserDirectory};
use chrono::Utc;
use events::{ViewEvent, ViewEvents};

/// A clearable chip describing one active filter dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterBadge {
    pub dimension: &'static str,
    pub value: String,
}

/// Orchestrates filtering and sorting over a loaded bug set.
#[derive(Debug)]
pub struct BugListView {
    bugs: Vec<Bug>,
    users: UserDirectory,
    criteria: FilterCriteria,
    sort_field: SortField,
    sort_direction: SortDirection,
    active: Option<ActiveFilterStore>,
    events: ViewEvents,
}

impl BugListView {
    #[must_use]
    pub fn new(bugs: Vec<Bug>, users: UserDirectory) -> Self {
        Self {
            bugs,
            users,
            criteria: FilterCriteria::default(),
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
            active: None,
            events: ViewEvents::new(),
        }
    }

    /// Attach persistence for the active filter selection.
    #[must_use]
    pub fn with_active_store(mut self, active: ActiveFilterStore) -> Self {
        self.active = Some(active);
        self
    }

    pub fn events_mut(&mut self) -> &mut ViewEvents {
        &mut self.events
    }

    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    #[must_use]
    pub const fn sort_field(&self) -> SortField {
        self.sort_field
    }

    #[must_use]
    pub const fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// The filtered, sorted list. Recomputed from the full set on every
    /// call; the underlying bug set is never modified.
    #[must_use]
    pub fn visible(&self) -> Vec<Bug> {
        let now = Utc::now();
        let mut visible: Vec<Bug> = self
            .bugs
            .iter()
            .filter(|bug| self.criteria.matches(bug, &self.users, now))
            .cloned()
            .collect();
        sort_bugs(&mut visible, self.sort_field, self.sort_direction);
        visible
    }

    // === Criterion setters ===

    pub fn set_search(&mut self, search: Option<String>) {
        self.criteria.search = search;
    }

    pub fn set_status(&mut self, status: Option<Status>) {
        self.criteria.status = status;
    }

    pub fn set_priority(&mut self, priority: Option<Priority>) {
        self.criteria.priority = priority;
    }

    pub fn set_severity(&mut self, severity: Option<Severity>) {
        self.criteria.severity = severity;
    }

    pub fn set_assignee(&mut self, assignee_id: Option<i64>) {
        self.criteria.assignee_id = assignee_id;
    }

    pub fn set_updated_within(&mut self, days: Option<u32>) {
        self.criteria.updated_within = days;
    }

    /// Number of active (non-default) filter dimensions.
    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        self.criteria.active_count()
    }

    /// Replace all criteria with a saved filter's definition, persist the
    /// selection, and announce the change.
    ///
    /// # Errors
    ///
    /// Returns an error if the selection cannot be persisted.
    pub fn apply_named_filter(&mut self, filter: &SavedFilter) -> Result<()> {
        self.criteria = filter.criteria.clone();
        if let Some(active) = &self.active {
            active.save(filter)?;
        }
        self.events.publish(&ViewEvent::FilterApplied {
            filter_id: filter.id,
            name: filter.name.clone(),
        });
        Ok(())
    }

    /// Reset every criterion and drop the persisted selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted selection cannot be removed.
    pub fn clear_all(&mut self) -> Result<()> {
        self.criteria = FilterCriteria::default();
        if let Some(active) = &self.active {
            active.clear()?;
        }
        self.events.publish(&ViewEvent::FiltersCleared);
        Ok(())
    }

    /// Toggle sorting: the same field flips direction, a new field
    /// starts ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        if field == self.sort_field {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Ascending;
        }
        self.events.publish(&ViewEvent::SortChanged {
            field: self.sort_field.as_str().to_string(),
            direction: self.sort_direction.as_str().to_string(),
        });
    }

    /// One badge per active criterion, in a fixed dimension order.
    #[must_use]
    pub fn active_badges(&self) -> Vec<FilterBadge> {
        let mut badges = Vec::new();
        if let Some(search) = self.criteria.search.as_deref() {
            let search = search.trim();
            if !search.is_empty() {
                badges.push(FilterBadge {
                    dimension: "search",
                    value: format!("\"{search}\""),
                });
            }
        }
        if let Some(status) = self.criteria.status {
            badges.push(FilterBadge {
                dimension: "status",
                value: status.to_string(),
            });
        }
        if let Some(priority) = self.criteria.priority {
            badges.push(FilterBadge {
                dimension: "priority",
                value: priority.to_string(),
            });
        }
        if let Some(severity) = self.criteria.severity {
            badges.push(FilterBadge {
                dimension: "severity",
                value: severity.to_string(),
            });
        }
        if let Some(assignee_id) = self.criteria.assignee_id {
            let value = self
                .users
                .display_name(assignee_id)
                .unwrap_or_else(|| format!("user #{assignee_id}"));
            badges.push(FilterBadge {
                dimension: "assignee",
                value,
            });
        }
        if let Some(days) = self.criteria.updated_within {
            badges.push(FilterBadge {
                dimension: "updated",
                value: format!("last {days}d"),
            });
        }
        badges
    }
}
