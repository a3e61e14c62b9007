//! Saved filter management.
//!
//! Two populations share one id space: built-in presets with reserved
//! negative ids, and user-created custom filters with store-assigned
//! positive ids. Presets are immutable; every mutation path rejects
//! preset ids before touching the store.

use crate::error::{BugHiveError, Result};
use crate::model::{FilterCriteria, FilterKind, Priority, SavedFilter, Status};
use crate::store::SqliteStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub const PRESET_MY_ASSIGNED: i64 = -1;
pub const PRESET_HIGH_PRIORITY_OPEN: i64 = -2;
pub const PRESET_CRITICAL: i64 = -3;
pub const PRESET_RECENTLY_UPDATED: i64 = -4;

/// Built-in preset filters. "My Assigned Bugs" takes the current user's
/// id at call time; the other presets are fixed.
#[must_use]
pub fn presets(current_user_id: Option<i64>) -> Vec<SavedFilter> {
    vec![
        SavedFilter {
            id: PRESET_MY_ASSIGNED,
            name: "My Assigned Bugs".to_string(),
            kind: FilterKind::Preset,
            criteria: FilterCriteria {
                assignee_id: current_user_id,
                ..Default::default()
            },
            icon: Some("user".to_string()),
            created_at: None,
        },
        SavedFilter {
            id: PRESET_HIGH_PRIORITY_OPEN,
            name: "High Priority Open".to_string(),
            kind: FilterKind::Preset,
            criteria: FilterCriteria {
                priority: Some(Priority::High),
                status: Some(Status::Open),
                ..Default::default()
            },
            icon: Some("flame".to_string()),
            created_at: None,
        },
        SavedFilter {
            id: PRESET_CRITICAL,
            name: "Critical Issues".to_string(),
            kind: FilterKind::Preset,
            criteria: FilterCriteria {
                priority: Some(Priority::Critical),
                ..Default::default()
            },
            icon: Some("alert".to_string()),
            created_at: None,
        },
        SavedFilter {
            id: PRESET_RECENTLY_UPDATED,
            name: "Recently Updated".to_string(),
            kind: FilterKind::Preset,
            criteria: FilterCriteria {
                updated_within: Some(7),
                ..Default::default()
            },
            icon: Some("clock".to_string()),
            created_at: None,
        },
    ]
}

/// The persisted record of which filter is currently applied.
///
/// Lives in its own small JSON file, separate from filter definitions,
/// and is absent until a filter is first applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActiveFilter {
    pub filter_id: i64,
    pub name: String,
}

/// File-backed persistence for the active filter selection.
#[derive(Debug, Clone)]
pub struct ActiveFilterStore {
    path: PathBuf,
}

impl ActiveFilterStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The current selection, or `None` if no filter has been applied.
    ///
    /// # Errors
    ///
    /// Returns an error on unreadable or malformed state.
    pub fn load(&self) -> Result<Option<ActiveFilter>> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist `filter` as the active selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, filter: &SavedFilter) -> Result<()> {
        let active = ActiveFilter {
            filter_id: filter.id,
            name: filter.name.clone(),
        };
        let json = serde_json::to_string_pretty(&active)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Remove the selection. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error on any other I/O failure.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Manages saved filters on top of the store plus the active-filter file.
pub struct FilterManager<'a> {
    store: &'a mut SqliteStore,
    active: ActiveFilterStore,
    current_user_id: Option<i64>,
}

impl<'a> FilterManager<'a> {
    pub fn new(
        store: &'a mut SqliteStore,
        active_path: impl Into<PathBuf>,
        current_user_id: Option<i64>,
    ) -> Self {
        Self {
            store,
            active: ActiveFilterStore::new(active_path),
            current_user_id,
        }
    }

    /// All filters: presets first, then custom filters in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub fn list_filters(&self) -> Result<Vec<SavedFilter>> {
        let mut all = presets(self.current_user_id);
        all.extend(self.store.list_custom_filters()?);
        Ok(all)
    }

    /// Look up one filter, preset or custom.
    ///
    /// # Errors
    ///
    /// Returns `FilterNotFound` if the id matches nothing.
    pub fn get_filter(&self, id: i64) -> Result<SavedFilter> {
        if id <= 0 {
            return presets(self.current_user_id)
                .into_iter()
                .find(|f| f.id == id)
                .ok_or(BugHiveError::FilterNotFound { id });
        }
        self.store
            .get_filter(id)?
            .ok_or(BugHiveError::FilterNotFound { id })
    }

    /// Save a new custom filter. The id is allocated by the store and is
    /// strictly greater than any custom id ever issued.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name.
    pub fn save_filter(&mut self, name: &str, criteria: &FilterCriteria) -> Result<SavedFilter> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BugHiveError::validation("name", "cannot be empty"));
        }
        let saved = self.store.insert_filter(name, criteria, None)?;
        debug!(id = saved.id, name = %saved.name, "saved custom filter");
        Ok(saved)
    }

    /// Delete a custom filter. Presets (id <= 0) are always rejected, and
    /// deleting an id twice fails the second time.
    ///
    /// # Errors
    ///
    /// `PresetImmutable` for preset ids, `FilterNotFound` for unknown
    /// custom ids.
    pub fn delete_filter(&mut self, id: i64) -> Result<()> {
        if id <= 0 {
            return Err(BugHiveError::PresetImmutable { id });
        }
        if self.store.delete_filter(id)? == 0 {
            return Err(BugHiveError::FilterNotFound { id });
        }

        // A deleted filter can no longer be the active one.
        if self.load_active()?.is_some_and(|a| a.filter_id == id) {
            self.clear_active()?;
        }
        debug!(id, "deleted custom filter");
        Ok(())
    }

    /// Rename and/or re-criteria a custom filter, keeping snapshot
    /// semantics: when `criteria` is `None` the filter's OWN stored
    /// criteria are carried over unchanged. Implemented as
    /// delete-then-recreate, so the edited filter receives a fresh id.
    ///
    /// # Errors
    ///
    /// `PresetImmutable` for preset ids, `FilterNotFound` for unknown ids,
    /// `Validation` for a blank replacement name (the original filter is
    /// left untouched).
    pub fn update_filter(
        &mut self,
        id: i64,
        new_name: &str,
        criteria: Option<&FilterCriteria>,
    ) -> Result<SavedFilter> {
        if id <= 0 {
            return Err(BugHiveError::PresetImmutable { id });
        }
        // Validate the replacement name before touching the store, so a
        // failed edit never loses the original filter.
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(BugHiveError::validation("name", "cannot be empty"));
        }
        let existing = self
            .store
            .get_filter(id)?
            .ok_or(BugHiveError::FilterNotFound { id })?;

        let was_active = self.load_active()?.is_some_and(|a| a.filter_id == id);

        let criteria = criteria.unwrap_or(&existing.criteria).clone();
        self.store.delete_filter(id)?;
        let replacement = self.save_filter(new_name, &criteria)?;

        if was_active {
            self.save_active(&replacement)?;
        }
        Ok(replacement)
    }

    /// The currently applied filter selection, if any.
    ///
    /// # Errors
    ///
    /// Returns an error on unreadable or malformed state.
    pub fn load_active(&self) -> Result<Option<ActiveFilter>> {
        self.active.load()
    }

    /// Persist `filter` as the active selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_active(&self, filter: &SavedFilter) -> Result<()> {
        self.active.save(filter)
    }

    /// Remove the active selection. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error on any other I/O failure.
    pub fn clear_active(&self) -> Result<()> {
        self.active.clear()
    }
}
