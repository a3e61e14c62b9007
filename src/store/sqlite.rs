//! `SQLite` storage implementation.

use crate::error::{BugHiveError, Result};
use crate::model::{
    Bug, Environment, FilterCriteria, FilterKind, Notification, Priority, Project, ProjectStatus,
    SavedFilter, Severity, Status, User, UserDirectory,
};
use crate::store::schema::apply_schema;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

/// Fields for a new bug. Status is always Open on creation; timestamps
/// are stamped by the store.
#[derive(Debug, Clone, Default)]
pub struct BugDraft {
    pub title: String,
    pub description: Option<String>,
    pub steps_to_reproduce: Option<String>,
    pub priority: Priority,
    pub severity: Severity,
    pub assignee_id: Option<i64>,
    pub reporter_id: i64,
    pub project_id: i64,
    pub environment: Environment,
    pub attachments: Vec<String>,
}

/// Field-sparse update for a bug. `None` means "leave unchanged";
/// `Some(None)` on optional fields clears them.
#[derive(Debug, Clone, Default)]
pub struct BugUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub steps_to_reproduce: Option<Option<String>>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub severity: Option<Severity>,
    pub assignee_id: Option<Option<i64>>,
}

impl BugUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.steps_to_reproduce.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.severity.is_none()
            && self.assignee_id.is_none()
    }
}

fn parse_ts(value: Option<String>) -> Option<DateTime<Utc>> {
    value
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_id_list(json: &str) -> Vec<i64> {
    serde_json::from_str(json).unwrap_or_default()
}

fn parse_string_list(json: &str) -> Vec<String> {
    serde_json::from_str(json).unwrap_or_default()
}

fn row_to_bug(row: &Row<'_>) -> rusqlite::Result<Bug> {
    let status: String = row.get("status")?;
    let priority: String = row.get("priority")?;
    let severity: String = row.get("severity")?;
    let attachments: String = row.get("attachments")?;

    Ok(Bug {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        steps_to_reproduce: row.get("steps_to_reproduce")?,
        status: Status::from_str(&status).unwrap_or_default(),
        priority: Priority::from_str(&priority).unwrap_or_default(),
        severity: Severity::from_str(&severity).unwrap_or_default(),
        assignee_id: row.get("assignee_id")?,
        reporter_id: row.get("reporter_id")?,
        project_id: row.get("project_id")?,
        created_at: parse_ts(row.get("created_at")?),
        updated_at: parse_ts(row.get("updated_at")?),
        environment: Environment {
            browser: row.get("env_browser")?,
            os: row.get("env_os")?,
            device: row.get("env_device")?,
        },
        attachments: parse_string_list(&attachments),
    })
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        role: row.get("role")?,
        active: row.get("active")?,
    })
}

fn row_to_project(row: &Row<'_>) -> rusqlite::Result<Project> {
    let status: String = row.get("status")?;
    let default_priority: String = row.get("default_priority")?;
    let team: String = row.get("team_member_ids")?;
    let environments: String = row.get("environments")?;

    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        lead_id: row.get("lead_id")?,
        status: ProjectStatus::from_str(&status).unwrap_or_default(),
        team_member_ids: parse_id_list(&team),
        default_priority: Priority::from_str(&default_priority).unwrap_or_default(),
        environments: parse_string_list(&environments),
        created_at: parse_ts(row.get("created_at")?),
    })
}

fn row_to_filter(row: &Row<'_>) -> rusqlite::Result<SavedFilter> {
    let criteria_json: String = row.get("criteria")?;

    Ok(SavedFilter {
        id: row.get("id")?,
        name: row.get("name")?,
        kind: FilterKind::Custom,
        criteria: serde_json::from_str(&criteria_json).unwrap_or_default(),
        icon: row.get("icon")?,
        created_at: parse_ts(row.get("created_at")?),
    })
}

fn row_to_notification(row: &Row<'_>) -> rusqlite::Result<Notification> {
    let old_status: String = row.get("old_status")?;
    let new_status: String = row.get("new_status")?;

    Ok(Notification {
        id: row.get("id")?,
        bug_id: row.get("bug_id")?,
        old_status: Status::from_str(&old_status).unwrap_or_default(),
        new_status: Status::from_str(&new_status).unwrap_or_default(),
        read: row.get("read")?,
        created_at: parse_ts(row.get("created_at")?).unwrap_or_else(Utc::now),
    })
}

impl SqliteStore {
    /// Open a new connection to the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema
    /// application fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a new connection with an optional busy timeout (ms).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema
    /// application fails.
    pub fn open_with_timeout(path: &Path, lock_timeout_ms: Option<u64>) -> Result<Self> {
        let conn = Connection::open(path)?;
        if let Some(timeout) = lock_timeout_ms {
            conn.busy_timeout(Duration::from_millis(timeout))?;
        }
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    // === Bugs ===

    /// Create a new bug. Status is fixed to Open and both timestamps are
    /// stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is blank or the insert fails.
    pub fn create_bug(&mut self, draft: &BugDraft) -> Result<Bug> {
        if draft.title.trim().is_empty() {
            return Err(BugHiveError::validation("title", "cannot be empty"));
        }

        let now = Utc::now().to_rfc3339();
        let attachments = serde_json::to_string(&draft.attachments)?;

        self.conn.execute(
            "INSERT INTO bugs (
                title, description, steps_to_reproduce, status, priority, severity,
                assignee_id, reporter_id, project_id, created_at, updated_at,
                env_browser, env_os, env_device, attachments
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                draft.title,
                draft.description,
                draft.steps_to_reproduce,
                Status::Open.as_str(),
                draft.priority.as_str(),
                draft.severity.as_str(),
                draft.assignee_id,
                draft.reporter_id,
                draft.project_id,
                now,
                now,
                draft.environment.browser,
                draft.environment.os,
                draft.environment.device,
                attachments,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(id, title = %draft.title, "created bug");
        self.require_bug(id)
    }

    /// Fetch a bug by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_bug(&self, id: i64) -> Result<Option<Bug>> {
        let bug = self
            .conn
            .query_row("SELECT * FROM bugs WHERE id = ?", [id], |row| {
                row_to_bug(row)
            })
            .optional()?;
        Ok(bug)
    }

    fn require_bug(&self, id: i64) -> Result<Bug> {
        self.get_bug(id)?
            .ok_or(BugHiveError::BugNotFound { id })
    }

    /// List all bugs, newest first by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_bugs(&self) -> Result<Vec<Bug>> {
        let mut stmt = self.conn.prepare("SELECT * FROM bugs ORDER BY id")?;
        let bugs = stmt
            .query_map([], |row| row_to_bug(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(bugs)
    }

    /// Update a bug's fields. A status change inserts a notification row
    /// in the same transaction, so the record and its notification commit
    /// or roll back together.
    ///
    /// # Errors
    ///
    /// Returns `BugNotFound` if the bug doesn't exist, or a store error if
    /// the update fails.
    pub fn update_bug(&mut self, id: i64, updates: &BugUpdate) -> Result<Bug> {
        let existing = self.require_bug(id)?;

        if updates.is_empty() {
            return Ok(existing);
        }

        let tx = self.conn.transaction()?;

        let mut set_clauses: Vec<String> = vec![];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![];

        let mut add_update = |field: &str, val: Box<dyn rusqlite::ToSql>| {
            set_clauses.push(format!("{field} = ?"));
            params.push(val);
        };

        if let Some(ref title) = updates.title {
            if title.trim().is_empty() {
                return Err(BugHiveError::validation("title", "cannot be empty"));
            }
            add_update("title", Box::new(title.clone()));
        }
        if let Some(ref val) = updates.description {
            add_update("description", Box::new(val.clone()));
        }
        if let Some(ref val) = updates.steps_to_reproduce {
            add_update("steps_to_reproduce", Box::new(val.clone()));
        }
        if let Some(status) = updates.status {
            add_update("status", Box::new(status.as_str()));
        }
        if let Some(priority) = updates.priority {
            add_update("priority", Box::new(priority.as_str()));
        }
        if let Some(severity) = updates.severity {
            add_update("severity", Box::new(severity.as_str()));
        }
        if let Some(ref val) = updates.assignee_id {
            add_update("assignee_id", Box::new(*val));
        }

        let now = Utc::now().to_rfc3339();
        add_update("updated_at", Box::new(now.clone()));

        let sql = format!("UPDATE bugs SET {} WHERE id = ?", set_clauses.join(", "));
        params.push(Box::new(id));

        tx.execute(&sql, rusqlite::params_from_iter(params.iter()))?;

        // Status change produces a notification atomically with the update.
        if let Some(new_status) = updates.status {
            if new_status != existing.status {
                tx.execute(
                    "INSERT INTO notifications (bug_id, old_status, new_status, read, created_at)
                     VALUES (?, ?, ?, 0, ?)",
                    rusqlite::params![id, existing.status.as_str(), new_status.as_str(), now],
                )?;
                debug!(
                    id,
                    from = existing.status.as_str(),
                    to = new_status.as_str(),
                    "status changed, notification queued"
                );
            }
        }

        tx.commit()?;
        self.require_bug(id)
    }

    /// Delete a bug. No CLI surface exposes this; it exists for
    /// programmatic cleanup.
    ///
    /// # Errors
    ///
    /// Returns `BugNotFound` if no row was deleted.
    pub fn delete_bug(&mut self, id: i64) -> Result<()> {
        let affected = self.conn.execute("DELETE FROM bugs WHERE id = ?", [id])?;
        if affected == 0 {
            return Err(BugHiveError::BugNotFound { id });
        }
        Ok(())
    }

    /// Insert or replace a bug with its upstream id. Used by import,
    /// where ids are assigned by the source system.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn import_bug(&mut self, bug: &Bug) -> Result<()> {
        let attachments = serde_json::to_string(&bug.attachments)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO bugs (
                id, title, description, steps_to_reproduce, status, priority, severity,
                assignee_id, reporter_id, project_id, created_at, updated_at,
                env_browser, env_os, env_device, attachments
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                bug.id,
                bug.title,
                bug.description,
                bug.steps_to_reproduce,
                bug.status.as_str(),
                bug.priority.as_str(),
                bug.severity.as_str(),
                bug.assignee_id,
                bug.reporter_id,
                bug.project_id,
                bug.created_at.map(|dt| dt.to_rfc3339()),
                bug.updated_at.map(|dt| dt.to_rfc3339()),
                bug.environment.browser,
                bug.environment.os,
                bug.environment.device,
                attachments,
            ],
        )?;
        Ok(())
    }

    /// Insert or replace a user with its upstream id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn import_user(&mut self, user: &User) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO users (id, first_name, last_name, email, role, active)
             VALUES (?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                user.id,
                user.first_name,
                user.last_name,
                user.email,
                user.role,
                user.active
            ],
        )?;
        Ok(())
    }

    /// Insert or replace a project with its upstream id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn import_project(&mut self, project: &Project) -> Result<()> {
        let team = serde_json::to_string(&project.team_member_ids)?;
        let environments = serde_json::to_string(&project.environments)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO projects (
                id, name, description, lead_id, status, team_member_ids,
                default_priority, environments, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                project.id,
                project.name,
                project.description,
                project.lead_id,
                project.status.as_str(),
                team,
                project.default_priority.as_str(),
                environments,
                project.created_at.map(|dt| dt.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    // === Users ===

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (e.g. duplicate email).
    pub fn create_user(&mut self, user: &User) -> Result<User> {
        self.conn.execute(
            "INSERT INTO users (first_name, last_name, email, role, active)
             VALUES (?, ?, ?, ?, ?)",
            rusqlite::params![
                user.first_name,
                user.last_name,
                user.email,
                user.role,
                user.active
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_user(id)?.ok_or(BugHiveError::UserNotFound { id })
    }

    /// Fetch a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row("SELECT * FROM users WHERE id = ?", [id], |row| {
                row_to_user(row)
            })
            .optional()?;
        Ok(user)
    }

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare("SELECT * FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], |row| row_to_user(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    /// Build an id-indexed directory of all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn user_directory(&self) -> Result<UserDirectory> {
        Ok(UserDirectory::new(self.list_users()?))
    }

    // === Projects ===

    /// Create a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_project(&mut self, project: &Project) -> Result<Project> {
        let team = serde_json::to_string(&project.team_member_ids)?;
        let environments = serde_json::to_string(&project.environments)?;
        let created_at = project
            .created_at
            .unwrap_or_else(Utc::now)
            .to_rfc3339();

        self.conn.execute(
            "INSERT INTO projects (
                name, description, lead_id, status, team_member_ids,
                default_priority, environments, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                project.name,
                project.description,
                project.lead_id,
                project.status.as_str(),
                team,
                project.default_priority.as_str(),
                environments,
                created_at,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_project(id)?
            .ok_or(BugHiveError::ProjectNotFound { id })
    }

    /// Fetch a project by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_project(&self, id: i64) -> Result<Option<Project>> {
        let project = self
            .conn
            .query_row("SELECT * FROM projects WHERE id = ?", [id], |row| {
                row_to_project(row)
            })
            .optional()?;
        Ok(project)
    }

    /// List all projects.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare("SELECT * FROM projects ORDER BY id")?;
        let projects = stmt
            .query_map([], |row| row_to_project(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(projects)
    }

    // === Saved filters (custom only) ===

    /// Insert a custom filter. The AUTOINCREMENT id is strictly greater
    /// than any id ever issued, so custom ids stay positive and monotonic.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_filter(
        &mut self,
        name: &str,
        criteria: &FilterCriteria,
        icon: Option<&str>,
    ) -> Result<SavedFilter> {
        let criteria_json = serde_json::to_string(criteria)?;
        let now = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO filters (name, criteria, icon, created_at) VALUES (?, ?, ?, ?)",
            rusqlite::params![name, criteria_json, icon, now],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_filter(id)?
            .ok_or(BugHiveError::FilterNotFound { id })
    }

    /// Fetch a custom filter by id. Preset ids (<= 0) never match.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_filter(&self, id: i64) -> Result<Option<SavedFilter>> {
        let filter = self
            .conn
            .query_row("SELECT * FROM filters WHERE id = ?", [id], |row| {
                row_to_filter(row)
            })
            .optional()?;
        Ok(filter)
    }

    /// List all custom filters, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_custom_filters(&self) -> Result<Vec<SavedFilter>> {
        let mut stmt = self.conn.prepare("SELECT * FROM filters ORDER BY id")?;
        let filters = stmt
            .query_map([], |row| row_to_filter(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(filters)
    }

    /// Delete a custom filter. Returns the number of rows removed so the
    /// caller can distinguish "deleted" from "was never there".
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_filter(&mut self, id: i64) -> Result<usize> {
        let affected = self.conn.execute("DELETE FROM filters WHERE id = ?", [id])?;
        Ok(affected)
    }

    // === Notifications ===

    /// List notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_notifications(&self) -> Result<Vec<Notification>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM notifications ORDER BY id DESC")?;
        let notifications = stmt
            .query_map([], |row| row_to_notification(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notifications)
    }

    /// Count unread notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn unread_count(&self) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE read = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Mark one notification read.
    ///
    /// # Errors
    ///
    /// Returns `NotificationNotFound` if the id doesn't exist.
    pub fn mark_read(&mut self, id: i64) -> Result<()> {
        let affected = self
            .conn
            .execute("UPDATE notifications SET read = 1 WHERE id = ?", [id])?;
        if affected == 0 {
            return Err(BugHiveError::NotificationNotFound { id });
        }
        Ok(())
    }

    /// Mark every notification read.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_all_read(&mut self) -> Result<usize> {
        let affected = self
            .conn
            .execute("UPDATE notifications SET read = 1 WHERE read = 0", [])?;
        Ok(affected)
    }

    /// Delete all notifications in a single transaction. All-or-nothing:
    /// a failure leaves every notification in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_all_notifications(&mut self) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let affected = tx.execute("DELETE FROM notifications", [])?;
        tx.commit()?;
        Ok(affected)
    }
}
