//! Database schema definitions.

use rusqlite::{Connection, Result};

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema for the bughive database.
pub const SCHEMA_SQL: &str = r"
    -- Users
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        role TEXT,
        active INTEGER NOT NULL DEFAULT 1
    );

    -- Projects
    CREATE TABLE IF NOT EXISTS projects (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT,
        lead_id INTEGER,
        status TEXT NOT NULL DEFAULT 'active',
        team_member_ids TEXT NOT NULL DEFAULT '[]',
        default_priority TEXT NOT NULL DEFAULT 'medium',
        environments TEXT NOT NULL DEFAULT '[]',
        created_at TEXT,
        FOREIGN KEY (lead_id) REFERENCES users(id)
    );

    -- Bugs
    CREATE TABLE IF NOT EXISTS bugs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        steps_to_reproduce TEXT,
        status TEXT NOT NULL DEFAULT 'open',
        priority TEXT NOT NULL DEFAULT 'medium',
        severity TEXT NOT NULL DEFAULT 'medium',
        assignee_id INTEGER,
        reporter_id INTEGER NOT NULL,
        project_id INTEGER NOT NULL,
        created_at TEXT,
        updated_at TEXT,
        env_browser TEXT,
        env_os TEXT,
        env_device TEXT,
        attachments TEXT NOT NULL DEFAULT '[]',
        CHECK (length(title) >= 1 AND length(title) <= 200),
        FOREIGN KEY (assignee_id) REFERENCES users(id),
        FOREIGN KEY (reporter_id) REFERENCES users(id),
        FOREIGN KEY (project_id) REFERENCES projects(id)
    );

    CREATE INDEX IF NOT EXISTS idx_bugs_status ON bugs(status);
    CREATE INDEX IF NOT EXISTS idx_bugs_priority ON bugs(priority);
    CREATE INDEX IF NOT EXISTS idx_bugs_severity ON bugs(severity);
    CREATE INDEX IF NOT EXISTS idx_bugs_assignee_id ON bugs(assignee_id);
    CREATE INDEX IF NOT EXISTS idx_bugs_project_id ON bugs(project_id);
    CREATE INDEX IF NOT EXISTS idx_bugs_updated_at ON bugs(updated_at);

    -- Saved filters (custom only; presets are built in and never stored)
    CREATE TABLE IF NOT EXISTS filters (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        criteria TEXT NOT NULL,
        icon TEXT,
        created_at TEXT NOT NULL
    );

    -- Notifications (one per status change)
    CREATE TABLE IF NOT EXISTS notifications (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        bug_id INTEGER NOT NULL,
        old_status TEXT NOT NULL,
        new_status TEXT NOT NULL,
        read INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        FOREIGN KEY (bug_id) REFERENCES bugs(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_notifications_read ON notifications(read);
    CREATE INDEX IF NOT EXISTS idx_notifications_bug_id ON notifications(bug_id);

    -- Metadata
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
";

/// Apply the schema to the database.
///
/// Uses `execute_batch` to run the entire DDL script. Idempotent because
/// all statements use `IF NOT EXISTS`.
///
/// # Errors
///
/// Returns an error if the SQL execution fails or pragmas cannot be set.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set journal mode to WAL for concurrency
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // Enable foreign keys
    conn.pragma_update(None, "foreign_keys", "ON")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_apply_schema() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).expect("Failed to apply schema");

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"bugs".to_string()));
        assert!(tables.contains(&"users".to_string()));
        assert!(tables.contains(&"projects".to_string()));
        assert!(tables.contains(&"filters".to_string()));
        assert!(tables.contains(&"notifications".to_string()));

        let foreign_keys: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(foreign_keys, 1);
    }

    #[test]
    fn test_apply_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        apply_schema(&conn).unwrap();
    }
}
