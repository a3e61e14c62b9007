//! Persistence layer.
//!
//! `SQLite` is the single source of truth for bugs, users, projects,
//! custom saved filters, and notifications. Preset filters are built in
//! and never stored.

pub mod schema;
pub mod sqlite;

pub use sqlite::{BugDraft, BugUpdate, SqliteStore};
