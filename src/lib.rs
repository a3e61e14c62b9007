//! `bughive` - a bug tracker with saved filters.
//!
//! The library is organized around a small set of collaborating
//! modules:
//! - [`model`] - core data types (bugs, users, projects, filters)
//! - [`store`] - `SQLite` persistence
//! - [`filter`] - predicate evaluation, sorting, saved filters
//! - [`view`] - the bug list view-model and its event bus
//! - [`notify`] - the notification feed
//! - [`ingest`] - normalization of upstream record exports
//! - [`cli`] - the `bh` command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod notify;
pub mod store;
pub mod view;

pub use error::{BugHiveError, ErrorCode, Result, StructuredError};
