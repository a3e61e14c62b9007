//! CLI definitions and entry point.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Bug tracker with saved filters (`SQLite`)
#[derive(Parser, Debug)]
#[command(name = "bh", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (auto-discover .bughive/*.db if not set)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Current user id (for "My Assigned Bugs" and defaults)
    #[arg(long, global = true, env = "BUGHIVE_USER")]
    pub user: Option<i64>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// `SQLite` busy timeout in ms
    #[arg(long, global = true)]
    pub lock_timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a bughive workspace
    Init {
        /// Overwrite existing workspace
        #[arg(long)]
        force: bool,
    },

    /// Report a new bug
    Create(CreateArgs),

    /// List bugs with filtering and sorting
    List(ListArgs),

    /// Show bug details
    Show {
        /// Bug id
        id: i64,
    },

    /// Update a bug
    Update(UpdateArgs),

    /// Manage users
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage projects
    Projects {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Manage saved filters
    Filter {
        #[command(subcommand)]
        command: FilterCommands,
    },

    /// Status-change notifications
    Notify {
        #[command(subcommand)]
        command: NotifyCommands,
    },

    /// Import records from upstream JSON exports
    Import(ImportArgs),

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Bug title
    pub title: String,

    /// Detailed description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Steps to reproduce
    #[arg(long)]
    pub steps: Option<String>,

    /// Priority (low, medium, high, critical)
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Severity (minor, medium, major, critical)
    #[arg(short, long)]
    pub severity: Option<String>,

    /// Assignee user id
    #[arg(short, long)]
    pub assignee: Option<i64>,

    /// Reporter user id (defaults to the current user)
    #[arg(short, long)]
    pub reporter: Option<i64>,

    /// Project id
    #[arg(long)]
    pub project: i64,

    /// Browser the bug was observed in
    #[arg(long)]
    pub browser: Option<String>,

    /// Operating system
    #[arg(long)]
    pub os: Option<String>,

    /// Device
    #[arg(long)]
    pub device: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Free-text search (title, description, people, id)
    #[arg(long)]
    pub search: Option<String>,

    /// Filter by status
    #[arg(long)]
    pub status: Option<String>,

    /// Filter by priority
    #[arg(long)]
    pub priority: Option<String>,

    /// Filter by severity
    #[arg(long)]
    pub severity: Option<String>,

    /// Filter by assignee user id
    #[arg(long)]
    pub assignee: Option<i64>,

    /// Only bugs updated within the last N days
    #[arg(long, value_name = "DAYS")]
    pub updated_within: Option<u32>,

    /// Apply a saved filter by id (presets are negative)
    #[arg(long, allow_hyphen_values = true)]
    pub filter: Option<i64>,

    /// Sort field (created_at, updated_at, title, priority, severity, status, id)
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort direction (asc, desc)
    #[arg(long)]
    pub direction: Option<String>,

    /// Show active filter badges above the list
    #[arg(long)]
    pub badges: bool,
}

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Bug id
    pub id: i64,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description
    #[arg(short, long)]
    pub description: Option<String>,

    /// New steps to reproduce
    #[arg(long)]
    pub steps: Option<String>,

    /// New status (open, in_progress, resolved, closed)
    #[arg(long)]
    pub status: Option<String>,

    /// New priority
    #[arg(short, long)]
    pub priority: Option<String>,

    /// New severity
    #[arg(short, long)]
    pub severity: Option<String>,

    /// New assignee user id
    #[arg(short, long, conflicts_with = "unassign")]
    pub assignee: Option<i64>,

    /// Clear the assignee
    #[arg(long)]
    pub unassign: bool,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// List users
    List,
    /// Add a user
    Add {
        first_name: String,
        last_name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        role: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List projects
    List,
    /// Add a project
    Add {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Lead user id
        #[arg(short, long)]
        lead: Option<i64>,
        /// Default priority for new bugs
        #[arg(long)]
        default_priority: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum FilterCommands {
    /// List presets and saved filters
    List,
    /// Save the given criteria as a named filter
    Save(FilterSaveArgs),
    /// Delete a saved filter
    Delete {
        /// Filter id (presets cannot be deleted)
        #[arg(allow_hyphen_values = true)]
        id: i64,
    },
    /// Rename a saved filter, optionally replacing its criteria
    Edit(FilterEditArgs),
    /// Apply a filter and persist it as the active selection
    Apply {
        /// Filter id (presets are negative)
        #[arg(allow_hyphen_values = true)]
        id: i64,
    },
    /// Show the active filter selection
    Active,
    /// Clear the active filter selection
    Clear,
}

#[derive(Args, Debug, Default)]
pub struct FilterSaveArgs {
    /// Filter name
    pub name: String,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub severity: Option<String>,
    #[arg(long)]
    pub assignee: Option<i64>,
    #[arg(long, value_name = "DAYS")]
    pub updated_within: Option<u32>,
}

#[derive(Args, Debug, Default)]
pub struct FilterEditArgs {
    /// Filter id
    pub id: i64,
    /// New name
    pub name: String,
    /// Replace the stored criteria with these flags (otherwise the
    /// filter keeps its own criteria)
    #[arg(long)]
    pub replace_criteria: bool,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub severity: Option<String>,
    #[arg(long)]
    pub assignee: Option<i64>,
    #[arg(long, value_name = "DAYS")]
    pub updated_within: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum NotifyCommands {
    /// List notifications
    List,
    /// Show the unread count
    Unread,
    /// Mark notifications read
    Read {
        /// Notification id (omit with --all)
        id: Option<i64>,
        /// Mark every notification read
        #[arg(long)]
        all: bool,
    },
    /// Delete all notifications
    Clear,
}

#[derive(Args, Debug, Default)]
pub struct ImportArgs {
    /// JSON array of bug records
    #[arg(long)]
    pub bugs: Option<PathBuf>,
    /// JSON array of user records
    #[arg(long)]
    pub users: Option<PathBuf>,
    /// JSON array of project records
    #[arg(long)]
    pub projects: Option<PathBuf>,
}
