//! Configuration management for `bughive`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables
//! 3. Workspace config (.bughive/config.yaml)
//! 4. Defaults

use crate::error::{BugHiveError, Result};
use crate::store::SqliteStore;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default database filename used when metadata is missing.
const DEFAULT_DB_FILENAME: &str = "bughive.db";
/// Filename holding the active filter selection.
const ACTIVE_FILTER_FILENAME: &str = "active_filter.json";

/// Startup metadata describing the database path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    pub database: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            database: DEFAULT_DB_FILENAME.to_string(),
        }
    }
}

impl Metadata {
    /// Load metadata.json from the bughive directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(bughive_dir: &Path) -> Result<Self> {
        let path = bughive_dir.join("metadata.json");
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)?;
        let mut metadata: Self = serde_json::from_str(&contents)?;

        if metadata.database.trim().is_empty() {
            metadata.database = DEFAULT_DB_FILENAME.to_string();
        }

        Ok(metadata)
    }

    /// Write metadata.json to the bughive directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, bughive_dir: &Path) -> Result<()> {
        let path = bughive_dir.join("metadata.json");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Workspace settings from .bughive/config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Settings {
    /// User id used by the "My Assigned Bugs" preset.
    #[serde(default)]
    pub current_user_id: Option<i64>,
    /// Disable ANSI colors in human output.
    #[serde(default)]
    pub no_color: Option<bool>,
    /// SQLite busy timeout in milliseconds.
    #[serde(default)]
    pub lock_timeout_ms: Option<u64>,
}

impl Settings {
    /// Load config.yaml from the bughive directory. A missing file yields
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(bughive_dir: &Path) -> Result<Self> {
        let path = bughive_dir.join("config.yaml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }
}

/// Per-invocation overrides from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db_path: Option<PathBuf>,
    pub current_user_id: Option<i64>,
    pub lock_timeout_ms: Option<u64>,
}

/// Resolved paths and settings for this workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub bughive_dir: PathBuf,
    pub db_path: PathBuf,
    pub active_filter_path: PathBuf,
    pub metadata: Metadata,
    pub settings: Settings,
}

impl ConfigPaths {
    /// Resolve paths using metadata, config.yaml, and overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if metadata or settings cannot be read.
    pub fn resolve(bughive_dir: &Path, overrides: &CliOverrides) -> Result<Self> {
        let metadata = Metadata::load(bughive_dir)?;
        let settings = Settings::load(bughive_dir)?;

        let db_path = overrides.db_path.clone().unwrap_or_else(|| {
            let candidate = PathBuf::from(&metadata.database);
            if candidate.is_absolute() {
                candidate
            } else {
                bughive_dir.join(candidate)
            }
        });

        Ok(Self {
            bughive_dir: bughive_dir.to_path_buf(),
            db_path,
            active_filter_path: bughive_dir.join(ACTIVE_FILTER_FILENAME),
            metadata,
            settings,
        })
    }

    /// The effective current-user id: CLI flag, then `BUGHIVE_USER`, then
    /// config.yaml.
    #[must_use]
    pub fn current_user_id(&self, overrides: &CliOverrides) -> Option<i64> {
        if let Some(id) = overrides.current_user_id {
            return Some(id);
        }
        if let Ok(value) = env::var("BUGHIVE_USER") {
            if let Ok(id) = value.trim().parse() {
                return Some(id);
            }
        }
        self.settings.current_user_id
    }
}

/// Discover the active `.bughive` directory.
///
/// Honors `BUGHIVE_DIR` when set, otherwise walks up from `start` (or
/// the CWD).
///
/// # Errors
///
/// Returns `NotInitialized` if no bughive directory is found.
pub fn discover_bughive_dir(start: Option<&Path>) -> Result<PathBuf> {
    if let Ok(value) = env::var("BUGHIVE_DIR") {
        if !value.trim().is_empty() {
            let path = PathBuf::from(value);
            if path.is_dir() {
                return Ok(path);
            }
        }
    }

    let mut current = match start {
        Some(path) => path.to_path_buf(),
        None => env::current_dir()?,
    };

    loop {
        let candidate = current.join(".bughive");
        if candidate.is_dir() {
            return Ok(candidate);
        }

        if !current.pop() {
            break;
        }
    }

    Err(BugHiveError::NotInitialized)
}

/// Create a fresh `.bughive` workspace under `root`.
///
/// # Errors
///
/// Returns `AlreadyInitialized` if the directory already exists (unless
/// `force`), or an I/O error if creation fails.
pub fn init_workspace(root: &Path, force: bool) -> Result<ConfigPaths> {
    let bughive_dir = root.join(".bughive");
    if bughive_dir.is_dir() && !force {
        return Err(BugHiveError::AlreadyInitialized { path: bughive_dir });
    }

    fs::create_dir_all(&bughive_dir)?;
    let metadata = Metadata::default();
    metadata.save(&bughive_dir)?;

    ConfigPaths::resolve(&bughive_dir, &CliOverrides::default())
}

/// Open the store using resolved config paths.
///
/// # Errors
///
/// Returns an error if config cannot be read or the database cannot be
/// opened.
pub fn open_store(bughive_dir: &Path, overrides: &CliOverrides) -> Result<(SqliteStore, ConfigPaths)> {
    let paths = ConfigPaths::resolve(bughive_dir, overrides)?;
    let lock_timeout = overrides
        .lock_timeout_ms
        .or(paths.settings.lock_timeout_ms)
        .or(Some(30_000));
    let store = SqliteStore::open_with_timeout(&paths.db_path, lock_timeout)?;
    Ok((store, paths))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = Metadata::load(dir.path()).unwrap();
        assert_eq!(metadata.database, DEFAULT_DB_FILENAME);
    }

    #[test]
    fn metadata_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = Metadata {
            database: "custom.db".to_string(),
        };
        metadata.save(dir.path()).unwrap();
        assert_eq!(Metadata::load(dir.path()).unwrap(), metadata);
    }

    #[test]
    fn settings_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert!(settings.current_user_id.is_none());
    }

    #[test]
    fn settings_parse_yaml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.yaml"),
            "current_user_id: 3\nlock_timeout_ms: 5000\n",
        )
        .unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.current_user_id, Some(3));
        assert_eq!(settings.lock_timeout_ms, Some(5000));
    }

    #[test]
    fn init_then_discover() {
        let dir = tempfile::tempdir().unwrap();
        let paths = init_workspace(dir.path(), false).unwrap();
        assert!(paths.bughive_dir.is_dir());
        assert!(paths.db_path.ends_with(DEFAULT_DB_FILENAME));

        let found = discover_bughive_dir(Some(dir.path())).unwrap();
        assert_eq!(found, paths.bughive_dir);
    }

    #[test]
    fn init_twice_fails_without_force() {
        let dir = tempfile::tempdir().unwrap();
        init_workspace(dir.path(), false).unwrap();
        let err = init_workspace(dir.path(), false).unwrap_err();
        assert!(matches!(err, BugHiveError::AlreadyInitialized { .. }));

        init_workspace(dir.path(), true).unwrap();
    }

    #[test]
    fn discover_walks_up_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        init_workspace(dir.path(), false).unwrap();
        let nested = dir.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();

        let found = discover_bughive_dir(Some(&nested)).unwrap();
        assert_eq!(found, dir.path().join(".bughive"));
    }

    #[test]
    fn discover_fails_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_bughive_dir(Some(dir.path())).unwrap_err();
        assert!(matches!(err, BugHiveError::NotInitialized));
    }

    #[test]
    fn cli_override_beats_settings_for_user() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.yaml"), "current_user_id: 3\n").unwrap();
        let paths = ConfigPaths::resolve(dir.path(), &CliOverrides::default()).unwrap();

        assert_eq!(paths.current_user_id(&CliOverrides::default()), Some(3));
        let overrides = CliOverrides {
            current_user_id: Some(9),
            ..Default::default()
        };
        assert_eq!(paths.current_user_id(&overrides), Some(9));
    }
}
