//! Where scrooge keeps its files
//!
//! Everything lives below one root directory:
//!
//! ```text
//! <root>/config.yml        user configuration (income, recurring expenses)
//! <root>/settings.json     display and backup settings
//! <root>/audit.log         one JSON line per change
//! <root>/data/             tags.json, logs.json, expenses.json
//! <root>/backups/          backup documents
//! ```
//!
//! The root is `$SCROOGE_CONFIG_DIR` when set, otherwise `scrooge` inside the
//! platform configuration directory (`$XDG_CONFIG_HOME`, `~/.config` or
//! `%APPDATA%`).

use std::path::{Path, PathBuf};

use crate::error::ScroogeError;

/// Environment variable overriding the root directory
pub const CONFIG_DIR_ENV: &str = "SCROOGE_CONFIG_DIR";

const APP_DIR: &str = "scrooge";

#[derive(Debug, Clone)]
pub struct ScroogePaths {
    root: PathBuf,
}

impl ScroogePaths {
    /// Resolve the root from the environment
    pub fn new() -> Result<Self, ScroogeError> {
        let root = match non_empty_var(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => platform_config_dir()?.join(APP_DIR),
        };
        Ok(Self { root })
    }

    pub fn with_base_dir(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.root.join("backups")
    }

    pub fn user_config_file(&self) -> PathBuf {
        self.root.join("config.yml")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.root.join("settings.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.root.join("audit.log")
    }

    pub fn tags_file(&self) -> PathBuf {
        self.data_dir().join("tags.json")
    }

    pub fn logs_file(&self) -> PathBuf {
        self.data_dir().join("logs.json")
    }

    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    /// Create the root, data and backup directories
    pub fn ensure_directories(&self) -> Result<(), ScroogeError> {
        for (what, dir) in [
            ("config", self.root.clone()),
            ("data", self.data_dir()),
            ("backup", self.backup_dir()),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                ScroogeError::Io(format!(
                    "Failed to create {} directory {}: {}",
                    what,
                    dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// True once a user configuration has been written
    pub fn is_initialized(&self) -> bool {
        self.user_config_file().is_file()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(not(windows))]
fn platform_config_dir() -> Result<PathBuf, ScroogeError> {
    if let Some(xdg) = non_empty_var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg));
    }
    non_empty_var("HOME")
        .map(|home| PathBuf::from(home).join(".config"))
        .ok_or_else(|| ScroogeError::Config("Could not determine HOME directory".into()))
}

#[cfg(windows)]
fn platform_config_dir() -> Result<PathBuf, ScroogeError> {
    non_empty_var("APPDATA")
        .map(PathBuf::from)
        .ok_or_else(|| ScroogeError::Config("Could not determine APPDATA directory".into()))
}
