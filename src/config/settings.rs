//! Application settings for scrooge
//!
//! Display preferences and the backup retention policy. Stored as
//! `settings.json` next to the user configuration; missing keys fall back to
//! their defaults, so an empty object is a valid file.

use serde::{Deserialize, Serialize};

use super::paths::ScroogePaths;
use crate::error::ScroogeError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Appended to every amount, as in `12.50€`
    pub currency_symbol: String,

    /// strftime pattern for dates in command output
    pub date_format: String,

    /// Automatic and manual backups beyond this count are pruned, oldest first
    pub backups_kept: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_symbol: "€".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            backups_kept: 5,
        }
    }
}

impl Settings {
    /// Read `settings.json`, or use the defaults if it does not exist
    ///
    /// Nothing is written here; `scrooge init` persists the defaults.
    pub fn load_or_create(paths: &ScroogePaths) -> Result<Self, ScroogeError> {
        let path = paths.settings_file();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .map_err(|e| ScroogeError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| ScroogeError::Config(format!("Invalid {}: {}", path.display(), e)))
    }

    pub fn save(&self, paths: &ScroogePaths) -> Result<(), ScroogeError> {
        paths.ensure_directories()?;
        let path = paths.settings_file();

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ScroogeError::Config(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(&path, contents)
            .map_err(|e| ScroogeError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }
}
