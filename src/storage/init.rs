//! Storage initialization
//!
//! Handles first-run setup: directories, a sample user configuration and
//! default settings. Existing files are never overwritten.

use crate::config::paths::ScroogePaths;
use crate::config::settings::Settings;
use crate::config::user::SAMPLE_USER_CONFIG;
use crate::error::ScroogeError;

/// Files written by [`initialize_storage`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub wrote_config: bool,
    pub wrote_settings: bool,
}

/// Initialize storage for a fresh installation
pub fn initialize_storage(paths: &ScroogePaths) -> Result<InitReport, ScroogeError> {
    paths.ensure_directories()?;
    let mut report = InitReport::default();

    let config_file = paths.user_config_file();
    if !config_file.exists() {
        std::fs::write(&config_file, SAMPLE_USER_CONFIG).map_err(|e| {
            ScroogeError::Io(format!("Failed to write {}: {}", config_file.display(), e))
        })?;
        report.wrote_config = true;
    }

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
        report.wrote_settings = true;
    }

    Ok(report)
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &ScroogePaths) -> bool {
    !paths.is_initialized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UserConfig;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ScroogePaths::with_base_dir(temp_dir.path().to_path_buf());
        assert!(needs_initialization(&paths));

        let report = initialize_storage(&paths).unwrap();
        assert!(report.wrote_config && report.wrote_settings);
        assert!(!needs_initialization(&paths));
        assert!(paths.backup_dir().exists());
        assert!(UserConfig::load(&paths).is_ok());
    }

    #[test]
    fn test_existing_files_kept() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ScroogePaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.user_config_file(), "available: 10\n").unwrap();

        let report = initialize_storage(&paths).unwrap();
        assert!(!report.wrote_config);
        assert!(report.wrote_settings);
        assert_eq!(
            std::fs::read_to_string(paths.user_config_file()).unwrap(),
            "available: 10\n"
        );

        let report = initialize_storage(&paths).unwrap();
        assert_eq!(report, InitReport::default());
    }
}
