//! Backup restoration for scrooge
//!
//! Replaces everything stored with the content of a backup document.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::audit::AuditEntry;
use crate::error::ScroogeResult;
use crate::storage::Repository;

use super::manager::BackupManager;

/// Handles restoring from backups
pub struct RestoreManager<'a, R: Repository> {
    repo: &'a R,
    backups: &'a BackupManager,
}

impl<'a, R: Repository> RestoreManager<'a, R> {
    /// Create a new RestoreManager
    pub fn new(repo: &'a R, backups: &'a BackupManager) -> Self {
        Self { repo, backups }
    }

    /// Restore data from a backup file
    ///
    /// The document is validated completely before anything is touched. The
    /// current state is saved as a new backup first, so a restore can be
    /// undone by restoring that one.
    pub fn restore_from_file(&self, backup_path: &Path) -> ScroogeResult<RestoreResult> {
        let document = self.backups.read_backup(backup_path)?;
        let schema_version = document.schema_version;
        let backup_date = document.created_at;
        let data = document.into_records()?;

        let safety_backup = self.backups.create_backup(self.repo)?;

        let result = RestoreResult {
            schema_version,
            backup_date,
            safety_backup,
            tags: data.tags.len(),
            logs: data.logs.len(),
            expenses: data.expenses.len(),
        };

        self.repo.replace_all(data)?;
        self.repo.persist()?;
        self.repo.record(AuditEntry::restore(
            backup_path.display().to_string(),
            result.summary(),
        ))?;

        Ok(result)
    }

    /// Validate a backup file without restoring it
    pub fn validate_backup(&self, backup_path: &Path) -> ScroogeResult<ValidationResult> {
        let document = self.backups.read_backup(backup_path)?;
        let schema_version = document.schema_version;
        let backup_date = document.created_at;
        let data = document.into_records()?;

        Ok(ValidationResult {
            schema_version,
            backup_date,
            tags: data.tags.len(),
            logs: data.logs.len(),
            expenses: data.expenses.len(),
        })
    }
}

/// Result of a restore operation
#[derive(Debug)]
pub struct RestoreResult {
    /// Schema version of the restored backup
    pub schema_version: u32,
    /// Date the backup was created
    pub backup_date: DateTime<Utc>,
    /// Backup of the state that was replaced
    pub safety_backup: PathBuf,
    pub tags: usize,
    pub logs: usize,
    pub expenses: usize,
}

impl RestoreResult {
    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        format!(
            "Restored {} tags, {} monthly logs and {} expenses from {}",
            self.tags,
            self.logs,
            self.expenses,
            self.backup_date.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

/// Result of validating a backup
#[derive(Debug)]
pub struct ValidationResult {
    pub schema_version: u32,
    pub backup_date: DateTime<Utc>,
    pub tags: usize,
    pub logs: usize,
    pub expenses: usize,
}

impl ValidationResult {
    pub fn summary(&self) -> String {
        format!(
            "Valid backup (v{}): {} tags, {} monthly logs, {} expenses",
            self.schema_version, self.tags, self.logs, self.expenses
        )
    }
}
