//! Storage layer for scrooge
//!
//! Provides the `Repository` contract plus two implementations: JSON file
//! storage with atomic writes, and an in-memory repository for tests.

pub mod expenses;
pub mod file_io;
pub mod init;
pub mod logs;
pub mod memory;
pub mod repository;
pub mod tags;

pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use logs::LogRepository;
pub use memory::MemoryRepository;
pub use repository::{CreatedLog, DataSet, Repository};
pub use tags::TagRepository;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::ScroogePaths;
use crate::error::{ScroogeError, ScroogeResult};
use crate::models::{Expense, LogId, MonthlyLog, Tag};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: ScroogePaths,
    pub tags: TagRepository,
    pub logs: LogRepository,
    pub expenses: ExpenseRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: ScroogePaths) -> Result<Self, ScroogeError> {
        paths.ensure_directories()?;

        Ok(Self {
            tags: TagRepository::new(paths.tags_file()),
            logs: LogRepository::new(paths.logs_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Create a Storage instance and load everything from disk
    pub fn open(paths: ScroogePaths) -> Result<Self, ScroogeError> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &ScroogePaths {
        &self.paths
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), ScroogeError> {
        self.tags.load()?;
        self.logs.load()?;
        self.expenses.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), ScroogeError> {
        self.tags.save()?;
        self.logs.save()?;
        self.expenses.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

impl Repository for Storage {
    fn all_tags(&self) -> ScroogeResult<Vec<Tag>> {
        self.tags.get_all()
    }

    fn find_tag_by_name(&self, name: &str) -> ScroogeResult<Option<Tag>> {
        self.tags.get_by_name(name)
    }

    fn all_logs(&self) -> ScroogeResult<Vec<MonthlyLog>> {
        self.logs.get_all()
    }

    fn find_log(&self, month: u32, year: i32) -> ScroogeResult<Option<MonthlyLog>> {
        self.logs.get_for_month(month, year)
    }

    fn all_expenses(&self, log: LogId) -> ScroogeResult<Vec<Expense>> {
        self.expenses.get_by_log(log)
    }

    fn every_expense(&self) -> ScroogeResult<Vec<Expense>> {
        self.expenses.get_all()
    }

    fn insert_tag(&self, tag: Tag) -> ScroogeResult<()> {
        if self.tags.get(tag.id)?.is_some() {
            return Err(ScroogeError::Duplicate {
                entity_type: "Tag",
                identifier: tag.name,
            });
        }
        self.tags.upsert(tag)
    }

    fn update_tag(&self, tag: Tag) -> ScroogeResult<()> {
        if self.tags.get(tag.id)?.is_none() {
            return Err(ScroogeError::tag_not_found(tag.name));
        }
        self.tags.upsert(tag)
    }

    fn insert_log(&self, log: MonthlyLog) -> ScroogeResult<()> {
        self.logs.upsert(log)
    }

    fn insert_expense(&self, expense: Expense) -> ScroogeResult<()> {
        self.expenses.insert(expense)
    }

    fn delete_log(&self, id: LogId) -> ScroogeResult<()> {
        self.expenses.delete_by_log(id)?;
        self.logs.delete(id)?;
        Ok(())
    }

    fn replace_all(&self, data: DataSet) -> ScroogeResult<()> {
        self.tags.replace_all(data.tags)?;
        self.logs.replace_all(data.logs)?;
        self.expenses.replace_all(data.expenses)?;
        Ok(())
    }

    fn persist(&self) -> ScroogeResult<()> {
        self.save_all()
    }

    fn record(&self, entry: AuditEntry) -> ScroogeResult<()> {
        self.audit.log(&entry)
    }

    fn record_all(&self, entries: Vec<AuditEntry>) -> ScroogeResult<()> {
        self.audit.log_batch(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ScroogePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_storage();

        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("backups").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_create_log_persists_and_audits() {
        let (temp_dir, storage) = create_storage();
        storage
            .create_log(2, 2024, Money::from_cents(100000), &[])
            .unwrap();

        let paths = ScroogePaths::with_base_dir(temp_dir.path().to_path_buf());
        let reopened = Storage::open(paths).unwrap();
        assert!(reopened.find_log(2, 2024).unwrap().is_some());

        let entries = reopened.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_name.as_deref(), Some("02/2024"));
    }

    #[test]
    fn test_insert_tag_twice_is_duplicate() {
        let (_temp_dir, storage) = create_storage();
        let tag = Tag::new("food");
        storage.insert_tag(tag.clone()).unwrap();
        assert!(matches!(
            storage.insert_tag(tag),
            Err(ScroogeError::Duplicate { .. })
        ));
    }
}
