//! Backup system for scrooge
//!
//! Writes the whole repository into one self-contained JSON document and
//! restores it again.
//!
//! # Architecture
//!
//! - `BackupDocument`: the serialized form of every tag, log and expense
//! - `BackupManager`: creates, lists and prunes backup files
//! - `RestoreManager`: validates a document and replaces the stored data
//!
//! # Backup Format
//!
//! - `schema_version`: version of the document layout
//! - `created_at`: timestamp when the backup was created
//! - `tags`: every tag keyed by its id, with description and member ids
//! - `months`: every monthly log with its expenses nested inside
//!
//! # Example
//!
//! ```rust,ignore
//! use scrooge::backup::{BackupManager, RestoreManager};
//! use scrooge::config::ScroogePaths;
//! use scrooge::storage::Storage;
//!
//! let paths = ScroogePaths::new()?;
//! let storage = Storage::open(paths.clone())?;
//! let backups = BackupManager::new(&paths, 5);
//!
//! let (backup_path, _deleted) = backups.create_backup_with_retention(&storage)?;
//!
//! // Later, restore from backup
//! let result = RestoreManager::new(&storage, &backups).restore_from_file(&backup_path)?;
//! println!("{}", result.summary());
//! ```

mod document;
mod manager;
mod restore;

pub use document::{
    BackupDate, BackupDocument, BackupExpense, BackupLog, BackupTag, SCHEMA_VERSION,
};
pub use manager::{BackupInfo, BackupManager};
pub use restore::{RestoreManager, RestoreResult, ValidationResult};
