//! Backup manager for scrooge
//!
//! Backups are backup documents in the backup directory, named after their
//! creation time (`YYYY-MM-DD_HHMMSS.json`). A second backup within the same
//! second gets a `-N` suffix. Only the newest `backups_kept` are retained.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::config::paths::ScroogePaths;
use crate::error::{ScroogeError, ScroogeResult};
use crate::storage::{write_json_atomic, Repository};

use super::document::BackupDocument;

const NAME_FORMAT: &str = "%Y-%m-%d_%H%M%S";

/// A backup file found in the backup directory
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    /// Taken from the file name, not the file system
    pub created_at: DateTime<Utc>,
    /// The `-N` suffix, 0 without one
    pub sequence: u32,
    pub size_bytes: u64,
}

impl BackupInfo {
    fn from_path(path: &Path) -> Option<Self> {
        let filename = path.file_name()?.to_str()?.to_string();
        let (created_at, sequence) = parse_backup_name(filename.strip_suffix(".json")?)?;
        let size_bytes = fs::metadata(path).ok()?.len();

        Some(Self {
            filename,
            path: path.to_path_buf(),
            created_at,
            sequence,
            size_bytes,
        })
    }
}

pub struct BackupManager {
    backup_dir: PathBuf,
    keep: usize,
}

impl BackupManager {
    /// `keep` is the number of backups left by `enforce_retention`
    pub fn new(paths: &ScroogePaths, keep: usize) -> Self {
        Self {
            backup_dir: paths.backup_dir(),
            keep,
        }
    }

    /// Write a backup of everything in `repo` and return its path
    pub fn create_backup<R: Repository>(&self, repo: &R) -> ScroogeResult<PathBuf> {
        let now = Utc::now();
        let document = BackupDocument::from_data(&repo.snapshot()?, now);
        let path = self.free_path(now);

        write_json_atomic(&path, &document)
            .map_err(|e| ScroogeError::Backup(format!("Failed to write backup: {}", e)))?;
        Ok(path)
    }

    pub fn read_backup(&self, path: &Path) -> ScroogeResult<BackupDocument> {
        let file = File::open(path).map_err(|e| {
            ScroogeError::Backup(format!("Failed to open {}: {}", path.display(), e))
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            ScroogeError::Backup(format!("{} is not a backup: {}", path.display(), e))
        })
    }

    /// All backups, newest first
    ///
    /// Files whose name is not a backup timestamp are ignored.
    pub fn list_backups(&self) -> ScroogeResult<Vec<BackupInfo>> {
        let entries = match fs::read_dir(&self.backup_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ScroogeError::Io(format!(
                    "Failed to read {}: {}",
                    self.backup_dir.display(),
                    e
                )))
            }
        };

        let mut backups: Vec<BackupInfo> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| BackupInfo::from_path(&entry.path()))
            .collect();
        backups.sort_by_key(|b| std::cmp::Reverse((b.created_at, b.sequence)));
        Ok(backups)
    }

    /// Delete all but the newest `keep` backups; returns the deleted paths
    pub fn enforce_retention(&self) -> ScroogeResult<Vec<PathBuf>> {
        let expired: Vec<PathBuf> = self
            .list_backups()?
            .into_iter()
            .skip(self.keep)
            .map(|b| b.path)
            .collect();

        for path in &expired {
            fs::remove_file(path).map_err(|e| {
                ScroogeError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })?;
        }
        Ok(expired)
    }

    pub fn create_backup_with_retention<R: Repository>(
        &self,
        repo: &R,
    ) -> ScroogeResult<(PathBuf, Vec<PathBuf>)> {
        let created = self.create_backup(repo)?;
        Ok((created, self.enforce_retention()?))
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn get_latest_backup(&self) -> ScroogeResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }

    /// A name for a backup taken at `now` that sorts after every backup of
    /// the same second
    fn free_path(&self, now: DateTime<Utc>) -> PathBuf {
        let stem = now.format(NAME_FORMAT).to_string();
        let taken = self
            .list_backups()
            .unwrap_or_default()
            .into_iter()
            .filter(|b| b.filename.starts_with(&stem))
            .map(|b| b.sequence)
            .max();

        let name = match taken {
            Some(sequence) => format!("{}-{}.json", stem, sequence + 1),
            None => format!("{}.json", stem),
        };
        self.backup_dir.join(name)
    }
}

/// Parse `YYYY-MM-DD_HHMMSS` with an optional `-N` suffix
fn parse_backup_name(stem: &str) -> Option<(DateTime<Utc>, u32)> {
    let (timestamp, sequence) = match stem.rsplit_once('-') {
        Some((head, tail)) if head.contains('_') => (head, tail.parse().ok()?),
        _ => (stem, 0),
    };

    let datetime = NaiveDateTime::parse_from_str(timestamp, NAME_FORMAT).ok()?;
    Some((DateTime::from_naive_utc_and_offset(datetime, Utc), sequence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Tag};
    use crate::storage::MemoryRepository;
    use chrono::{Datelike, Timelike};
    use tempfile::TempDir;

    fn create_test_manager(keep: usize) -> (BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = ScroogePaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        (BackupManager::new(&paths, keep), temp_dir)
    }

    fn sample_repo() -> MemoryRepository {
        let repo = MemoryRepository::new();
        repo.insert_tag(Tag::new("food")).unwrap();
        repo.create_log(1, 2024, Money::from_cents(100), &[]).unwrap();
        repo
    }

    #[test]
    fn test_create_backup() {
        let (manager, _temp) = create_test_manager(5);

        let path = manager.create_backup(&sample_repo()).unwrap();
        assert!(path.exists());

        let name = path.file_stem().unwrap().to_string_lossy().to_string();
        assert!(parse_backup_name(&name).is_some());

        let doc = manager.read_backup(&path).unwrap();
        assert_eq!(doc.tags.len(), 1);
        assert_eq!(doc.months.len(), 1);
    }

    #[test]
    fn test_list_backups_newest_first() {
        let (manager, _temp) = create_test_manager(5);
        let repo = sample_repo();

        let first = manager.create_backup(&repo).unwrap();
        let second = manager.create_backup(&repo).unwrap();
        assert_ne!(first, second);

        let backups = manager.list_backups().unwrap();
        assert_eq!(backups.len(), 2);
        assert_eq!(backups[0].path, second);
        assert_eq!(manager.get_latest_backup().unwrap().unwrap().path, second);
    }

    #[test]
    fn test_retention_policy() {
        let (manager, _temp) = create_test_manager(3);
        let repo = sample_repo();

        for _ in 0..5 {
            manager.create_backup(&repo).unwrap();
        }

        let deleted = manager.enforce_retention().unwrap();
        assert_eq!(deleted.len(), 2);
        assert_eq!(manager.list_backups().unwrap().len(), 3);

        let (_, deleted) = manager.create_backup_with_retention(&repo).unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(manager.list_backups().unwrap().len(), 3);
    }

    #[test]
    fn test_parse_backup_name() {
        let (created_at, sequence) = parse_backup_name("2024-03-09_142501").unwrap();
        assert_eq!(created_at.year(), 2024);
        assert_eq!(created_at.month(), 3);
        assert_eq!(created_at.day(), 9);
        assert_eq!(created_at.hour(), 14);
        assert_eq!(sequence, 0);

        let (_, sequence) = parse_backup_name("2024-03-09_142501-2").unwrap();
        assert_eq!(sequence, 2);

        assert!(parse_backup_name("backup-20240309").is_none());
    }

    #[test]
    fn test_foreign_files_ignored() {
        let (manager, _temp) = create_test_manager(5);
        fs::write(manager.backup_dir().join("notes.json"), "{}").unwrap();
        fs::write(manager.backup_dir().join("2024-01-01_000000.txt"), "").unwrap();

        assert!(manager.list_backups().unwrap().is_empty());
    }
}
