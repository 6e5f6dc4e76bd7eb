//! Append-only audit log
//!
//! `audit.log` in the config directory holds one JSON object per line.
//! Entries are only ever appended; `scrooge log` reads the tail back.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{ScroogeError, ScroogeResult};

use super::entry::AuditEntry;

pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    pub fn log(&self, entry: &AuditEntry) -> ScroogeResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    /// Append entries in a single write
    ///
    /// Used for the expenses booked together with a new log or an import.
    pub fn log_batch(&self, entries: &[AuditEntry]) -> ScroogeResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut lines = String::new();
        for entry in entries {
            let json = serde_json::to_string(entry)
                .map_err(|e| ScroogeError::Json(format!("Unserializable audit entry: {}", e)))?;
            lines.push_str(&json);
            lines.push('\n');
        }

        if let Some(parent) = self.log_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error("create directory for", e))?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .and_then(|mut file| file.write_all(lines.as_bytes()))
            .map_err(|e| self.io_error("append to", e))
    }

    /// Every entry, oldest first
    pub fn read_all(&self) -> ScroogeResult<Vec<AuditEntry>> {
        let file = match File::open(&self.log_path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error("open", e)),
        };

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.io_error("read", e))?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| {
                ScroogeError::Json(format!("Corrupt audit entry at line {}: {}", index + 1, e))
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> ScroogeResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let skip = entries.len().saturating_sub(count);
        entries.drain(..skip);
        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    fn io_error(&self, action: &str, err: std::io::Error) -> ScroogeError {
        ScroogeError::Io(format!(
            "Failed to {} audit log {}: {}",
            action,
            self.log_path.display(),
            err
        ))
    }
}
