//! Monthly log repository for JSON storage
//!
//! Manages loading and saving monthly logs to logs.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::ScroogeError;
use crate::models::{LogId, MonthlyLog};

use super::file_io::{read_json, write_json_atomic};

/// Serializable log data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct LogData {
    logs: Vec<MonthlyLog>,
}

/// Repository for monthly log persistence
pub struct LogRepository {
    path: PathBuf,
    data: RwLock<HashMap<LogId, MonthlyLog>>,
}

impl LogRepository {
    /// Create a new log repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load logs from disk
    pub fn load(&self) -> Result<(), ScroogeError> {
        let file_data: LogData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for log in file_data.logs {
            data.insert(log.id, log);
        }

        Ok(())
    }

    /// Save logs to disk
    pub fn save(&self) -> Result<(), ScroogeError> {
        let logs = self.get_all()?;
        write_json_atomic(&self.path, &LogData { logs })
    }

    /// Get all logs, oldest first
    pub fn get_all(&self) -> Result<Vec<MonthlyLog>, ScroogeError> {
        let data = self
            .data
            .read()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = data.values().cloned().collect();
        list.sort_by_key(|l| (l.year, l.month));
        Ok(list)
    }

    /// Get the log of a month
    pub fn get_for_month(&self, month: u32, year: i32) -> Result<Option<MonthlyLog>, ScroogeError> {
        let data = self
            .data
            .read()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.values().find(|l| l.is_for(month, year)).cloned())
    }

    /// Insert or update a log
    pub fn upsert(&self, log: MonthlyLog) -> Result<(), ScroogeError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(log.id, log);
        Ok(())
    }

    /// Delete a log
    pub fn delete(&self, id: LogId) -> Result<Option<MonthlyLog>, ScroogeError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id))
    }

    /// Replace all logs
    pub fn replace_all(&self, logs: Vec<MonthlyLog>) -> Result<(), ScroogeError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        data.extend(logs.into_iter().map(|l| (l.id, l)));
        Ok(())
    }
}
