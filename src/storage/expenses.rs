//! Expense repository for JSON storage
//!
//! Manages loading and saving expenses to expenses.json, indexed by the
//! monthly log owning them.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::ScroogeError;
use crate::models::{Expense, ExpenseId, LogId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable expense data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Repository for expense persistence with a per-log index
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
    /// Index: log_id -> expense_ids
    by_log: RwLock<HashMap<LogId, Vec<ExpenseId>>>,
}

impl ExpenseRepository {
    /// Create a new expense repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_log: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk and build the index
    pub fn load(&self) -> Result<(), ScroogeError> {
        let file_data: ExpenseData = read_json(&self.path)?;
        self.replace_all(file_data.expenses)
    }

    /// Save expenses to disk
    pub fn save(&self) -> Result<(), ScroogeError> {
        let expenses = self.get_all()?;
        write_json_atomic(&self.path, &ExpenseData { expenses })
    }

    /// Get all expenses, ordered by date
    pub fn get_all(&self) -> Result<Vec<Expense>, ScroogeError> {
        let data = self
            .data
            .read()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        sort_expenses(&mut expenses);
        Ok(expenses)
    }

    /// Get the expenses of one monthly log, ordered by date
    pub fn get_by_log(&self, log_id: LogId) -> Result<Vec<Expense>, ScroogeError> {
        let data = self
            .data
            .read()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_log = self
            .by_log
            .read()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = by_log
            .get(&log_id)
            .map(|ids| ids.iter().filter_map(|id| data.get(id).cloned()).collect())
            .unwrap_or_default();
        sort_expenses(&mut expenses);
        Ok(expenses)
    }

    /// Insert an expense
    pub fn insert(&self, expense: Expense) -> Result<(), ScroogeError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_log = self
            .by_log
            .write()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if data.contains_key(&expense.id) {
            return Err(ScroogeError::Duplicate {
                entity_type: "Expense",
                identifier: expense.id.to_string(),
            });
        }

        by_log.entry(expense.log_id).or_default().push(expense.id);
        data.insert(expense.id, expense);
        Ok(())
    }

    /// Delete all expenses of a log, returning how many were removed
    pub fn delete_by_log(&self, log_id: LogId) -> Result<usize, ScroogeError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_log = self
            .by_log
            .write()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let ids = by_log.remove(&log_id).unwrap_or_default();
        Ok(ids.iter().filter(|id| data.remove(id).is_some()).count())
    }

    /// Replace all expenses and rebuild the index
    pub fn replace_all(&self, expenses: Vec<Expense>) -> Result<(), ScroogeError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_log = self
            .by_log
            .write()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_log.clear();
        for expense in expenses {
            by_log.entry(expense.log_id).or_default().push(expense.id);
            data.insert(expense.id, expense);
        }
        Ok(())
    }

    /// Count expenses
    pub fn count(&self) -> Result<usize, ScroogeError> {
        let data = self
            .data
            .read()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

fn sort_expenses(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bucket, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ExpenseRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        (temp_dir, repo)
    }

    fn expense(log_id: LogId, day: u32) -> Expense {
        Expense::new(
            log_id,
            Money::from_cents(100),
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            Bucket::Fun,
        )
    }

    #[test]
    fn test_insert_and_get_by_log() {
        let (_temp_dir, repo) = create_test_repo();
        let log_a = LogId::new();
        let log_b = LogId::new();

        repo.insert(expense(log_a, 10)).unwrap();
        repo.insert(expense(log_a, 2)).unwrap();
        repo.insert(expense(log_b, 5)).unwrap();

        let a = repo.get_by_log(log_a).unwrap();
        assert_eq!(a.len(), 2);
        assert!(a[0].date < a[1].date);
        assert_eq!(repo.get_by_log(log_b).unwrap().len(), 1);
        assert!(repo.get_by_log(LogId::new()).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let (_temp_dir, repo) = create_test_repo();
        let e = expense(LogId::new(), 1);
        repo.insert(e.clone()).unwrap();
        assert!(matches!(
            repo.insert(e),
            Err(ScroogeError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_delete_by_log() {
        let (_temp_dir, repo) = create_test_repo();
        let log_a = LogId::new();
        let log_b = LogId::new();
        repo.insert(expense(log_a, 1)).unwrap();
        repo.insert(expense(log_a, 2)).unwrap();
        repo.insert(expense(log_b, 3)).unwrap();

        assert_eq!(repo.delete_by_log(log_a).unwrap(), 2);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_save_and_reload_rebuilds_index() {
        let (temp_dir, repo) = create_test_repo();
        let log_id = LogId::new();
        repo.insert(expense(log_id, 1)).unwrap();
        repo.save().unwrap();

        let repo2 = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.get_by_log(log_id).unwrap().len(), 1);
    }
}
