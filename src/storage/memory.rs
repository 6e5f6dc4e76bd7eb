//! In-memory repository
//!
//! Holds everything in `RwLock`-guarded maps and never touches the disk.
//! Audit entries are dropped.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{ScroogeError, ScroogeResult};
use crate::models::{Expense, ExpenseId, LogId, MonthlyLog, Tag, TagId};

use super::repository::{DataSet, Repository};

#[derive(Default)]
pub struct MemoryRepository {
    tags: RwLock<HashMap<TagId, Tag>>,
    logs: RwLock<HashMap<LogId, MonthlyLog>>,
    expenses: RwLock<HashMap<ExpenseId, Expense>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-filled with `data`
    pub fn with_data(data: DataSet) -> ScroogeResult<Self> {
        let repo = Self::new();
        repo.replace_all(data)?;
        Ok(repo)
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> ScroogeError {
    ScroogeError::Storage(format!("Failed to acquire lock: {}", e))
}

impl Repository for MemoryRepository {
    fn all_tags(&self) -> ScroogeResult<Vec<Tag>> {
        let tags = self.tags.read().map_err(poisoned)?;
        let mut list: Vec<_> = tags.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    fn all_logs(&self) -> ScroogeResult<Vec<MonthlyLog>> {
        let logs = self.logs.read().map_err(poisoned)?;
        let mut list: Vec<_> = logs.values().cloned().collect();
        list.sort_by_key(|l| (l.year, l.month));
        Ok(list)
    }

    fn all_expenses(&self, log: LogId) -> ScroogeResult<Vec<Expense>> {
        Ok(self
            .every_expense()?
            .into_iter()
            .filter(|e| e.log_id == log)
            .collect())
    }

    fn every_expense(&self) -> ScroogeResult<Vec<Expense>> {
        let expenses = self.expenses.read().map_err(poisoned)?;
        let mut list: Vec<_> = expenses.values().cloned().collect();
        list.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(list)
    }

    fn insert_tag(&self, tag: Tag) -> ScroogeResult<()> {
        let mut tags = self.tags.write().map_err(poisoned)?;
        if tags.contains_key(&tag.id) {
            return Err(ScroogeError::Duplicate {
                entity_type: "Tag",
                identifier: tag.name,
            });
        }
        tags.insert(tag.id, tag);
        Ok(())
    }

    fn update_tag(&self, tag: Tag) -> ScroogeResult<()> {
        let mut tags = self.tags.write().map_err(poisoned)?;
        if !tags.contains_key(&tag.id) {
            return Err(ScroogeError::tag_not_found(tag.name));
        }
        tags.insert(tag.id, tag);
        Ok(())
    }

    fn insert_log(&self, log: MonthlyLog) -> ScroogeResult<()> {
        self.logs.write().map_err(poisoned)?.insert(log.id, log);
        Ok(())
    }

    fn insert_expense(&self, expense: Expense) -> ScroogeResult<()> {
        self.expenses
            .write()
            .map_err(poisoned)?
            .insert(expense.id, expense);
        Ok(())
    }

    fn delete_log(&self, id: LogId) -> ScroogeResult<()> {
        self.logs.write().map_err(poisoned)?.remove(&id);
        self.expenses
            .write()
            .map_err(poisoned)?
            .retain(|_, e| e.log_id != id);
        Ok(())
    }

    fn replace_all(&self, data: DataSet) -> ScroogeResult<()> {
        let mut tags = self.tags.write().map_err(poisoned)?;
        let mut logs = self.logs.write().map_err(poisoned)?;
        let mut expenses = self.expenses.write().map_err(poisoned)?;

        *tags = data.tags.into_iter().map(|t| (t.id, t)).collect();
        *logs = data.logs.into_iter().map(|l| (l.id, l)).collect();
        *expenses = data.expenses.into_iter().map(|e| (e.id, e)).collect();
        Ok(())
    }
}
