//! Backup document format
//!
//! A self-contained JSON document with every tag keyed by its id and every
//! monthly log with its expenses nested inside. Amounts are plain numbers
//! and dates are split into day, month and year.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ScroogeError, ScroogeResult};
use crate::models::{
    validate_tag_name, Bucket, Expense, ExpenseId, ExpenseSource, LogId, Money, MonthlyLog, Tag,
    TagGraph, TagId,
};
use crate::storage::DataSet;

/// Current version of the document layout
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupDocument {
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    /// Tags keyed by their full id
    pub tags: BTreeMap<String, BackupTag>,
    pub months: Vec<BackupLog>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupTag {
    pub id: TagId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub members: Vec<TagId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupLog {
    pub id: LogId,
    pub month: u32,
    pub year: i32,
    pub available: f64,
    #[serde(default)]
    pub expenses: Vec<BackupExpense>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupExpense {
    pub id: ExpenseId,
    pub amount: f64,
    pub date: BackupDate,
    pub bucket: Bucket,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<TagId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ExpenseSource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl From<NaiveDate> for BackupDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            day: date.day(),
            month: date.month(),
            year: date.year(),
        }
    }
}

impl BackupDate {
    pub fn to_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl BackupDocument {
    /// Build a document from repository content
    pub fn from_data(data: &DataSet, created_at: DateTime<Utc>) -> Self {
        let tags = data
            .tags
            .iter()
            .map(|tag| {
                (
                    tag.id.key(),
                    BackupTag {
                        id: tag.id,
                        name: tag.name.clone(),
                        description: tag.description.clone(),
                        members: tag.members.iter().copied().collect(),
                    },
                )
            })
            .collect();

        let months = data
            .logs
            .iter()
            .map(|log| BackupLog {
                id: log.id,
                month: log.month,
                year: log.year,
                available: log.available.as_f64(),
                expenses: data
                    .expenses
                    .iter()
                    .filter(|e| e.log_id == log.id)
                    .map(|e| BackupExpense {
                        id: e.id,
                        amount: e.amount.as_f64(),
                        date: e.date.into(),
                        bucket: e.bucket,
                        description: e.description.clone(),
                        tags: e.tags.iter().copied().collect(),
                        source: e.source,
                    })
                    .collect(),
            })
            .collect();

        Self {
            schema_version: SCHEMA_VERSION,
            created_at,
            tags,
            months,
        }
    }

    pub fn expense_count(&self) -> usize {
        self.months.iter().map(|m| m.expenses.len()).sum()
    }

    /// Rebuild the in-memory records
    ///
    /// Fails if a tag is stored under another id, has an invalid or duplicate
    /// name, if a member or expense tag references a tag that is not part of
    /// the document, if the tag hierarchy contains a cycle, if two logs cover
    /// the same month, or if a date or amount is invalid.
    pub fn into_records(self) -> ScroogeResult<DataSet> {
        if self.schema_version > SCHEMA_VERSION {
            return Err(ScroogeError::Backup(format!(
                "Unsupported schema version {} (newest known is {})",
                self.schema_version, SCHEMA_VERSION
            )));
        }

        let known: HashSet<TagId> = self.tags.values().map(|t| t.id).collect();

        let mut tags = Vec::with_capacity(self.tags.len());
        let mut names = HashSet::new();
        for (key, backup) in self.tags {
            if key != backup.id.key() {
                return Err(ScroogeError::Backup(format!(
                    "Tag '{}' is stored under key {} but has id {}",
                    backup.name,
                    key,
                    backup.id.key()
                )));
            }
            validate_tag_name(&backup.name)
                .map_err(|e| ScroogeError::Backup(format!("Tag '{}': {}", backup.name, e)))?;
            if !names.insert(backup.name.clone()) {
                return Err(ScroogeError::Backup(format!(
                    "Tag name '{}' appears twice",
                    backup.name
                )));
            }
            if let Some(missing) = backup.members.iter().find(|m| !known.contains(m)) {
                return Err(ScroogeError::Backup(format!(
                    "Tag '{}' has unknown member {}",
                    backup.name, missing
                )));
            }

            let mut tag = Tag::new(backup.name);
            tag.id = backup.id;
            tag.description = backup.description;
            tag.members = backup.members.into_iter().collect();
            tag.created_at = self.created_at;
            tag.updated_at = self.created_at;
            tags.push(tag);
        }

        let graph = TagGraph::from_tags(&tags);
        if let Some(tag) = graph.find_cycle() {
            return Err(ScroogeError::Backup(format!(
                "Tag '{}' is its own member",
                graph.name(tag)
            )));
        }

        let mut logs = Vec::with_capacity(self.months.len());
        let mut expenses = Vec::new();
        let mut periods = HashSet::new();

        for backup in self.months {
            let mut log = MonthlyLog::new(backup.month, backup.year, amount(backup.available)?);
            log.id = backup.id;
            log.created_at = self.created_at;
            log.validate()
                .map_err(|e| ScroogeError::Backup(format!("Log {}: {}", log, e)))?;
            if !periods.insert((log.month, log.year)) {
                return Err(ScroogeError::Backup(format!("Log {} appears twice", log)));
            }

            for e in backup.expenses {
                if let Some(missing) = e.tags.iter().find(|t| !known.contains(t)) {
                    return Err(ScroogeError::Backup(format!(
                        "Expense {} has unknown tag {}",
                        e.id, missing
                    )));
                }
                let date = e.date.to_date().ok_or_else(|| {
                    ScroogeError::Backup(format!(
                        "Expense {} has invalid date {}-{}-{}",
                        e.id, e.date.year, e.date.month, e.date.day
                    ))
                })?;

                let mut expense = Expense::new(log.id, amount(e.amount)?, date, e.bucket)
                    .with_description(e.description)
                    .with_tags(e.tags);
                expense.id = e.id;
                expense.source = e.source;
                expense.created_at = self.created_at;
                expense
                    .validate()
                    .map_err(|err| ScroogeError::Backup(format!("Expense {}: {}", e.id, err)))?;
                expenses.push(expense);
            }

            logs.push(log);
        }

        Ok(DataSet {
            tags,
            logs,
            expenses,
        })
    }
}

fn amount(value: f64) -> ScroogeResult<Money> {
    if value.is_finite() {
        Ok(Money::from_f64(value))
    } else {
        Err(ScroogeError::Backup(format!("Invalid amount {}", value)))
    }
}
