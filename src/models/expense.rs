//! Expense model
//!
//! An expense belongs to exactly one monthly log and carries a flat set of
//! tag ids. Hierarchy expansion happens at query time, never at storage time.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::bucket::Bucket;
use super::ids::{ExpenseId, LogId, TagId};
use super::money::Money;

/// Where an expense came from, if not tracked by hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseSource {
    /// Inserted from a recurring-expense template when the log was created
    Recurring,
    /// Read from a CSV import file
    Import,
}

impl fmt::Display for ExpenseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recurring => write!(f, "recurring"),
            Self::Import => write!(f, "import"),
        }
    }
}

/// A single expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// The monthly log owning this expense
    pub log_id: LogId,

    /// Amount spent (never negative)
    pub amount: Money,

    /// Day the money was spent
    pub date: NaiveDate,

    pub bucket: Bucket,

    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,

    /// Associated tags
    #[serde(default)]
    pub tags: BTreeSet<TagId>,

    /// Provenance marker
    #[serde(default)]
    pub source: Option<ExpenseSource>,

    /// When the expense was recorded
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense without description or tags
    pub fn new(log_id: LogId, amount: Money, date: NaiveDate, bucket: Bucket) -> Self {
        Self {
            id: ExpenseId::new(),
            log_id,
            amount,
            date,
            bucket,
            description: None,
            tags: BTreeSet::new(),
            source: None,
            created_at: Utc::now(),
        }
    }

    /// Set the description, treating blank text as none
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = TagId>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    pub fn with_source(mut self, source: ExpenseSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Check if the expense carries the exact tag (no hierarchy expansion)
    pub fn has_tag(&self, id: TagId) -> bool {
        self.tags.contains(&id)
    }

    /// Validate the expense
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.amount.is_negative() {
            return Err(ExpenseValidationError::NegativeAmount(self.amount));
        }
        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.date.format("%Y-%m-%d"),
            self.amount,
            self.bucket
        )?;
        if let Some(description) = &self.description {
            write!(f, " {}", description)?;
        }
        Ok(())
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    NegativeAmount(Money),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(f, "Expense amount cannot be negative ({})", amount)
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
