//! Monthly log model
//!
//! One log per (month, year). It records the income available in that period
//! and owns the expenses of the period.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::LogId;
use super::money::Money;

/// The budget record of one month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyLog {
    /// Unique identifier
    pub id: LogId,

    /// Month, 1-12
    pub month: u32,

    pub year: i32,

    /// Income available in this month
    pub available: Money,

    /// When the log was created
    pub created_at: DateTime<Utc>,
}

impl MonthlyLog {
    /// Create a new log
    pub fn new(month: u32, year: i32, available: Money) -> Self {
        Self {
            id: LogId::new(),
            month,
            year,
            available,
            created_at: Utc::now(),
        }
    }

    /// Check whether this log covers (month, year)
    pub fn is_for(&self, month: u32, year: i32) -> bool {
        self.month == month && self.year == year
    }

    /// Check whether `date` falls into this log's month
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.is_for(date.month(), date.year())
    }

    /// First day of the month, the date recurring expenses are booked on
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Validate the log
    pub fn validate(&self) -> Result<(), LogValidationError> {
        if !(1..=12).contains(&self.month) {
            return Err(LogValidationError::InvalidMonth(self.month));
        }
        if self.available.is_negative() {
            return Err(LogValidationError::NegativeAvailable(self.available));
        }
        Ok(())
    }
}

impl fmt::Display for MonthlyLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Parse an English month name or its three-letter abbreviation
pub fn month_from_name(name: &str) -> Option<u32> {
    let name = name.trim().to_lowercase();
    if name.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|m| *m == name || (name.len() == 3 && m.starts_with(&name)))
        .map(|i| i as u32 + 1)
}

/// Validation errors for monthly logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogValidationError {
    InvalidMonth(u32),
    NegativeAvailable(Money),
}

impl fmt::Display for LogValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMonth(month) => {
                write!(f, "Month {} has to be between 1 and 12", month)
            }
            Self::NegativeAvailable(amount) => {
                write!(f, "Available income cannot be negative ({})", amount)
            }
        }
    }
}

impl std::error::Error for LogValidationError {}
