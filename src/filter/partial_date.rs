//! Partial dates
//!
//! A date literal given to year, year-month or full-date granularity. It is
//! compared against full dates at its own granularity: `2024` equals every
//! day of 2024 and is greater than every day of 2023.

use chrono::{Datelike, NaiveDate};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ScroogeError;

/// Date literal of `YYYY`, `YYYY-MM` or `YYYY-MM-DD` granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialDate {
    Year(i32),
    Month { year: i32, month: u32 },
    Day(NaiveDate),
}

impl PartialDate {
    /// Compare a full date against this literal, truncating the date to the
    /// literal's granularity first
    pub fn compare(&self, date: NaiveDate) -> Ordering {
        match *self {
            Self::Year(year) => date.year().cmp(&year),
            Self::Month { year, month } => (date.year(), date.month()).cmp(&(year, month)),
            Self::Day(day) => date.cmp(&day),
        }
    }

    /// `date` lies within this literal
    pub fn matches(&self, date: NaiveDate) -> bool {
        self.compare(date) == Ordering::Equal
    }
}

impl FromStr for PartialDate {
    type Err = ScroogeError;

    /// Parse a literal; the dashes are optional (`202306` equals `2023-06`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScroogeError::InvalidDateFormat(s.to_string());

        if !s.is_ascii() || s.len() < 4 {
            return Err(invalid());
        }

        let (year, rest) = s.split_at(4);
        let year = parse_digits(year).ok_or_else(invalid)? as i32;
        if rest.is_empty() {
            return Ok(Self::Year(year));
        }

        let rest = rest.strip_prefix('-').unwrap_or(rest);
        if rest.len() < 2 {
            return Err(invalid());
        }
        let (month, rest) = rest.split_at(2);
        let month = parse_digits(month).ok_or_else(invalid)?;
        if !(1..=12).contains(&month) {
            return Err(ScroogeError::InvalidMonth {
                input: s.to_string(),
                month,
            });
        }
        if rest.is_empty() {
            return Ok(Self::Month { year, month });
        }

        let rest = rest.strip_prefix('-').unwrap_or(rest);
        if rest.len() != 2 {
            return Err(invalid());
        }
        let day = parse_digits(rest).ok_or_else(invalid)?;
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self::Day)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{:04}", year),
            Self::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            Self::Day(day) => write!(f, "{}", day.format("%Y-%m-%d")),
        }
    }
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
