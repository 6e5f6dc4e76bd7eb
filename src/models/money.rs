//! Currency amounts
//!
//! Amounts are whole cents in an `i64`, so sums of expenses are exact.
//! Ratios against income are computed in `f64`, which is where the analysis
//! epsilon comes in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use thiserror::Error;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid amount: '{0}'")]
pub struct MoneyParseError(String);

impl Money {
    /// ```
    /// use scrooge::models::Money;
    /// assert_eq!(Money::from_cents(1050).to_string(), "10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Round a decimal amount (as found in backups) to the nearest cent
    pub fn from_f64(value: f64) -> Self {
        Self((value * 100.0).round() as i64)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// One of `parts` equal shares, rounded to the nearest cent
    pub fn split_evenly(&self, parts: u32) -> Self {
        match parts {
            0 => *self,
            n => Self((self.0 as f64 / n as f64).round() as i64),
        }
    }

    /// This amount as a fraction of `total`
    ///
    /// A zero total yields 0 for a zero amount and infinity otherwise, so an
    /// amount spent without income always reads as over any guideline.
    pub fn ratio_of(&self, total: Money) -> f64 {
        match (self.is_zero(), total.is_zero()) {
            (true, true) => 0.0,
            (false, true) => f64::INFINITY,
            _ => self.as_f64() / total.as_f64(),
        }
    }

    /// Parse `12`, `12.5`, `12.50`, `.99` or `-3.20`
    ///
    /// Amounts with more than two decimal places are rejected rather than
    /// rounded.
    pub fn parse(input: &str) -> Result<Self, MoneyParseError> {
        let trimmed = input.trim();
        let invalid = || MoneyParseError(trimmed.to_string());

        let (sign, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, trimmed),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty())
            || fraction.len() > 2
            || !all_digits(whole)
            || !all_digits(fraction)
        {
            return Err(invalid());
        }

        let units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let cents = fraction
            .chars()
            .chain(std::iter::repeat('0'))
            .take(2)
            .fold(0, |acc, c| acc * 10 + i64::from(c as u8 - b'0'));

        units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .map(|v| Self(sign * v))
            .ok_or_else(invalid)
    }

    /// `12.50€`
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        format!("{}{}", self, symbol)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, cents / 100, cents % 100)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|m| m.0).sum())
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
