//! Recurring expenses
//!
//! Entries of the user's recurring-expense template. Each one is booked once
//! into every newly created monthly log; yearly entries are spread evenly over
//! the twelve months and can remind the user in the month they are due.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::bucket::Bucket;
use super::money::Money;

/// How often a recurring expense is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Periodicity {
    #[default]
    Monthly,
    Yearly,
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

/// One entry of the recurring-expense template
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringExpense {
    /// Amount paid per period
    pub amount: Money,
    pub bucket: Bucket,
    /// Tag names, resolved when the entry is booked
    pub tags: Vec<String>,
    pub name: Option<String>,
    pub periodicity: Periodicity,
    /// Month (1-12) a yearly payment is due
    pub due_month: Option<u32>,
}

impl RecurringExpense {
    /// Create a monthly entry without tags or name
    pub fn monthly(amount: Money, bucket: Bucket) -> Self {
        Self {
            amount,
            bucket,
            tags: Vec::new(),
            name: None,
            periodicity: Periodicity::Monthly,
            due_month: None,
        }
    }

    /// Amount booked into each monthly log
    pub fn monthly_amount(&self) -> Money {
        match self.periodicity {
            Periodicity::Monthly => self.amount,
            Periodicity::Yearly => self.amount.split_evenly(12),
        }
    }

    /// Whether this entry is due in `month`
    pub fn is_due_in(&self, month: u32) -> bool {
        self.due_month == Some(month)
    }

    /// Validate the entry
    pub fn validate(&self) -> Result<(), RecurringValidationError> {
        if self.amount.is_negative() {
            return Err(RecurringValidationError::NegativeAmount(self.amount));
        }
        if let Some(month) = self.due_month {
            if self.periodicity != Periodicity::Yearly {
                return Err(RecurringValidationError::DueOnMonthly);
            }
            if self.name.is_none() {
                return Err(RecurringValidationError::DueWithoutName);
            }
            if !(1..=12).contains(&month) {
                return Err(RecurringValidationError::InvalidDueMonth(month));
            }
        }
        Ok(())
    }
}

impl fmt::Display for RecurringExpense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({} {})", name, self.amount, self.periodicity),
            None => write!(f, "{} {}", self.amount, self.periodicity),
        }
    }
}

/// Validation errors for recurring expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurringValidationError {
    NegativeAmount(Money),
    DueOnMonthly,
    DueWithoutName,
    InvalidDueMonth(u32),
}

impl fmt::Display for RecurringValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => write!(f, "amount cannot be negative ({})", amount),
            Self::DueOnMonthly => write!(f, "due date only allowed for yearly spendings"),
            Self::DueWithoutName => {
                write!(f, "recurring expenses with due date have to have a name")
            }
            Self::InvalidDueMonth(month) => {
                write!(f, "due month {} has to be between 1 and 12", month)
            }
        }
    }
}

impl std::error::Error for RecurringValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_amount() {
        let monthly = RecurringExpense::monthly(Money::from_cents(80000), Bucket::Essential);
        assert_eq!(monthly.monthly_amount(), Money::from_cents(80000));

        let yearly = RecurringExpense {
            periodicity: Periodicity::Yearly,
            ..RecurringExpense::monthly(Money::from_cents(12000), Bucket::Essential)
        };
        assert_eq!(yearly.monthly_amount(), Money::from_cents(1000));
    }

    #[test]
    fn test_due_validation() {
        let mut entry = RecurringExpense::monthly(Money::from_cents(12000), Bucket::Essential);
        entry.due_month = Some(3);
        assert_eq!(entry.validate(), Err(RecurringValidationError::DueOnMonthly));

        entry.periodicity = Periodicity::Yearly;
        assert_eq!(entry.validate(), Err(RecurringValidationError::DueWithoutName));

        entry.name = Some("Car insurance".into());
        assert!(entry.validate().is_ok());
        assert!(entry.is_due_in(3));
        assert!(!entry.is_due_in(4));
    }

    #[test]
    fn test_negative_amount() {
        let entry = RecurringExpense::monthly(Money::from_cents(-100), Bucket::Fun);
        assert!(matches!(
            entry.validate(),
            Err(RecurringValidationError::NegativeAmount(_))
        ));
    }
}
