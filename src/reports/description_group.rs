//! Description groups
//!
//! Summarises a list of expenses under a title: the total, one line per
//! distinct description with count and amount, and whatever is left over as
//! "misc".

use crate::models::{Expense, Money, EPSILON};

/// Tally of expenses sharing a description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionEntry {
    pub description: String,
    pub count: usize,
    pub total: Money,
}

/// Expenses summarised by description
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptionGroup {
    pub title: String,
    pub total: Money,
    /// Distinct descriptions in order of first appearance
    pub descriptions: Vec<DescriptionEntry>,
    /// Amount of expenses without description, if there are named ones too
    pub misc: Option<Money>,
}

impl DescriptionGroup {
    /// Build a group from expenses
    pub fn new<'a, I>(title: impl Into<String>, expenses: I) -> Self
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        let mut total = Money::zero();
        let mut descriptions: Vec<DescriptionEntry> = Vec::new();

        for expense in expenses {
            total += expense.amount;
            let Some(description) = &expense.description else {
                continue;
            };
            match descriptions
                .iter_mut()
                .find(|d| &d.description == description)
            {
                Some(entry) => {
                    entry.count += 1;
                    entry.total += expense.amount;
                }
                None => descriptions.push(DescriptionEntry {
                    description: description.clone(),
                    count: 1,
                    total: expense.amount,
                }),
            }
        }

        // Without named descriptions the whole total already is the group
        let misc = if descriptions.is_empty() {
            None
        } else {
            let named: Money = descriptions.iter().map(|d| d.total).sum();
            let rest = total - named;
            (rest.as_f64() > EPSILON).then_some(rest)
        };

        Self {
            title: title.into(),
            total,
            descriptions,
            misc,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total.is_zero() && self.descriptions.is_empty()
    }
}
