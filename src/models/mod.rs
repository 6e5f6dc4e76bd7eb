//! Core data models for scrooge
//!
//! This module contains the data structures of the expense-tracking domain:
//! tags and their hierarchy, expenses, monthly logs, buckets and guidelines.

pub mod bucket;
pub mod expense;
pub mod guideline;
pub mod hierarchy;
pub mod ids;
pub mod money;
pub mod monthly_log;
pub mod recurring;
pub mod tag;

pub use bucket::Bucket;
pub use expense::{Expense, ExpenseSource};
pub use guideline::{Guideline, GuidelineStatus, GuidelineTable, EPSILON};
pub use hierarchy::TagGraph;
pub use ids::{ExpenseId, LogId, TagId};
pub use money::Money;
pub use monthly_log::{month_from_name, MonthlyLog};
pub use recurring::{Periodicity, RecurringExpense};
pub use tag::{validate_tag_name, Tag};
