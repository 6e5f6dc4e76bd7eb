//! Reports module for scrooge
//!
//! Provides the monthly budget analysis and the summaries used to present
//! filtered expenses.

pub mod description_group;
pub mod monthly;
pub mod tag_groups;

pub use description_group::{DescriptionEntry, DescriptionGroup};
pub use monthly::{Balance, BucketSummary, BudgetAnalyzer, MonthlyAnalysis, TagSummary};
pub use tag_groups::TagGroups;
