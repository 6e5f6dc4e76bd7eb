//! Display formatting for terminal output
//!
//! Plain string renderings of analyses, expense groups and tags, with ANSI
//! colors for guideline status.

pub mod analysis;
pub mod expense;
pub mod report;
pub mod tag;

pub use analysis::{format_month_analysis, format_reminders};
pub use expense::{format_description_group, format_tag_groups};
pub use report::{colorize_status, format_percentage, separator};
pub use tag::{format_membership_outcomes, format_tag_list};
