//! Service layer for scrooge
//!
//! The service layer provides business logic on top of a `Repository`,
//! handling validation, tag-name resolution and audit records.

pub mod expense;
pub mod import;
pub mod monthly_log;
pub mod tag;

pub use expense::{ExpenseService, ShowResult, TrackRequest, Tracked};
pub use import::{FailedRow, ImportOutcome, ImportService, ImportSummary, CSV_HEADER};
pub use monthly_log::{parse_month, LogAccess, MonthReport, MonthlyLogService};
pub use tag::{MembershipChange, ModifierOutcome, TagListing, TagService};
