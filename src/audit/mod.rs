//! Audit logging system for scrooge
//!
//! Records every mutation (tags, monthly logs, expenses, restores) with
//! before/after values in an append-only audit log.
//!
//! # Architecture
//!
//! - `AuditEntry`: a single entry with timestamp, operation, entity
//!   information, and optional before/after values.
//! - `AuditLogger`: writes entries to the audit log file as line-delimited
//!   JSON (JSONL) and reads them back.
//! - `generate_diff`: creates a human-readable summary of the difference
//!   between two entity states.
//!
//! # Example
//!
//! ```rust,ignore
//! use scrooge::audit::{AuditEntry, AuditLogger};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::tag_created(&tag))?;
//!
//! for entry in logger.read_recent(10)? {
//!     println!("{}", entry.format_human_readable());
//! }
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
