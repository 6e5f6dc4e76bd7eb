//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod expense;
pub mod import;
pub mod log;
pub mod month;
pub mod tag;

pub use backup::{handle_backup_command, BackupCommands};
pub use expense::{handle_show_command, handle_track_command, ShowArgs, TrackArgs};
pub use import::{handle_import_command, ImportArgs};
pub use log::{handle_log_command, LogArgs};
pub use month::{handle_month_command, MonthArgs};
pub use tag::{handle_tag_command, TagCommands};
