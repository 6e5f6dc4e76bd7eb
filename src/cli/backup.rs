//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use clap::Subcommand;
use std::path::PathBuf;

use crate::backup::{BackupManager, RestoreManager};
use crate::config::Settings;
use crate::error::{ScroogeError, ScroogeResult};
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup (the default)
    Create,

    /// List all available backups
    List,

    /// Restore from a backup
    Restore {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,

        /// Replace the current data without asking
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    storage: &Storage,
    settings: &Settings,
    cmd: Option<BackupCommands>,
) -> ScroogeResult<()> {
    let manager = BackupManager::new(storage.paths(), settings.backups_kept);

    match cmd.unwrap_or(BackupCommands::Create) {
        BackupCommands::Create => {
            let (backup_path, deleted) = manager.create_backup_with_retention(storage)?;
            println!("Backup created: {}", file_name(&backup_path));
            println!("Location: {}", backup_path.display());
            if !deleted.is_empty() {
                println!("Removed {} old backup(s).", deleted.len());
            }
        }

        BackupCommands::List => {
            let backups = manager.list_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: scrooge backup create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            for (i, backup) in backups.iter().enumerate() {
                let age = chrono::Utc::now().signed_duration_since(backup.created_at);
                println!(
                    "  {}. {} ({} ago, {})",
                    i + 1,
                    backup.filename,
                    format_duration(age),
                    format_size(backup.size_bytes),
                );
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Restore { backup, force } => {
            let backup_path = resolve_backup_path(&manager, &backup)?;
            let restore_manager = RestoreManager::new(storage, &manager);
            let validation = restore_manager.validate_backup(&backup_path)?;

            println!("Backup Information");
            println!("==================");
            println!("File: {}", backup_path.display());
            println!(
                "Created: {}",
                validation.backup_date.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!("Status: {}", validation.summary());
            println!();

            if !force {
                println!("WARNING: This will overwrite ALL current data!");
                println!("To proceed, run again with --force flag:");
                println!("  scrooge backup restore {} --force", backup);
                return Ok(());
            }

            let result = restore_manager.restore_from_file(&backup_path)?;
            println!(
                "Backup of the previous data saved: {}",
                file_name(&result.safety_backup)
            );
            println!("Restore complete!");
            println!("{}", result.summary());
        }
    }

    Ok(())
}

/// Resolve a backup identifier to a full path
fn resolve_backup_path(manager: &BackupManager, backup: &str) -> ScroogeResult<PathBuf> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .get_latest_backup()?
            .map(|b| b.path)
            .ok_or_else(|| ScroogeError::NotFound {
                entity_type: "Backup",
                identifier: "latest".to_string(),
            });
    }

    let path = PathBuf::from(backup);
    if path.exists() {
        return Ok(path);
    }

    let in_backup_dir = manager.backup_dir().join(backup);
    if in_backup_dir.exists() {
        return Ok(in_backup_dir);
    }

    let with_extension = manager.backup_dir().join(format!("{}.json", backup));
    if with_extension.exists() {
        return Ok(with_extension);
    }

    Err(ScroogeError::NotFound {
        entity_type: "Backup",
        identifier: backup.to_string(),
    })
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let days = duration.num_days();
    let hours = duration.num_hours();
    let minutes = duration.num_minutes();

    if days > 0 {
        format!("{} day{}", days, if days == 1 { "" } else { "s" })
    } else if hours > 0 {
        format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
    } else if minutes > 0 {
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    } else {
        "just now".to_string()
    }
}

/// Format file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
