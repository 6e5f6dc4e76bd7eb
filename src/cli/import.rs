//! CSV import CLI command

use std::path::PathBuf;

use clap::Args;

use crate::config::{Settings, UserConfig};
use crate::display::format_reminders;
use crate::error::ScroogeResult;
use crate::services::{ImportOutcome, ImportService, CSV_HEADER};
use crate::storage::Storage;

#[derive(Args)]
pub struct ImportArgs {
    /// CSV file to import; a template is written if it does not exist
    pub file: PathBuf,
}

/// Handle `scrooge import`
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    args: ImportArgs,
) -> ScroogeResult<()> {
    let config = UserConfig::load_or_default(storage.paths())?;
    let service = ImportService::new(storage);

    match service.import_file(&args.file, &config)? {
        ImportOutcome::SampleWritten => {
            println!(
                "Import file did not exist. Wrote a template to {}",
                args.file.display()
            );
            println!("Columns: {}", CSV_HEADER.join(";"));
        }
        ImportOutcome::Imported(summary) => {
            for created in &summary.created_logs {
                println!("Created monthly log for {}", created.log);
                print!(
                    "{}",
                    format_reminders(&created.reminders, &settings.currency_symbol)
                );
            }
            for failed in &summary.failed {
                eprintln!("Unable to import row {}: {}", failed.row_number, failed.error);
            }
            println!(
                "Looked at {} rows. Failed to import {}.",
                summary.rows(),
                summary.failed.len()
            );
            if !summary.failed.is_empty() {
                println!(
                    "The failed rows were kept in {} for another try.",
                    args.file.display()
                );
            }
        }
    }

    Ok(())
}
