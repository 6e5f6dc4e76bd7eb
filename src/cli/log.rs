//! Audit log CLI command

use clap::Args;

use crate::error::ScroogeResult;
use crate::storage::Storage;

#[derive(Args)]
pub struct LogArgs {
    /// Number of entries to show
    #[arg(short = 'n', long, default_value = "20")]
    pub count: usize,
}

/// Handle `scrooge log`
pub fn handle_log_command(storage: &Storage, args: LogArgs) -> ScroogeResult<()> {
    let entries = storage.audit().read_recent(args.count)?;

    if entries.is_empty() {
        println!("No changes recorded yet.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
