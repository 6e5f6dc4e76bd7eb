//! Month analysis CLI command

use chrono::{Datelike, Local, NaiveDate};
use clap::Args;

use crate::config::{Settings, UserConfig};
use crate::display::{format_month_analysis, format_reminders};
use crate::error::ScroogeResult;
use crate::services::{parse_month, MonthlyLogService};
use crate::storage::Storage;

#[derive(Args)]
pub struct MonthArgs {
    /// YYYY-MM or a month name of the current year; defaults to this month
    pub month: Option<String>,
    /// Create the monthly log from the config if it does not exist yet
    #[arg(short, long)]
    pub yes: bool,
}

/// Handle `scrooge month`
pub fn handle_month_command(
    storage: &Storage,
    settings: &Settings,
    args: MonthArgs,
) -> ScroogeResult<()> {
    let today = Local::now().date_naive();
    let (month, year) = resolve_month(args.month.as_deref(), today)?;

    let service = MonthlyLogService::new(storage);
    let symbol = &settings.currency_symbol;

    let log = match service.find(month, year)? {
        Some(log) => log,
        None if args.yes => {
            let config = UserConfig::load(storage.paths())?;
            let created = service.create_from_config(month, year, &config)?;
            println!("Created monthly log for {}", created.log);
            print!("{}", format_reminders(&created.reminders, symbol));
            println!();
            created.log
        }
        None => {
            println!("No data exists for {:02}/{}.", month, year);
            println!("To create a log based on the config values, run again with --yes.");
            return Ok(());
        }
    };

    let config = UserConfig::load_or_default(storage.paths())?;
    let report = service.analyse(&log, &config)?;

    for name in &report.missing_tags {
        eprintln!("Warning: Important tag '{}' does not exist", name);
    }
    print!("{}", format_month_analysis(&report.analysis, symbol));

    Ok(())
}

fn resolve_month(input: Option<&str>, today: NaiveDate) -> ScroogeResult<(u32, i32)> {
    match input {
        Some(input) => parse_month(input, today),
        None => Ok((today.month(), today.year())),
    }
}
