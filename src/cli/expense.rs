//! Expense CLI commands
//!
//! `scrooge track` records a single expense, `scrooge show` lists filtered
//! expenses grouped by their tags.

use chrono::NaiveDate;
use clap::Args;

use crate::config::{Settings, UserConfig};
use crate::display::{format_reminders, format_tag_groups};
use crate::error::{ScroogeError, ScroogeResult};
use crate::models::{Bucket, Money};
use crate::services::{ExpenseService, TrackRequest};
use crate::storage::Storage;

#[derive(Args)]
pub struct TrackArgs {
    /// Amount spent (e.g. "12.50")
    #[arg(allow_hyphen_values = true)]
    pub amount: String,
    /// Day the money was spent (YYYY-MM-DD)
    pub date: String,
    /// One of essential, saving, investing, fun, giving_back
    pub bucket: String,
    /// Tag names
    pub tags: Vec<String>,
    /// Optional description
    #[arg(short, long)]
    pub description: Option<String>,
    /// Create the monthly log from the config if it does not exist yet
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Filter elements: +tag, -tag, on:DATE, before:DATE, after:DATE
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    pub filters: Vec<String>,
}

/// Handle `scrooge track`
pub fn handle_track_command(
    storage: &Storage,
    settings: &Settings,
    args: TrackArgs,
) -> ScroogeResult<()> {
    let amount = Money::parse(&args.amount).map_err(|e| ScroogeError::Validation(e.to_string()))?;
    let date = parse_date(&args.date)?;
    let bucket: Bucket = args.bucket.parse()?;

    let config = if args.yes {
        UserConfig::load(storage.paths())?
    } else {
        UserConfig::load_or_default(storage.paths())?
    };

    let request = TrackRequest {
        amount,
        date,
        bucket,
        tags: args.tags,
        description: args.description,
    };

    let service = ExpenseService::new(storage);
    let tracked = service.track(request, &config, args.yes)?;

    if let Some(created) = &tracked.created_log {
        println!(
            "Created monthly log for {} with {} recurring expense(s)",
            created.log,
            created.expenses.len()
        );
        print!(
            "{}",
            format_reminders(&created.reminders, &settings.currency_symbol)
        );
    }

    println!(
        "Tracked {} on {} ({})",
        tracked.expense.amount.format_with_symbol(&settings.currency_symbol),
        tracked.expense.date.format(&settings.date_format),
        tracked.expense.bucket
    );

    Ok(())
}

/// Handle `scrooge show`
pub fn handle_show_command(
    storage: &Storage,
    settings: &Settings,
    args: ShowArgs,
) -> ScroogeResult<()> {
    let service = ExpenseService::new(storage);
    let result = service.show(&args.filters)?;

    for error in &result.rejected {
        eprintln!("Warning: skipping filter element. {}", error);
    }

    print!(
        "{}",
        format_tag_groups(&result.groups, &settings.currency_symbol)
    );

    Ok(())
}

fn parse_date(input: &str) -> ScroogeResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        ScroogeError::Validation(format!("Invalid date '{}': expected YYYY-MM-DD", input))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("29.02.2024").is_err());
    }
}
