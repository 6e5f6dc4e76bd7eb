//! Monthly analysis display

use crate::models::RecurringExpense;
use crate::reports::{Balance, MonthlyAnalysis};

use super::expense::{format_description_group, WIDTH};
use super::report::{bold, colorize_status, format_with_percentage, italic, red, row, separator};

/// Format the analysis of one month
pub fn format_month_analysis(analysis: &MonthlyAnalysis, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{}\n",
        bold(&format!("Data for {:02}/{}", analysis.month, analysis.year))
    ));
    output.push_str(&separator(WIDTH));
    output.push('\n');

    output.push_str(&row(
        &bold("Available"),
        &bold(&analysis.available.format_with_symbol(symbol)),
        WIDTH,
    ));
    match analysis.balance {
        Balance::Balanced => {}
        Balance::ExcessSpending(amount) => output.push_str(&row(
            &italic(&red("Excess spending")),
            &italic(&red(&amount.format_with_symbol(symbol))),
            WIDTH,
        )),
        Balance::Unaccounted(amount) => output.push_str(&row(
            &italic("Unaccounted"),
            &italic(&amount.format_with_symbol(symbol)),
            WIDTH,
        )),
    }
    output.push('\n');

    for summary in &analysis.buckets {
        output.push_str(&format_description_group(&summary.group, symbol, |g| {
            colorize_status(
                &bold(&format_with_percentage(g.total, summary.ratio, symbol)),
                summary.status,
            )
        }));
        output.push('\n');
    }

    output.push_str(&row(
        &bold("Important tags"),
        "(spendings may appear in multiple rows)",
        WIDTH,
    ));
    for tag in &analysis.important_tags {
        output.push_str(&row(
            &format!("  {}", tag.name),
            &format_with_percentage(tag.total, tag.ratio, symbol),
            WIDTH,
        ));
    }

    output
}

/// Format the recurring expenses that need attention this month
pub fn format_reminders(reminders: &[RecurringExpense], symbol: &str) -> String {
    if reminders.is_empty() {
        return String::new();
    }

    let mut output = format!("{}\n", bold("Reminders"));
    for entry in reminders {
        let name = entry.name.as_deref().unwrap_or(entry.bucket.title());
        output.push_str(&format!(
            "  {} is due this month ({} {})\n",
            name,
            entry.amount.format_with_symbol(symbol),
            entry.periodicity
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bucket, Expense, GuidelineTable, Money, MonthlyLog, TagGraph};
    use crate::reports::BudgetAnalyzer;
    use chrono::NaiveDate;

    fn analyse(available: i64, expenses: &[(i64, Bucket, Option<&str>)]) -> String {
        let log = MonthlyLog::new(3, 2024, Money::from_cents(available));
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let expenses: Vec<Expense> = expenses
            .iter()
            .map(|(cents, bucket, desc)| {
                Expense::new(log.id, Money::from_cents(*cents), date, *bucket)
                    .with_description(desc.map(String::from))
            })
            .collect();
        let table = GuidelineTable::default();
        let graph = TagGraph::new();
        let analysis = BudgetAnalyzer::new(&table, &graph).analyse(&log, &expenses, &[]);
        format_month_analysis(&analysis, "€")
    }

    #[test]
    fn test_unaccounted_income() {
        let text = analyse(100000, &[(60000, Bucket::Essential, Some("Rent"))]);

        assert!(text.contains("Data for 03/2024"));
        assert!(text.contains("Available"));
        assert!(text.contains("1000.00€"));
        assert!(text.contains("Unaccounted"));
        assert!(text.contains("400.00€"));
        assert!(text.contains("600.00€ (60.00%)"));
        assert!(text.contains("Important tags"));
        assert!(!text.contains("Excess spending"));
    }

    #[test]
    fn test_excess_spending() {
        let text = analyse(10000, &[(15000, Bucket::Fun, None)]);

        assert!(text.contains("Excess spending"));
        assert!(text.contains("50.00€"));
        assert!(text.contains("\x1b[31m"));
    }

    #[test]
    fn test_balanced_month() {
        let text = analyse(10000, &[(10000, Bucket::Essential, None)]);

        assert!(!text.contains("Unaccounted"));
        assert!(!text.contains("Excess spending"));
    }

    #[test]
    fn test_reminders() {
        use crate::models::Periodicity;

        assert_eq!(format_reminders(&[], "€"), "");

        let mut insurance = RecurringExpense::monthly(Money::from_cents(24000), Bucket::Essential);
        insurance.name = Some("Insurance".into());
        insurance.periodicity = Periodicity::Yearly;
        insurance.due_month = Some(3);

        let text = format_reminders(&[insurance], "€");
        assert!(text.contains("Insurance is due this month (240.00€ yearly)"));
    }

    #[test]
    fn test_every_bucket_listed() {
        let text = analyse(10000, &[]);
        for bucket in Bucket::all() {
            assert!(text.contains(bucket.title()));
        }
    }
}
