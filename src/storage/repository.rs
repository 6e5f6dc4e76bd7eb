//! The repository contract consumed by services, reports and backups
//!
//! All lookups are exact-match: tags by name, logs by (month, year).
//! Implementations only provide the primitives; log creation from a
//! recurring template is built on top of them so every backend shares it.

use crate::audit::AuditEntry;
use crate::error::{ScroogeError, ScroogeResult};
use crate::models::{
    Expense, ExpenseSource, LogId, Money, MonthlyLog, RecurringExpense, Tag, TagGraph,
};

/// Complete content of a repository, as written to and read from backups
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    pub tags: Vec<Tag>,
    pub logs: Vec<MonthlyLog>,
    pub expenses: Vec<Expense>,
}

/// Result of creating a monthly log from a recurring template
#[derive(Debug, Clone)]
pub struct CreatedLog {
    pub log: MonthlyLog,
    /// Expenses booked from the template
    pub expenses: Vec<Expense>,
    /// Yearly entries due in the log's month
    pub reminders: Vec<RecurringExpense>,
}

pub trait Repository {
    /// All tags, sorted by name
    fn all_tags(&self) -> ScroogeResult<Vec<Tag>>;

    fn find_tag_by_name(&self, name: &str) -> ScroogeResult<Option<Tag>> {
        Ok(self.all_tags()?.into_iter().find(|t| t.name == name))
    }

    /// All logs, oldest first
    fn all_logs(&self) -> ScroogeResult<Vec<MonthlyLog>>;

    fn find_log(&self, month: u32, year: i32) -> ScroogeResult<Option<MonthlyLog>> {
        Ok(self.all_logs()?.into_iter().find(|l| l.is_for(month, year)))
    }

    /// Expenses of one log, ordered by date
    fn all_expenses(&self, log: LogId) -> ScroogeResult<Vec<Expense>>;

    /// Expenses of every log, ordered by date
    fn every_expense(&self) -> ScroogeResult<Vec<Expense>>;

    fn insert_tag(&self, tag: Tag) -> ScroogeResult<()>;

    fn update_tag(&self, tag: Tag) -> ScroogeResult<()>;

    fn insert_log(&self, log: MonthlyLog) -> ScroogeResult<()>;

    fn insert_expense(&self, expense: Expense) -> ScroogeResult<()>;

    /// Delete a log together with its expenses
    fn delete_log(&self, id: LogId) -> ScroogeResult<()>;

    /// Replace the whole content
    fn replace_all(&self, data: DataSet) -> ScroogeResult<()>;

    /// Flush pending changes to durable storage
    fn persist(&self) -> ScroogeResult<()> {
        Ok(())
    }

    /// Append an entry to the audit trail
    fn record(&self, _entry: AuditEntry) -> ScroogeResult<()> {
        Ok(())
    }

    fn record_all(&self, entries: Vec<AuditEntry>) -> ScroogeResult<()> {
        entries.into_iter().try_for_each(|entry| self.record(entry))
    }

    /// Build the tag hierarchy from the stored tags
    fn tag_graph(&self) -> ScroogeResult<TagGraph> {
        let tags = self.all_tags()?;
        Ok(TagGraph::from_tags(&tags))
    }

    /// Snapshot of everything stored
    fn snapshot(&self) -> ScroogeResult<DataSet> {
        Ok(DataSet {
            tags: self.all_tags()?,
            logs: self.all_logs()?,
            expenses: self.every_expense()?,
        })
    }

    /// Create the log of (month, year) and book the recurring template into it
    ///
    /// Tag names of the template are resolved before anything is written, so
    /// an unknown name leaves the repository untouched.
    fn create_log(
        &self,
        month: u32,
        year: i32,
        available: Money,
        recurring: &[RecurringExpense],
    ) -> ScroogeResult<CreatedLog> {
        let log = MonthlyLog::new(month, year, available);
        log.validate()
            .map_err(|e| ScroogeError::Validation(e.to_string()))?;

        if self.find_log(month, year)?.is_some() {
            return Err(ScroogeError::Duplicate {
                entity_type: "Monthly log",
                identifier: log.to_string(),
            });
        }

        let first_day = log
            .first_day()
            .ok_or_else(|| ScroogeError::Validation(format!("Invalid period {}", log)))?;

        let mut expenses = Vec::with_capacity(recurring.len());
        for entry in recurring {
            let mut tag_ids = Vec::with_capacity(entry.tags.len());
            for name in &entry.tags {
                let tag = self
                    .find_tag_by_name(name)?
                    .ok_or_else(|| ScroogeError::UnknownTag(name.clone()))?;
                tag_ids.push(tag.id);
            }

            expenses.push(
                Expense::new(log.id, entry.monthly_amount(), first_day, entry.bucket)
                    .with_description(entry.name.clone())
                    .with_tags(tag_ids)
                    .with_source(ExpenseSource::Recurring),
            );
        }

        self.insert_log(log.clone())?;
        for expense in &expenses {
            self.insert_expense(expense.clone())?;
        }
        self.persist()?;

        let mut entries = vec![AuditEntry::log_created(&log)];
        entries.extend(expenses.iter().map(AuditEntry::expense_created));
        self.record_all(entries)?;

        let reminders = recurring
            .iter()
            .filter(|r| r.is_due_in(month))
            .cloned()
            .collect();

        Ok(CreatedLog {
            log,
            expenses,
            reminders,
        })
    }
}
