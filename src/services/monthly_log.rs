//! Monthly log service
//!
//! Finds and creates monthly logs and runs the budget analysis on them.

use chrono::{Datelike, NaiveDate};

use crate::config::UserConfig;
use crate::error::{ScroogeError, ScroogeResult};
use crate::models::{month_from_name, MonthlyLog, TagId};
use crate::reports::{BudgetAnalyzer, MonthlyAnalysis};
use crate::storage::{CreatedLog, Repository};

/// How a log was obtained
#[derive(Debug, Clone)]
pub enum LogAccess {
    Existing(MonthlyLog),
    Created(CreatedLog),
}

impl LogAccess {
    pub fn log(&self) -> &MonthlyLog {
        match self {
            LogAccess::Existing(log) => log,
            LogAccess::Created(created) => &created.log,
        }
    }
}

/// Analysis of a month plus the configured tag names that do not exist
#[derive(Debug, Clone)]
pub struct MonthReport {
    pub analysis: MonthlyAnalysis,
    pub missing_tags: Vec<String>,
}

/// Service for monthly logs
pub struct MonthlyLogService<'a, R: Repository> {
    repo: &'a R,
}

impl<'a, R: Repository> MonthlyLogService<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    pub fn find(&self, month: u32, year: i32) -> ScroogeResult<Option<MonthlyLog>> {
        self.repo.find_log(month, year)
    }

    /// Create a log with the income and recurring expenses of the user config
    pub fn create_from_config(
        &self,
        month: u32,
        year: i32,
        config: &UserConfig,
    ) -> ScroogeResult<CreatedLog> {
        self.repo
            .create_log(month, year, config.available, &config.recurring)
    }

    /// Get the log of a month, creating it from the config if allowed
    ///
    /// Fails with a not-found error naming the month when the log is missing
    /// and `create_missing` is false.
    pub fn get_or_create(
        &self,
        month: u32,
        year: i32,
        config: &UserConfig,
        create_missing: bool,
    ) -> ScroogeResult<LogAccess> {
        if let Some(log) = self.find(month, year)? {
            return Ok(LogAccess::Existing(log));
        }
        if !create_missing {
            return Err(ScroogeError::log_not_found(month, year));
        }
        self.create_from_config(month, year, config)
            .map(LogAccess::Created)
    }

    /// Tags highlighted by the analysis
    ///
    /// The direct members of the context tag come first, followed by the
    /// configured important tags. Names that do not resolve are returned
    /// separately.
    pub fn important_tags(&self, config: &UserConfig) -> ScroogeResult<(Vec<TagId>, Vec<String>)> {
        let mut ids: Vec<TagId> = Vec::new();
        let mut missing = Vec::new();

        if let Some(context) = self.repo.find_tag_by_name(&config.context_tag)? {
            let graph = self.repo.tag_graph()?;
            let mut members: Vec<TagId> = context.members.iter().copied().collect();
            members.sort_by_key(|id| graph.name(*id));
            ids.extend(members);
        }

        for name in &config.important_tags {
            match self.repo.find_tag_by_name(name)? {
                Some(tag) if !ids.contains(&tag.id) => ids.push(tag.id),
                Some(_) => {}
                None => missing.push(name.clone()),
            }
        }

        Ok((ids, missing))
    }

    /// Analyse the log of a month
    pub fn analyse(&self, log: &MonthlyLog, config: &UserConfig) -> ScroogeResult<MonthReport> {
        let expenses = self.repo.all_expenses(log.id)?;
        let graph = self.repo.tag_graph()?;
        let (important, missing_tags) = self.important_tags(config)?;

        let analysis =
            BudgetAnalyzer::new(&config.guidelines, &graph).analyse(log, &expenses, &important);

        Ok(MonthReport {
            analysis,
            missing_tags,
        })
    }
}

/// Parse a month given as `YYYY-MM` or as an English month name
///
/// A month name refers to the year of `today`.
pub fn parse_month(input: &str, today: NaiveDate) -> ScroogeResult<(u32, i32)> {
    let input = input.trim();

    if let Some(month) = month_from_name(input) {
        return Ok((month, today.year()));
    }

    let invalid = || ScroogeError::Validation(format!("'{}' doesn't describe a month", input));

    let (year, month) = input.split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || month.len() != 2 {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(ScroogeError::InvalidMonth {
            input: input.to_string(),
            month,
        });
    }

    Ok((month, year))
}
