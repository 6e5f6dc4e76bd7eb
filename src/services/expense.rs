//! Expense service
//!
//! Tracking single expenses and querying them through filters.

use chrono::{Datelike, NaiveDate};

use crate::audit::AuditEntry;
use crate::config::UserConfig;
use crate::error::{ScroogeError, ScroogeResult};
use crate::filter::Filter;
use crate::models::{Bucket, Expense, Money, TagId};
use crate::reports::TagGroups;
use crate::storage::{CreatedLog, Repository};

use super::monthly_log::{LogAccess, MonthlyLogService};

/// Input for tracking an expense
#[derive(Debug, Clone)]
pub struct TrackRequest {
    pub amount: Money,
    pub date: NaiveDate,
    pub bucket: Bucket,
    /// Tag names
    pub tags: Vec<String>,
    pub description: Option<String>,
}

/// A tracked expense, plus the log created for it if there was none
#[derive(Debug, Clone)]
pub struct Tracked {
    pub expense: Expense,
    pub created_log: Option<CreatedLog>,
}

/// Filtered expenses grouped by tag set, plus the rejected filter tokens
#[derive(Debug)]
pub struct ShowResult {
    pub groups: TagGroups,
    pub count: usize,
    pub rejected: Vec<ScroogeError>,
}

/// Service for expenses
pub struct ExpenseService<'a, R: Repository> {
    repo: &'a R,
}

impl<'a, R: Repository> ExpenseService<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Resolve tag names, failing on the first unknown one
    pub fn resolve_tags<S: AsRef<str>>(&self, names: &[S]) -> ScroogeResult<Vec<TagId>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref().trim();
                self.repo
                    .find_tag_by_name(name)?
                    .map(|t| t.id)
                    .ok_or_else(|| ScroogeError::UnknownTag(name.to_string()))
            })
            .collect()
    }

    /// Record an expense in the log of its month
    ///
    /// A missing log is created from `config` only if `create_missing` is
    /// set. Tags are resolved before anything is written.
    pub fn track(
        &self,
        request: TrackRequest,
        config: &UserConfig,
        create_missing: bool,
    ) -> ScroogeResult<Tracked> {
        if request.amount.is_negative() {
            return Err(ScroogeError::Validation(format!(
                "Amount cannot be negative ({})",
                request.amount
            )));
        }
        let tags = self.resolve_tags(&request.tags)?;

        let access = MonthlyLogService::new(self.repo).get_or_create(
            request.date.month(),
            request.date.year(),
            config,
            create_missing,
        )?;

        let expense = Expense::new(
            access.log().id,
            request.amount,
            request.date,
            request.bucket,
        )
        .with_description(request.description)
        .with_tags(tags);

        expense
            .validate()
            .map_err(|e| ScroogeError::Validation(e.to_string()))?;

        self.repo.insert_expense(expense.clone())?;
        self.repo.persist()?;
        self.repo.record(AuditEntry::expense_created(&expense))?;

        let created_log = match access {
            LogAccess::Created(created) => Some(created),
            LogAccess::Existing(_) => None,
        };

        Ok(Tracked {
            expense,
            created_log,
        })
    }

    /// Apply filter tokens to the expenses of all logs
    ///
    /// Invalid tokens are skipped and returned alongside the result.
    pub fn show<S: AsRef<str>>(&self, tokens: &[S]) -> ScroogeResult<ShowResult> {
        let graph = self.repo.tag_graph()?;
        let (filter, rejected) = Filter::compile_partial(tokens, &graph);

        let expenses = self.repo.every_expense()?;
        let matching = filter.apply(&expenses);

        Ok(ShowResult {
            count: matching.len(),
            groups: TagGroups::new(matching, &graph),
            rejected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::TagService;
    use crate::storage::MemoryRepository;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(cents: i64, date: NaiveDate, tags: &[&str]) -> TrackRequest {
        TrackRequest {
            amount: Money::from_cents(cents),
            date,
            bucket: Bucket::Essential,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            description: Some("Rewe".to_string()),
        }
    }

    fn setup() -> MemoryRepository {
        let repo = MemoryRepository::new();
        let tags = TagService::new(&repo);
        for name in ["contexts", "food", "groceries"] {
            tags.create(name, None).unwrap();
        }
        tags.modify_members("contexts", &["+food"]).unwrap();
        tags.modify_members("food", &["+groceries"]).unwrap();
        repo
    }

    #[test]
    fn test_track_requires_log_unless_allowed() {
        let repo = setup();
        let service = ExpenseService::new(&repo);
        let config = UserConfig::default();

        let err = service
            .track(request(1537, date(2024, 5, 17), &[]), &config, false)
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(repo.every_expense().unwrap().is_empty());

        let tracked = service
            .track(request(1537, date(2024, 5, 17), &["groceries"]), &config, true)
            .unwrap();
        assert!(tracked.created_log.is_some());
        assert_eq!(tracked.expense.tags.len(), 1);

        let again = service
            .track(request(200, date(2024, 5, 20), &[]), &config, false)
            .unwrap();
        assert!(again.created_log.is_none());
        assert_eq!(again.expense.log_id, tracked.expense.log_id);
    }

    #[test]
    fn test_track_rejects_unknown_tag_and_negative_amount() {
        let repo = setup();
        let service = ExpenseService::new(&repo);
        let config = UserConfig::default();

        let err = service
            .track(request(100, date(2024, 1, 1), &["ghost"]), &config, true)
            .unwrap_err();
        assert!(matches!(err, ScroogeError::UnknownTag(ref n) if n == "ghost"));
        assert!(repo.all_logs().unwrap().is_empty());

        assert!(service
            .track(request(-100, date(2024, 1, 1), &[]), &config, true)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_show_includes_descendants_and_reports_bad_tokens() {
        let repo = setup();
        let service = ExpenseService::new(&repo);
        let config = UserConfig::default();

        service
            .track(request(1000, date(2024, 2, 1), &["groceries"]), &config, true)
            .unwrap();
        service
            .track(request(500, date(2024, 2, 2), &[]), &config, true)
            .unwrap();

        let shown = service.show(&["+food", "+nonsense", "bogus"]).unwrap();
        assert_eq!(shown.count, 1);
        assert_eq!(shown.groups.total, Money::from_cents(1000));
        assert_eq!(shown.rejected.len(), 2);

        let all = service.show::<&str>(&[]).unwrap();
        assert_eq!(all.count, 2);
        assert_eq!(all.groups.groups.len(), 2);
    }
}
