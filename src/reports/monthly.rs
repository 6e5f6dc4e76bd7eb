//! Monthly budget analysis
//!
//! Compares the expenses of one monthly log against the bucket guidelines:
//! per-bucket totals and their share of the available income, the balance
//! between income and spending, and the totals of a list of important tags.

use crate::models::{
    Bucket, Expense, Guideline, GuidelineStatus, GuidelineTable, Money, MonthlyLog, TagGraph,
    TagId, EPSILON,
};

use super::description_group::DescriptionGroup;

/// One bucket of the analysis
#[derive(Debug, Clone)]
pub struct BucketSummary {
    pub bucket: Bucket,
    pub group: DescriptionGroup,
    /// Share of the available income, as a fraction
    pub ratio: f64,
    pub guideline: Guideline,
    pub status: GuidelineStatus,
}

/// Difference between available income and the sum of all expenses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Balance {
    Balanced,
    /// Income left that no expense accounts for
    Unaccounted(Money),
    /// Spending beyond the available income
    ExcessSpending(Money),
}

impl Balance {
    pub fn between(available: Money, spent: Money) -> Self {
        let rest = available - spent;
        if rest.as_f64().abs() <= EPSILON {
            Self::Balanced
        } else if rest.is_negative() {
            Self::ExcessSpending(rest.abs())
        } else {
            Self::Unaccounted(rest)
        }
    }
}

/// Total of the expenses counting toward one important tag
#[derive(Debug, Clone)]
pub struct TagSummary {
    pub tag: TagId,
    pub name: String,
    pub total: Money,
    pub ratio: f64,
}

/// Result of analysing one monthly log
#[derive(Debug, Clone)]
pub struct MonthlyAnalysis {
    pub month: u32,
    pub year: i32,
    pub available: Money,
    pub spent: Money,
    pub balance: Balance,
    /// Every bucket in display order, including empty ones
    pub buckets: Vec<BucketSummary>,
    /// Important tags with at least one matching expense, in the given order
    pub important_tags: Vec<TagSummary>,
}

impl MonthlyAnalysis {
    pub fn bucket(&self, bucket: Bucket) -> Option<&BucketSummary> {
        self.buckets.iter().find(|b| b.bucket == bucket)
    }
}

/// Analyses monthly logs against a guideline table
pub struct BudgetAnalyzer<'a> {
    guidelines: &'a GuidelineTable,
    graph: &'a TagGraph,
}

impl<'a> BudgetAnalyzer<'a> {
    pub fn new(guidelines: &'a GuidelineTable, graph: &'a TagGraph) -> Self {
        Self { guidelines, graph }
    }

    /// Analyse a log and the expenses it owns
    pub fn analyse(
        &self,
        log: &MonthlyLog,
        expenses: &[Expense],
        important: &[TagId],
    ) -> MonthlyAnalysis {
        let spent: Money = expenses.iter().map(|e| e.amount).sum();

        let buckets = Bucket::all()
            .iter()
            .map(|bucket| self.summarise_bucket(*bucket, log.available, expenses))
            .collect();

        let important_tags = important
            .iter()
            .filter_map(|tag| self.summarise_tag(*tag, log.available, expenses))
            .collect();

        MonthlyAnalysis {
            month: log.month,
            year: log.year,
            available: log.available,
            spent,
            balance: Balance::between(log.available, spent),
            buckets,
            important_tags,
        }
    }

    fn summarise_bucket(
        &self,
        bucket: Bucket,
        available: Money,
        expenses: &[Expense],
    ) -> BucketSummary {
        let group = DescriptionGroup::new(
            bucket.title(),
            expenses.iter().filter(|e| e.bucket == bucket),
        );
        let ratio = group.total.ratio_of(available);
        let guideline = self.guidelines.get(bucket);

        BucketSummary {
            bucket,
            status: guideline.classify(ratio),
            group,
            ratio,
            guideline,
        }
    }

    /// Sum the expenses with a tag counting toward `tag`
    ///
    /// An expense is counted once even if several of its tags match.
    fn summarise_tag(
        &self,
        tag: TagId,
        available: Money,
        expenses: &[Expense],
    ) -> Option<TagSummary> {
        let matching: Vec<&Expense> = expenses
            .iter()
            .filter(|e| e.tags.iter().any(|t| self.graph.matches(*t, tag)))
            .collect();

        if matching.is_empty() {
            return None;
        }

        let total: Money = matching.iter().map(|e| e.amount).sum();
        Some(TagSummary {
            tag,
            name: self.graph.name(tag),
            total,
            ratio: total.ratio_of(available),
        })
    }
}
