//! Expense filters
//!
//! A filter is compiled from a list of textual tokens:
//!
//! - `+tag` includes expenses tagged with `tag` or any tag in its closure
//! - `-tag` excludes them, and always wins over an inclusion
//! - `on:DATE`, `before:DATE`, `after:DATE` restrict the expense date, where
//!   `DATE` is a partial date (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`)
//!
//! With no `+tag` tokens every tag passes; all date predicates must hold.

pub mod partial_date;

pub use partial_date::PartialDate;

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::error::{ScroogeError, ScroogeResult};
use crate::models::{Expense, TagGraph, TagId};

/// A date restriction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePredicate {
    On(PartialDate),
    Before(PartialDate),
    After(PartialDate),
}

impl DatePredicate {
    /// Check the predicate against a date
    pub fn holds(&self, date: NaiveDate) -> bool {
        match self {
            Self::On(partial) => partial.compare(date) == Ordering::Equal,
            Self::Before(partial) => partial.compare(date) == Ordering::Less,
            Self::After(partial) => partial.compare(date) == Ordering::Greater,
        }
    }
}

impl fmt::Display for DatePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On(d) => write!(f, "on:{}", d),
            Self::Before(d) => write!(f, "before:{}", d),
            Self::After(d) => write!(f, "after:{}", d),
        }
    }
}

/// A single parsed filter token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterToken {
    Include(TagId),
    Exclude(TagId),
    Date(DatePredicate),
}

impl FilterToken {
    /// Classify and parse one token
    ///
    /// Tag names are resolved against `graph`; the token's position in the
    /// list does not matter.
    pub fn parse(token: &str, graph: &TagGraph) -> ScroogeResult<Self> {
        if let Some(name) = token.strip_prefix('+') {
            return Ok(Self::Include(resolve_tag(token, name, graph)?));
        }
        if let Some(name) = token.strip_prefix('-') {
            return Ok(Self::Exclude(resolve_tag(token, name, graph)?));
        }

        if let Some(date) = token.strip_prefix("on:") {
            return Ok(Self::Date(DatePredicate::On(date.parse()?)));
        }
        if let Some(date) = token.strip_prefix("before:") {
            return Ok(Self::Date(DatePredicate::Before(date.parse()?)));
        }
        if let Some(date) = token.strip_prefix("after:") {
            return Ok(Self::Date(DatePredicate::After(date.parse()?)));
        }

        Err(ScroogeError::UnknownFilterToken(token.to_string()))
    }
}

fn resolve_tag(token: &str, name: &str, graph: &TagGraph) -> ScroogeResult<TagId> {
    if name.is_empty() {
        return Err(ScroogeError::UnknownFilterToken(token.to_string()));
    }
    graph
        .find_by_name(name)
        .ok_or_else(|| ScroogeError::UnknownTag(name.to_string()))
}

/// A compiled filter
///
/// The tag sets hold the closures of the named tags, so a filter on a parent
/// tag includes expenses carrying any of its descendants.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    positive: HashSet<TagId>,
    negative: HashSet<TagId>,
    dates: Vec<DatePredicate>,
}

impl Filter {
    /// The identity filter, matching every expense
    pub fn all() -> Self {
        Self::default()
    }

    /// Compile tokens, failing on the first invalid one
    pub fn compile<S: AsRef<str>>(tokens: &[S], graph: &TagGraph) -> ScroogeResult<Self> {
        let parsed = tokens
            .iter()
            .map(|t| FilterToken::parse(t.as_ref(), graph))
            .collect::<ScroogeResult<Vec<_>>>()?;
        Ok(Self::from_tokens(&parsed, graph))
    }

    /// Compile tokens, skipping the invalid ones
    ///
    /// Returns the filter built from the valid tokens together with one error
    /// per rejected token.
    pub fn compile_partial<S: AsRef<str>>(
        tokens: &[S],
        graph: &TagGraph,
    ) -> (Self, Vec<ScroogeError>) {
        let mut parsed = Vec::new();
        let mut errors = Vec::new();
        for token in tokens {
            match FilterToken::parse(token.as_ref(), graph) {
                Ok(t) => parsed.push(t),
                Err(e) => errors.push(e),
            }
        }
        (Self::from_tokens(&parsed, graph), errors)
    }

    /// Build a filter from already parsed tokens
    pub fn from_tokens(tokens: &[FilterToken], graph: &TagGraph) -> Self {
        let mut include = Vec::new();
        let mut exclude = Vec::new();
        let mut dates = Vec::new();

        for token in tokens {
            match *token {
                FilterToken::Include(id) => include.push(id),
                FilterToken::Exclude(id) => exclude.push(id),
                FilterToken::Date(predicate) => dates.push(predicate),
            }
        }

        Self {
            positive: graph.closure(include),
            negative: graph.closure(exclude),
            dates,
        }
    }

    /// Whether the filter lets every expense through
    pub fn is_identity(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty() && self.dates.is_empty()
    }

    /// Tag part of the filter
    pub fn matches_tags(&self, tags: &BTreeSet<TagId>) -> bool {
        if tags.iter().any(|t| self.negative.contains(t)) {
            return false;
        }
        self.positive.is_empty() || tags.iter().any(|t| self.positive.contains(t))
    }

    /// Date part of the filter
    pub fn matches_date(&self, date: NaiveDate) -> bool {
        self.dates.iter().all(|p| p.holds(date))
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        self.matches_tags(&expense.tags) && self.matches_date(expense.date)
    }

    /// Select the matching expenses, keeping their order
    pub fn apply<'e, I>(&self, expenses: I) -> Vec<&'e Expense>
    where
        I: IntoIterator<Item = &'e Expense>,
    {
        expenses.into_iter().filter(|e| self.matches(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bucket, LogId, Money};

    struct Fixture {
        graph: TagGraph,
        contexts: TagId,
        food: TagId,
        groceries: TagId,
        restaurant: TagId,
        travel: TagId,
    }

    fn fixture() -> Fixture {
        let mut graph = TagGraph::new();
        let mut add = |name: &str| {
            let id = TagId::new();
            graph.add_tag(id, name);
            id
        };
        let contexts = add("contexts");
        let food = add("food");
        let groceries = add("groceries");
        let restaurant = add("restaurant");
        let travel = add("travel");
        graph.add_membership(contexts, food).unwrap();
        graph.add_membership(food, groceries).unwrap();
        graph.add_membership(food, restaurant).unwrap();
        Fixture {
            graph,
            contexts,
            food,
            groceries,
            restaurant,
            travel,
        }
    }

    fn expense(y: i32, m: u32, d: u32, tags: &[TagId]) -> Expense {
        Expense::new(
            LogId::new(),
            Money::from_cents(1000),
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            Bucket::Essential,
        )
        .with_tags(tags.iter().copied())
    }

    #[test]
    fn test_identity_filter() {
        let f = fixture();
        let filter = Filter::compile::<&str>(&[], &f.graph).unwrap();
        assert!(filter.is_identity());

        let expenses = vec![
            expense(2023, 1, 1, &[]),
            expense(2024, 6, 1, &[f.food]),
            expense(2025, 3, 4, &[f.travel, f.groceries]),
        ];
        assert_eq!(filter.apply(&expenses).len(), 3);
    }

    #[test]
    fn test_parent_tag_includes_descendants() {
        let f = fixture();
        let filter = Filter::compile(&["+food"], &f.graph).unwrap();

        assert!(filter.matches(&expense(2024, 1, 1, &[f.groceries])));
        assert!(filter.matches(&expense(2024, 1, 1, &[f.food])));
        assert!(!filter.matches(&expense(2024, 1, 1, &[f.travel])));
        assert!(!filter.matches(&expense(2024, 1, 1, &[])));

        let filter = Filter::compile(&["+contexts"], &f.graph).unwrap();
        assert!(filter.matches(&expense(2024, 1, 1, &[f.restaurant])));
    }

    #[test]
    fn test_exclusion_wins() {
        let f = fixture();
        let filter = Filter::compile(&["+food", "-restaurant"], &f.graph).unwrap();

        assert!(filter.matches(&expense(2024, 1, 1, &[f.groceries])));
        assert!(!filter.matches(&expense(2024, 1, 1, &[f.restaurant])));
        assert!(!filter.matches(&expense(2024, 1, 1, &[f.groceries, f.restaurant])));
    }

    #[test]
    fn test_exclusion_alone_keeps_everything_else() {
        let f = fixture();
        let filter = Filter::compile(&["-food"], &f.graph).unwrap();

        assert!(filter.matches(&expense(2024, 1, 1, &[])));
        assert!(filter.matches(&expense(2024, 1, 1, &[f.travel])));
        assert!(!filter.matches(&expense(2024, 1, 1, &[f.groceries])));
        assert!(filter.matches(&expense(2024, 1, 1, &[f.contexts])));
    }

    #[test]
    fn test_date_predicates_are_conjunctive() {
        let f = fixture();
        let filter = Filter::compile(&["after:2023-01", "before:2023-06-15"], &f.graph).unwrap();

        assert!(!filter.matches(&expense(2023, 1, 31, &[])));
        assert!(filter.matches(&expense(2023, 2, 1, &[])));
        assert!(filter.matches(&expense(2023, 6, 14, &[])));
        assert!(!filter.matches(&expense(2023, 6, 15, &[])));
    }

    #[test]
    fn test_on_year_and_month() {
        let f = fixture();
        let year = Filter::compile(&["on:2023"], &f.graph).unwrap();
        assert!(year.matches(&expense(2023, 12, 31, &[])));
        assert!(!year.matches(&expense(2024, 1, 1, &[])));

        let month = Filter::compile(&["on:2023-06"], &f.graph).unwrap();
        assert!(month.matches(&expense(2023, 6, 30, &[])));
        assert!(!month.matches(&expense(2023, 7, 1, &[])));
    }

    #[test]
    fn test_before_year_excludes_that_year() {
        let f = fixture();
        let filter = Filter::compile(&["before:2024"], &f.graph).unwrap();
        assert!(filter.matches(&expense(2023, 12, 31, &[])));
        assert!(!filter.matches(&expense(2024, 1, 1, &[])));
    }

    #[test]
    fn test_tags_and_dates_combined() {
        let f = fixture();
        let filter = Filter::compile(&["on:2024", "+food"], &f.graph).unwrap();
        assert!(filter.matches(&expense(2024, 3, 1, &[f.groceries])));
        assert!(!filter.matches(&expense(2023, 3, 1, &[f.groceries])));
        assert!(!filter.matches(&expense(2024, 3, 1, &[f.travel])));
    }

    #[test]
    fn test_token_errors() {
        let f = fixture();
        assert!(matches!(
            Filter::compile(&["+unknown"], &f.graph),
            Err(ScroogeError::UnknownTag(ref name)) if name == "unknown"
        ));
        assert!(matches!(
            Filter::compile(&["food"], &f.graph),
            Err(ScroogeError::UnknownFilterToken(_))
        ));
        assert!(matches!(
            Filter::compile(&["+"], &f.graph),
            Err(ScroogeError::UnknownFilterToken(_))
        ));
        assert!(matches!(
            Filter::compile(&["on:2023-13"], &f.graph),
            Err(ScroogeError::InvalidMonth { .. })
        ));
        assert!(matches!(
            Filter::compile(&["after:yesterday"], &f.graph),
            Err(ScroogeError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn test_compile_partial_skips_bad_tokens() {
        let f = fixture();
        let (filter, errors) =
            Filter::compile_partial(&["+food", "+nope", "on:2023-99", "bogus"], &f.graph);

        assert_eq!(errors.len(), 3);
        assert!(filter.matches(&expense(2020, 1, 1, &[f.groceries])));
        assert!(!filter.matches(&expense(2020, 1, 1, &[f.travel])));
    }

    #[test]
    fn test_filter_is_a_snapshot() {
        let mut f = fixture();
        let filter = Filter::compile(&["+food"], &f.graph).unwrap();
        f.graph.remove_membership(f.food, f.groceries).unwrap();
        assert!(filter.matches(&expense(2024, 1, 1, &[f.groceries])));
    }
}
