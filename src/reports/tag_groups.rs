//! Grouping of expenses by their exact set of tags

use std::collections::BTreeMap;

use crate::models::{Expense, Money, TagGraph};

use super::description_group::DescriptionGroup;

/// Expenses grouped by the sorted names of their tags
#[derive(Debug, Clone)]
pub struct TagGroups {
    /// One group per distinct tag-name set, ordered by the joined names
    pub groups: Vec<DescriptionGroup>,
    pub total: Money,
}

impl TagGroups {
    /// Group expenses; the group title is the comma-separated tag names
    pub fn new<'a, I>(expenses: I, graph: &TagGraph) -> Self
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        let mut by_tags: BTreeMap<Vec<String>, Vec<&Expense>> = BTreeMap::new();
        for expense in expenses {
            let mut names: Vec<String> = expense.tags.iter().map(|t| graph.name(*t)).collect();
            names.sort();
            by_tags.entry(names).or_default().push(expense);
        }

        let groups: Vec<DescriptionGroup> = by_tags
            .into_iter()
            .map(|(names, expenses)| DescriptionGroup::new(names.join(", "), expenses))
            .collect();
        let total = groups.iter().map(|g| g.total).sum();

        Self { groups, total }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
