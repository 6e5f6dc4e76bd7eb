//! Expense display formatting
//!
//! Description groups and the tag-grouped listing of `scrooge show`.

use crate::reports::{DescriptionGroup, TagGroups};

use super::report::{bold, italic, row};

pub const WIDTH: usize = 48;

/// Format a description group: a bold title row, one row per description
/// and an optional italic misc row
///
/// `title_amount` renders the total of the title row.
pub fn format_description_group(
    group: &DescriptionGroup,
    symbol: &str,
    title_amount: impl Fn(&DescriptionGroup) -> String,
) -> String {
    let mut output = row(&bold(&group.title), &title_amount(group), WIDTH);

    for entry in &group.descriptions {
        let label = if entry.count == 1 {
            format!("  {}", entry.description)
        } else {
            format!("  {} ({}x)", entry.description, entry.count)
        };
        output.push_str(&row(&label, &entry.total.format_with_symbol(symbol), WIDTH));
    }

    if let Some(misc) = group.misc {
        output.push_str(&row(
            &italic("  misc"),
            &italic(&misc.format_with_symbol(symbol)),
            WIDTH,
        ));
    }

    output
}

/// Format expenses grouped by their tag set, followed by the total
pub fn format_tag_groups(groups: &TagGroups, symbol: &str) -> String {
    if groups.is_empty() {
        return "No matching expenses.\n".to_string();
    }

    let mut output = String::new();
    for group in &groups.groups {
        let titled;
        let group = if group.title.is_empty() {
            titled = DescriptionGroup {
                title: "(untagged)".to_string(),
                ..group.clone()
            };
            &titled
        } else {
            group
        };
        output.push_str(&format_description_group(group, symbol, |g| {
            bold(&g.total.format_with_symbol(symbol))
        }));
        output.push('\n');
    }
    output.push_str(&row(
        &bold("Total"),
        &groups.total.format_with_symbol(symbol),
        WIDTH,
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::report::visible_width;
    use crate::models::{Bucket, Expense, LogId, Money, TagGraph};
    use chrono::NaiveDate;

    fn expense(cents: i64, description: Option<&str>) -> Expense {
        Expense::new(
            LogId::new(),
            Money::from_cents(cents),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Bucket::Fun,
        )
        .with_description(description.map(String::from))
    }

    fn strip(text: &str) -> String {
        let mut out = String::new();
        let mut in_escape = false;
        for c in text.chars() {
            if in_escape {
                in_escape = c != 'm';
            } else if c == '\x1b' {
                in_escape = true;
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_description_group_rows() {
        let expenses = vec![
            expense(500, Some("Cinema")),
            expense(700, Some("Cinema")),
            expense(300, Some("Bar")),
            expense(250, None),
        ];
        let group = DescriptionGroup::new("Fun", &expenses);
        let text = strip(&format_description_group(&group, "€", |g| {
            g.total.format_with_symbol("€")
        }));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Fun") && lines[0].ends_with("17.50€"));
        assert!(lines[1].contains("Cinema (2x)") && lines[1].ends_with("12.00€"));
        assert!(lines[2].contains("Bar") && !lines[2].contains("1x"));
        assert!(lines[3].contains("misc") && lines[3].ends_with("2.50€"));
        assert!(lines.iter().all(|l| visible_width(l) == WIDTH));
    }

    #[test]
    fn test_tag_groups_total() {
        let expenses = vec![expense(100, Some("A")), expense(200, None)];
        let groups = TagGroups::new(&expenses, &TagGraph::new());
        let text = strip(&format_tag_groups(&groups, "€"));

        assert!(text.contains("(untagged)"));
        assert!(text.lines().last().unwrap().starts_with("Total"));
        assert!(text.lines().last().unwrap().ends_with("3.00€"));
    }

    #[test]
    fn test_no_matches() {
        let groups = TagGroups::new(&Vec::<Expense>::new(), &TagGraph::new());
        assert_eq!(format_tag_groups(&groups, "€"), "No matching expenses.\n");
    }
}
