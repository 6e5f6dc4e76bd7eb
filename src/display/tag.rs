//! Tag display formatting

use crate::services::{MembershipChange, ModifierOutcome, TagListing};

/// Format tags with their direct members
pub fn format_tag_list(tags: &[TagListing]) -> String {
    if tags.is_empty() {
        return "No tags found.\n\nCreate one with 'scrooge tags create NAME'.\n".to_string();
    }

    let mut output = String::new();
    for listing in tags {
        match &listing.tag.description {
            Some(description) => {
                output.push_str(&format!("{}: {}\n", listing.tag.name, description))
            }
            None => output.push_str(&format!("{}\n", listing.tag.name)),
        }
        for member in &listing.member_names {
            output.push_str(&format!("  - {}\n", member));
        }
    }
    output
}

/// Format the result of a membership edit, one line per modifier
pub fn format_membership_outcomes(parent: &str, outcomes: &[ModifierOutcome]) -> String {
    let mut output = String::new();
    for outcome in outcomes {
        let line = match &outcome.result {
            Ok(MembershipChange::Added(name)) => format!("Added '{}' to '{}'", name, parent),
            Ok(MembershipChange::Removed(name)) => {
                format!("Removed '{}' from '{}'", name, parent)
            }
            Err(e) => format!("Skipped '{}': {}", outcome.modifier, e),
        };
        output.push_str(&line);
        output.push('\n');
    }
    output
}
