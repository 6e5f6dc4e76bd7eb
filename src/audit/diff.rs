//! Change summaries for audit entries
//!
//! Compares the top-level fields of two JSON snapshots. Lists of plain values
//! (member names, tag names) are compared as sets and reported as the items
//! that were added and removed.

use serde_json::{Map, Value};

/// Summarise the difference between two snapshots
///
/// Returns `None` if nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(before), Value::Object(after)) => object_changes(before, after),
        _ if before == after => Vec::new(),
        _ => vec![value_change(before, after)],
    };

    (!changes.is_empty()).then(|| changes.join("; "))
}

fn object_changes(before: &Map<String, Value>, after: &Map<String, Value>) -> Vec<String> {
    let mut changes = Vec::new();

    for (key, old) in before {
        match after.get(key) {
            Some(new) if new == old => {}
            Some(new) => changes.push(format!("{}: {}", key, value_change(old, new))),
            None => changes.push(format!("{}: removed {}", key, render(old))),
        }
    }
    for (key, new) in after {
        if !before.contains_key(key) {
            changes.push(format!("{}: set to {}", key, render(new)));
        }
    }

    changes
}

fn value_change(old: &Value, new: &Value) -> String {
    match (scalar_items(old), scalar_items(new)) {
        (Some(old_items), Some(new_items)) => {
            let added = new_items
                .iter()
                .filter(|item| !old_items.contains(item))
                .map(|item| format!("+{}", item));
            let removed = old_items
                .iter()
                .filter(|item| !new_items.contains(item))
                .map(|item| format!("-{}", item));
            let parts: Vec<String> = removed.chain(added).collect();
            if parts.is_empty() {
                "reordered".to_string()
            } else {
                parts.join(" ")
            }
        }
        _ => format!("{} -> {}", render(old), render(new)),
    }
}

/// Items of an array holding only strings and numbers
fn scalar_items(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => "nothing".to_string(),
        Value::String(s) if s.chars().count() > 40 => {
            let head: String = s.chars().take(37).collect();
            format!("'{}...'", head)
        }
        Value::String(s) => format!("'{}'", s),
        Value::Array(items) => format!("{} item(s)", items.len()),
        Value::Object(fields) => format!("{} field(s)", fields.len()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_member_changes() {
        let before = json!({"members": ["groceries", "snacks"]});
        let after = json!({"members": ["groceries", "restaurant"]});

        assert_eq!(
            generate_diff(&before, &after).unwrap(),
            "members: -snacks +restaurant"
        );
    }

    #[test]
    fn test_scalar_change() {
        let before = json!({"name": "food", "available": 1000});
        let after = json!({"name": "food", "available": 1500});

        assert_eq!(
            generate_diff(&before, &after).unwrap(),
            "available: 1000 -> 1500"
        );
    }

    #[test]
    fn test_fields_set_and_removed() {
        let before = json!({"name": "food", "description": "Edible"});
        let after = json!({"name": "food", "due": "march"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("description: removed 'Edible'"));
        assert!(diff.contains("due: set to 'march'"));
    }

    #[test]
    fn test_reordered_list() {
        let before = json!({"members": ["a", "b"]});
        let after = json!({"members": ["b", "a"]});

        assert_eq!(generate_diff(&before, &after).unwrap(), "members: reordered");
    }

    #[test]
    fn test_no_changes() {
        let value = json!({"name": "food", "members": ["groceries"]});
        assert!(generate_diff(&value, &value).is_none());
    }

    #[test]
    fn test_render() {
        assert_eq!(render(&json!(null)), "nothing");
        assert_eq!(render(&json!("x".repeat(50))).len(), 42);
        assert_eq!(render(&json!([{"a": 1}])), "1 item(s)");
        assert_eq!(render(&json!({"a": 1, "b": 2})), "2 field(s)");
    }
}
