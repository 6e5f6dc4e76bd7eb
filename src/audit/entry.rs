//! Audit entries
//!
//! One entry per mutation: tags created or given new members, monthly logs
//! and expenses created, and full restores from a backup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::{Expense, MonthlyLog, Tag};

use super::diff::generate_diff;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    /// All data was replaced from a backup
    Restore,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Restore => write!(f, "RESTORE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Tag,
    MonthlyLog,
    Expense,
    Backup,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Tag => write!(f, "Tag"),
            EntityType::MonthlyLog => write!(f, "MonthlyLog"),
            EntityType::Expense => write!(f, "Expense"),
            EntityType::Backup => write!(f, "Backup"),
        }
    }
}

/// A single audit log entry
///
/// Written as one JSON line; `before` and `after` hold snapshots of the
/// entity where they exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Id of the affected entity, or the backup file of a restore
    pub entity_id: String,

    /// Tag name, `MM/YYYY` of a log, or description of an expense
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    /// Human-readable summary of what changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn created<T: Serialize>(
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Create,
            entity_type,
            entity_id,
            entity_name,
            before: None,
            after: serde_json::to_value(entity).ok(),
            diff_summary: None,
        }
    }

    pub fn tag_created(tag: &Tag) -> Self {
        Self::created(
            EntityType::Tag,
            tag.id.to_string(),
            Some(tag.name.clone()),
            tag,
        )
    }

    /// A tag whose direct members changed
    ///
    /// The member names are only used for the change summary; the snapshots
    /// hold the member ids.
    pub fn members_changed(
        before: &Tag,
        after: &Tag,
        names_before: &[String],
        names_after: &[String],
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Update,
            entity_type: EntityType::Tag,
            entity_id: after.id.to_string(),
            entity_name: Some(after.name.clone()),
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary: generate_diff(
                &json!({ "members": names_before }),
                &json!({ "members": names_after }),
            ),
        }
    }

    pub fn log_created(log: &MonthlyLog) -> Self {
        Self::created(
            EntityType::MonthlyLog,
            log.id.to_string(),
            Some(log.to_string()),
            log,
        )
    }

    /// An expense; named by its description, or by amount and bucket
    pub fn expense_created(expense: &Expense) -> Self {
        let name = expense
            .description
            .clone()
            .unwrap_or_else(|| format!("{} {}", expense.amount, expense.bucket));
        Self::created(
            EntityType::Expense,
            expense.id.to_string(),
            Some(name),
            expense,
        )
    }

    /// All data was replaced with the content of `source`
    pub fn restore(source: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Restore,
            entity_type: EntityType::Backup,
            entity_id: source.into(),
            entity_name: None,
            before: None,
            after: None,
            diff_summary: Some(summary.into()),
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
        );

        match &self.entity_name {
            Some(name) => output.push_str(&format!(" '{}' ({})", name, self.entity_id)),
            None => output.push_str(&format!(" {}", self.entity_id)),
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bucket, Money};
    use chrono::NaiveDate;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Update.to_string(), "UPDATE");
        assert_eq!(Operation::Restore.to_string(), "RESTORE");
    }

    #[test]
    fn test_tag_created() {
        let tag = Tag::new("food");
        let entry = AuditEntry::tag_created(&tag);

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.entity_type, EntityType::Tag);
        assert_eq!(entry.entity_id, tag.id.to_string());
        assert_eq!(entry.entity_name.as_deref(), Some("food"));
        assert!(entry.before.is_none());
        assert_eq!(entry.after.unwrap()["name"], "food");
    }

    #[test]
    fn test_members_changed() {
        let before = Tag::new("food");
        let groceries = Tag::new("groceries");
        let mut after = before.clone();
        after.members.insert(groceries.id);

        let entry = AuditEntry::members_changed(&before, &after, &[], &["groceries".to_string()]);

        assert_eq!(entry.operation, Operation::Update);
        assert!(entry.before.is_some());
        assert_eq!(entry.diff_summary.as_deref(), Some("members: +groceries"));
    }

    #[test]
    fn test_expense_name() {
        let log = MonthlyLog::new(5, 2024, Money::zero());
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let expense = Expense::new(log.id, Money::from_cents(80000), date, Bucket::Essential);

        let entry = AuditEntry::expense_created(&expense);
        assert_eq!(entry.entity_name.as_deref(), Some("800.00 essential"));

        let named = expense.with_description(Some("Rent".into()));
        let entry = AuditEntry::expense_created(&named);
        assert_eq!(entry.entity_name.as_deref(), Some("Rent"));
    }

    #[test]
    fn test_log_created() {
        let log = MonthlyLog::new(3, 2024, Money::from_cents(100000));
        let entry = AuditEntry::log_created(&log);

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"monthly_log\""));
        let deserialized: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.entity_type, EntityType::MonthlyLog);
        assert_eq!(deserialized.entity_name.as_deref(), Some("03/2024"));
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::tag_created(&Tag::new("food"));
        let formatted = entry.format_human_readable();
        assert!(formatted.contains("CREATE Tag 'food'"));

        let entry = AuditEntry::restore("2024-01-01_120000.json", "Restored 3 tags");
        let formatted = entry.format_human_readable();
        assert!(formatted.contains("RESTORE Backup 2024-01-01_120000.json"));
        assert!(formatted.ends_with("\n  Restored 3 tags"));
    }
}
