//! User budget configuration
//!
//! The YAML file (`config.yml`) the user edits by hand: monthly income,
//! recurring expenses, guideline overrides and the tags the monthly analysis
//! highlights.
//!
//! ```yaml
//! available: 2500
//! recurring:
//!   - name: Rent
//!     amount: 900
//!     bucket: essential
//!     tags: [housing]
//!   - name: Car insurance
//!     amount: 480
//!     bucket: essential
//!     periodicity: yearly
//!     due: march
//! guidelines:
//!   fun: [0.2, 0.3]
//! important_tags: [food]
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::paths::ScroogePaths;
use crate::error::{ScroogeError, ScroogeResult};
use crate::models::{
    month_from_name, Bucket, Guideline, GuidelineTable, Money, Periodicity, RecurringExpense,
};

/// Sample configuration written by `scrooge init`
pub const SAMPLE_USER_CONFIG: &str = "\
# Money available each month
available: 2000

# Expenses booked into every new monthly log
recurring:
  - name: Rent
    amount: 800
    bucket: essential
  # - name: Car insurance
  #   amount: 480
  #   bucket: essential
  #   periodicity: yearly
  #   due: march

# Overrides of the share of income per bucket, a target or [min, max]
# guidelines:
#   fun: [0.2, 0.3]

# Tags summarised at the end of the monthly analysis
important_tags: []

# All direct members of this tag are summarised too
context_tag: contexts
";

fn default_context_tag() -> String {
    "contexts".to_string()
}

#[derive(Debug, Deserialize)]
struct RawUserConfig {
    available: f64,
    #[serde(default)]
    recurring: Vec<RawRecurring>,
    #[serde(default)]
    guidelines: BTreeMap<String, Guideline>,
    #[serde(default)]
    important_tags: Vec<String>,
    #[serde(default = "default_context_tag")]
    context_tag: String,
}

#[derive(Debug, Deserialize)]
struct RawRecurring {
    amount: Option<f64>,
    bucket: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    name: Option<String>,
    periodicity: Option<Periodicity>,
    due: Option<String>,
}

impl RawRecurring {
    fn into_recurring(self) -> Result<RecurringExpense, String> {
        let amount = self.amount.ok_or("missing field 'amount'")?;
        let bucket: Bucket = self
            .bucket
            .ok_or("missing field 'bucket'")?
            .parse()
            .map_err(|e: ScroogeError| e.to_string())?;
        let due_month = self
            .due
            .map(|due| month_from_name(&due).ok_or(format!("unknown due month '{}'", due)))
            .transpose()?;

        let mut tags = self.tags;
        tags.sort();
        tags.dedup();

        let expense = RecurringExpense {
            amount: Money::from_f64(amount),
            bucket,
            tags,
            name: self.name,
            periodicity: self.periodicity.unwrap_or_default(),
            due_month,
        };
        expense.validate().map_err(|e| e.to_string())?;
        Ok(expense)
    }
}

/// Parsed and validated user configuration
#[derive(Debug, Clone, PartialEq)]
pub struct UserConfig {
    /// Income available each month
    pub available: Money,
    pub recurring: Vec<RecurringExpense>,
    pub guidelines: GuidelineTable,
    /// Tag names highlighted by the monthly analysis
    pub important_tags: Vec<String>,
    /// Tag whose direct members are highlighted as well
    pub context_tag: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            available: Money::zero(),
            recurring: Vec::new(),
            guidelines: GuidelineTable::default(),
            important_tags: Vec::new(),
            context_tag: default_context_tag(),
        }
    }
}

impl UserConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(contents: &str) -> ScroogeResult<Self> {
        let raw: RawUserConfig = serde_yaml::from_str(contents)?;

        if !raw.available.is_finite() || raw.available < 0.0 {
            return Err(ScroogeError::Config(format!(
                "'available' has to be a non-negative amount, got {}",
                raw.available
            )));
        }

        let recurring = raw
            .recurring
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let label = match &entry.name {
                    Some(name) => format!("'{}'", name),
                    None => format!("at index {}", index),
                };
                entry.into_recurring().map_err(|reason| {
                    ScroogeError::Config(format!(
                        "Error while reading recurring expense {}: {}",
                        label, reason
                    ))
                })
            })
            .collect::<ScroogeResult<Vec<_>>>()?;

        let mut overrides = BTreeMap::new();
        for (name, guideline) in raw.guidelines {
            let bucket: Bucket = name.parse()?;
            guideline.validate().map_err(|e| {
                ScroogeError::Config(format!("Invalid guideline for '{}': {}", bucket, e))
            })?;
            overrides.insert(bucket, guideline);
        }

        Ok(Self {
            available: Money::from_f64(raw.available),
            recurring,
            guidelines: GuidelineTable::with_overrides(&overrides),
            important_tags: raw.important_tags,
            context_tag: raw.context_tag,
        })
    }

    /// Read a YAML file
    pub fn load_from_file(path: &Path) -> ScroogeResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ScroogeError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Read the configuration, failing if it has not been written yet
    pub fn load(paths: &ScroogePaths) -> ScroogeResult<Self> {
        let path = paths.user_config_file();
        if !path.exists() {
            return Err(ScroogeError::Config(format!(
                "No configuration at {}. Run 'scrooge init' first",
                path.display()
            )));
        }
        Self::load_from_file(&path)
    }

    /// Read the configuration, falling back to defaults if it is missing
    pub fn load_or_default(paths: &ScroogePaths) -> ScroogeResult<Self> {
        if paths.user_config_file().exists() {
            Self::load(paths)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_config() {
        let config = UserConfig::from_yaml_str(
            "
available: 300
recurring:
  - bucket: investing
    amount: 240
  - bucket: saving
    amount: 15.37
",
        )
        .unwrap();

        assert_eq!(config.available, Money::from_cents(30000));
        assert_eq!(config.recurring.len(), 2);
        assert_eq!(config.recurring[0].bucket, Bucket::Investing);
        assert_eq!(config.recurring[0].amount, Money::from_cents(24000));
        assert_eq!(config.recurring[1].amount, Money::from_cents(1537));
        assert_eq!(config.context_tag, "contexts");
    }

    #[test]
    fn test_recurring_defaults() {
        let config =
            UserConfig::from_yaml_str("available: 1\nrecurring:\n  - {bucket: fun, amount: 5}\n")
                .unwrap();
        let entry = &config.recurring[0];
        assert!(entry.tags.is_empty());
        assert!(entry.name.is_none());
        assert_eq!(entry.periodicity, Periodicity::Monthly);
        assert!(entry.due_month.is_none());
    }

    #[test]
    fn test_yearly_with_due_month() {
        let config = UserConfig::from_yaml_str(
            "
available: 1000
recurring:
  - name: Insurance
    amount: 120
    bucket: essential
    tags: [car, car]
    periodicity: yearly
    due: june
",
        )
        .unwrap();
        let entry = &config.recurring[0];
        assert_eq!(entry.periodicity, Periodicity::Yearly);
        assert_eq!(entry.due_month, Some(6));
        assert_eq!(entry.tags, vec!["car".to_string()]);
        assert_eq!(entry.monthly_amount(), Money::from_cents(1000));
        assert!(entry.is_due_in(6));
        assert!(!entry.is_due_in(7));
    }

    #[test]
    fn test_error_messages_name_the_entry() {
        let err = UserConfig::from_yaml_str(
            "
available: 300
recurring:
  - {name: Named Expense, bucket: fun, amount: 17, due: june}
",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Error while reading recurring expense 'Named Expense': \
             due date only allowed for yearly spendings"
        );

        let err = UserConfig::from_yaml_str(
            "
available: 300
recurring:
  - {bucket: fun, amount: 17, due: june}
",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Error while reading recurring expense at index 0: \
             due date only allowed for yearly spendings"
        );
    }

    #[test]
    fn test_missing_and_unknown_fields() {
        let err = UserConfig::from_yaml_str("available: 1\nrecurring:\n  - {amount: 5}\n")
            .unwrap_err();
        assert!(err.to_string().contains("missing field 'bucket'"));

        let err =
            UserConfig::from_yaml_str("available: 1\nrecurring:\n  - {amount: 5, bucket: rent}\n")
                .unwrap_err();
        assert!(err.to_string().contains("Bucket 'rent' does not exist"));

        assert!(matches!(
            UserConfig::from_yaml_str("recurring: []"),
            Err(ScroogeError::Yaml(_))
        ));
    }

    #[test]
    fn test_guideline_overrides() {
        let config = UserConfig::from_yaml_str(
            "
available: 1000
guidelines:
  fun: [0.1, 0.2]
  investing: 0.15
",
        )
        .unwrap();
        assert_eq!(config.guidelines.get(Bucket::Fun), Guideline::Range(0.1, 0.2));
        assert_eq!(config.guidelines.get(Bucket::Investing), Guideline::Target(0.15));
        assert_eq!(
            config.guidelines.get(Bucket::Essential),
            Guideline::Range(0.5, 0.6)
        );

        assert!(matches!(
            UserConfig::from_yaml_str("available: 1\nguidelines:\n  rent: 0.5\n"),
            Err(ScroogeError::UnknownBucket(_))
        ));
        assert!(UserConfig::from_yaml_str("available: 1\nguidelines:\n  fun: [0.4, 0.2]\n").is_err());
    }

    #[test]
    fn test_sample_config_parses() {
        let config = UserConfig::from_yaml_str(SAMPLE_USER_CONFIG).unwrap();
        assert_eq!(config.available, Money::from_cents(200000));
        assert_eq!(config.recurring.len(), 1);
    }

    #[test]
    fn test_load_requires_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ScroogePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(matches!(UserConfig::load(&paths), Err(ScroogeError::Config(_))));
        assert_eq!(UserConfig::load_or_default(&paths).unwrap(), UserConfig::default());

        std::fs::write(paths.user_config_file(), "available: 10").unwrap();
        assert_eq!(
            UserConfig::load(&paths).unwrap().available,
            Money::from_cents(1000)
        );
    }
}
