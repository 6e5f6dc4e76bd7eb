//! Spending buckets
//!
//! Every expense is classified into exactly one of a fixed set of buckets.
//! The buckets are compared against percentage-of-income guidelines in the
//! monthly analysis.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScroogeError;

/// Fixed spending category with an income-percentage guideline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Rent, food, insurance and other things needed to live
    Essential,
    Saving,
    Investing,
    /// Everything spent to enjoy life
    Fun,
    GivingBack,
}

impl Bucket {
    /// Get all buckets in display order
    pub fn all() -> &'static [Self] {
        &[
            Self::Essential,
            Self::Saving,
            Self::Investing,
            Self::Fun,
            Self::GivingBack,
        ]
    }

    /// The identifier used on the command line, in CSV files and in backups
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Essential => "essential",
            Self::Saving => "saving",
            Self::Investing => "investing",
            Self::Fun => "fun",
            Self::GivingBack => "giving_back",
        }
    }

    /// Heading used in the monthly analysis
    pub fn title(&self) -> &'static str {
        match self {
            Self::Essential => "Essential living expenses",
            Self::Saving => "Amount saved",
            Self::Investing => "Amount invested",
            Self::Fun => "Freely used money",
            Self::GivingBack => "Given back",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = ScroogeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|b| b.as_str() == name)
            .ok_or_else(|| ScroogeError::UnknownBucket(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_buckets() {
        for bucket in Bucket::all() {
            assert_eq!(bucket.as_str().parse::<Bucket>().unwrap(), *bucket);
        }
    }

    #[test]
    fn test_unknown_bucket() {
        let err = "holidays".parse::<Bucket>().unwrap_err();
        assert!(matches!(err, ScroogeError::UnknownBucket(ref name) if name == "holidays"));
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Bucket::GivingBack).unwrap();
        assert_eq!(json, "\"giving_back\"");
        let bucket: Bucket = serde_json::from_str("\"fun\"").unwrap();
        assert_eq!(bucket, Bucket::Fun);
    }
}
