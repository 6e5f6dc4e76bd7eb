//! Bucket guidelines
//!
//! A guideline is either a single target fraction of income or a `[min, max]`
//! interval. Percentages are stored as fractions (0.5 is 50%).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::bucket::Bucket;

/// Tolerance for comparing money ratios computed in floating point
pub const EPSILON: f64 = 0.001;

/// Target share of income for one bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Guideline {
    Target(f64),
    Range(f64, f64),
}

impl Guideline {
    pub fn min(&self) -> f64 {
        match *self {
            Self::Target(t) => t,
            Self::Range(min, _) => min,
        }
    }

    pub fn max(&self) -> f64 {
        match *self {
            Self::Target(t) => t,
            Self::Range(_, max) => max,
        }
    }

    /// Classify a share of income against this guideline
    ///
    /// Values within [`EPSILON`] of a boundary count as within range.
    pub fn classify(&self, ratio: f64) -> GuidelineStatus {
        if ratio < self.min() - EPSILON {
            GuidelineStatus::Under
        } else if ratio > self.max() + EPSILON {
            GuidelineStatus::Over
        } else {
            GuidelineStatus::Within
        }
    }

    /// Validate the guideline
    pub fn validate(&self) -> Result<(), GuidelineValidationError> {
        let (min, max) = (self.min(), self.max());
        if !min.is_finite() || !max.is_finite() || min < 0.0 {
            return Err(GuidelineValidationError::OutOfRange(*self));
        }
        if min > max {
            return Err(GuidelineValidationError::Inverted(*self));
        }
        Ok(())
    }
}

impl fmt::Display for Guideline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Target(t) => write!(f, "{:.0}%", t * 100.0),
            Self::Range(min, max) => write!(f, "{:.0}-{:.0}%", min * 100.0, max * 100.0),
        }
    }
}

/// Result of comparing a bucket's share of income to its guideline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuidelineStatus {
    Under,
    Within,
    Over,
}

/// Guidelines for every bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidelineTable {
    guidelines: BTreeMap<Bucket, Guideline>,
}

impl GuidelineTable {
    /// Table with the given overrides applied on top of the defaults
    pub fn with_overrides(overrides: &BTreeMap<Bucket, Guideline>) -> Self {
        let mut table = Self::default();
        for (bucket, guideline) in overrides {
            table.guidelines.insert(*bucket, *guideline);
        }
        table
    }

    /// Guideline for a bucket
    pub fn get(&self, bucket: Bucket) -> Guideline {
        self.guidelines
            .get(&bucket)
            .copied()
            .unwrap_or_else(|| default_guideline(bucket))
    }
}

impl Default for GuidelineTable {
    fn default() -> Self {
        Self {
            guidelines: Bucket::all()
                .iter()
                .map(|b| (*b, default_guideline(*b)))
                .collect(),
        }
    }
}

fn default_guideline(bucket: Bucket) -> Guideline {
    match bucket {
        Bucket::Essential => Guideline::Range(0.5, 0.6),
        Bucket::Saving => Guideline::Range(0.05, 0.1),
        Bucket::Investing => Guideline::Target(0.1),
        Bucket::Fun => Guideline::Range(0.2, 0.35),
        Bucket::GivingBack => Guideline::Range(0.0, 0.1),
    }
}

/// Validation errors for guidelines
#[derive(Debug, Clone, PartialEq)]
pub enum GuidelineValidationError {
    OutOfRange(Guideline),
    Inverted(Guideline),
}

impl fmt::Display for GuidelineValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange(g) => write!(f, "Guideline {:?} must be non-negative", g),
            Self::Inverted(g) => write!(f, "Guideline {:?} has min above max", g),
        }
    }
}

impl std::error::Error for GuidelineValidationError {}
