//! Error type shared by every scrooge operation
//!
//! Each variant carries the offending input (tag name, filter token, row
//! content) so the message printed by the CLI is enough to fix the problem.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScroogeError {
    // Tag hierarchy
    #[error("Adding '{child}' as member of '{parent}' would create a cycle")]
    Cycle { parent: String, child: String },

    #[error("'{child}' already is a member of '{parent}'")]
    AlreadyMember { parent: String, child: String },

    #[error("'{child}' is not a direct member of '{parent}'")]
    NotMember { parent: String, child: String },

    /// A filter token, import row or config entry names a tag that is not there
    #[error("Tag '{0}' does not exist")]
    UnknownTag(String),

    // Filters and dates
    #[error("Invalid date '{0}': expected YYYY, YYYY-MM or YYYY-MM-DD")]
    InvalidDateFormat(String),

    #[error("Invalid month {month} in '{input}': has to be between 1 and 12")]
    InvalidMonth { input: String, month: u32 },

    /// Neither `+tag`/`-tag` nor `on:`, `before:` or `after:`
    #[error("Unknown filter element: {0}")]
    UnknownFilterToken(String),

    #[error("Bucket '{0}' does not exist")]
    UnknownBucket(String),

    // Entities
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    // Files and formats
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Backup error: {0}")]
    Backup(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("YAML error: {0}")]
    Yaml(String),

    #[error("CSV error: {0}")]
    Csv(String),
}

pub type ScroogeResult<T> = Result<T, ScroogeError>;

impl ScroogeError {
    pub fn tag_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Tag",
            identifier: name.into(),
        }
    }

    /// Monthly logs are identified as `MM/YYYY`
    pub fn log_not_found(month: u32, year: i32) -> Self {
        Self::NotFound {
            entity_type: "Monthly log",
            identifier: format!("{:02}/{}", month, year),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

macro_rules! stringly_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for ScroogeError {
                fn from(err: $source) -> Self {
                    Self::$variant(err.to_string())
                }
            }
        )*
    };
}

stringly_from! {
    std::io::Error => Io,
    serde_json::Error => Json,
    serde_yaml::Error => Yaml,
    csv::Error => Csv,
}
