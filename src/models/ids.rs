//! Entity identifiers
//!
//! Tags, monthly logs and expenses each get their own UUID newtype, so an
//! expense id can never be looked up in the tag table.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident => $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// The complete hyphenated UUID; keys the tag table of a backup
            pub fn key(&self) -> String {
                self.0.hyphenated().to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        /// Short form for messages and the audit log
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let simple = self.0.simple().to_string();
                write!(f, "{}{}", $prefix, &simple[..8])
            }
        }
    };
}

entity_id!(
    /// Identifies a [`Tag`](super::Tag)
    TagId => "tag-"
);
entity_id!(
    /// Identifies an [`Expense`](super::Expense)
    ExpenseId => "exp-"
);
entity_id!(
    /// Identifies a [`MonthlyLog`](super::MonthlyLog)
    LogId => "log-"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_display() {
        let id = TagId::new();
        let shown = id.to_string();
        assert!(shown.starts_with("tag-"));
        assert_eq!(shown.len(), 12);
        assert!(id.key().starts_with(&shown[4..]));
    }

    #[test]
    fn test_ids_are_distinct() {
        let id = ExpenseId::new();
        let copy = id;
        assert_eq!(id, copy);
        assert_ne!(id, ExpenseId::new());
    }

    #[test]
    fn test_serialized_as_full_uuid() {
        let id = LogId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.key()));

        let back: LogId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_deserialize_known_uuid() {
        let id: TagId = serde_json::from_str("\"550e8400-e29b-41d4-a716-446655440000\"").unwrap();
        assert_eq!(id.to_string(), "tag-550e8400");
        assert_eq!(id.key(), "550e8400-e29b-41d4-a716-446655440000");
    }
}
