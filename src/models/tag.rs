//! Tag model
//!
//! Tags are free-form labels attached to expenses. A tag may have any number
//! of member tags, which makes the set of tags a directed acyclic graph; see
//! [`TagGraph`](super::hierarchy::TagGraph) for the traversal and the cycle
//! checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::ids::TagId;

/// Maximum tag name length in characters
pub const MAX_TAG_NAME_LEN: usize = 100;

/// A tag with its direct members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// Unique identifier
    pub id: TagId,

    /// Unique tag name
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Direct members (children) of this tag
    #[serde(default)]
    pub members: BTreeSet<TagId>,

    /// When the tag was created
    pub created_at: DateTime<Utc>,

    /// When the tag was last modified
    pub updated_at: DateTime<Utc>,
}

impl Tag {
    /// Create a new tag without members
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: TagId::new(),
            name: name.into(),
            description: None,
            members: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new tag with a description
    pub fn with_description(name: impl Into<String>, description: impl Into<String>) -> Self {
        let mut tag = Self::new(name);
        let description = description.into();
        if !description.trim().is_empty() {
            tag.description = Some(description);
        }
        tag
    }

    /// Check whether `id` is a direct member
    pub fn has_member(&self, id: TagId) -> bool {
        self.members.contains(&id)
    }

    /// Replace the member set
    pub fn set_members(&mut self, members: BTreeSet<TagId>) {
        self.members = members;
        self.updated_at = Utc::now();
    }

    /// Validate the tag
    pub fn validate(&self) -> Result<(), TagValidationError> {
        validate_tag_name(&self.name)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Check that a name can be used as a tag name
///
/// Names appear unquoted in filter tokens (`+name`) and in comma-separated
/// CSV cells, so leading modifiers, commas and whitespace are not allowed.
pub fn validate_tag_name(name: &str) -> Result<(), TagValidationError> {
    if name.is_empty() {
        return Err(TagValidationError::EmptyName);
    }

    let len = name.chars().count();
    if len > MAX_TAG_NAME_LEN {
        return Err(TagValidationError::NameTooLong(len));
    }

    if name.starts_with('+') || name.starts_with('-') {
        return Err(TagValidationError::LeadingModifier(name.to_string()));
    }

    if let Some(c) = name.chars().find(|c| *c == ',' || c.is_whitespace()) {
        return Err(TagValidationError::InvalidCharacter(c));
    }

    Ok(())
}

/// Validation errors for tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValidationError {
    EmptyName,
    NameTooLong(usize),
    LeadingModifier(String),
    InvalidCharacter(char),
}

impl fmt::Display for TagValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Tag name cannot be empty"),
            Self::NameTooLong(len) => write!(
                f,
                "Tag name too long ({} chars, max {})",
                len, MAX_TAG_NAME_LEN
            ),
            Self::LeadingModifier(name) => {
                write!(f, "Tag name '{}' cannot start with '+' or '-'", name)
            }
            Self::InvalidCharacter(c) => write!(f, "Tag name cannot contain {:?}", c),
        }
    }
}

impl std::error::Error for TagValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tag() {
        let tag = Tag::new("groceries");
        assert_eq!(tag.name, "groceries");
        assert!(tag.description.is_none());
        assert!(tag.members.is_empty());
    }

    #[test]
    fn test_blank_description_is_dropped() {
        assert!(Tag::with_description("food", "  ").description.is_none());
        assert_eq!(
            Tag::with_description("food", "Everything edible").description,
            Some("Everything edible".to_string())
        );
    }

    #[test]
    fn test_validation() {
        assert!(Tag::new("food").validate().is_ok());
        assert_eq!(validate_tag_name(""), Err(TagValidationError::EmptyName));
        assert!(matches!(
            validate_tag_name(&"a".repeat(101)),
            Err(TagValidationError::NameTooLong(101))
        ));
        assert!(validate_tag_name(&"a".repeat(100)).is_ok());
        assert!(matches!(
            validate_tag_name("+food"),
            Err(TagValidationError::LeadingModifier(_))
        ));
        assert_eq!(
            validate_tag_name("eating out"),
            Err(TagValidationError::InvalidCharacter(' '))
        );
        assert_eq!(
            validate_tag_name("a,b"),
            Err(TagValidationError::InvalidCharacter(','))
        );
    }

    #[test]
    fn test_serialization() {
        let mut tag = Tag::new("food");
        let member = Tag::new("groceries");
        tag.members.insert(member.id);

        let json = serde_json::to_string(&tag).unwrap();
        let deserialized: Tag = serde_json::from_str(&json).unwrap();
        assert_eq!(tag.id, deserialized.id);
        assert!(deserialized.has_member(member.id));
    }
}
