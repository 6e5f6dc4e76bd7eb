//! Tag service
//!
//! Creation and listing of tags, and membership edits on the tag hierarchy.

use crate::audit::AuditEntry;
use crate::error::{ScroogeError, ScroogeResult};
use crate::models::{validate_tag_name, Tag, TagGraph, TagId};
use crate::storage::Repository;

/// A tag with the names of its direct members
#[derive(Debug, Clone)]
pub struct TagListing {
    pub tag: Tag,
    pub member_names: Vec<String>,
}

/// What happened to one membership modifier
#[derive(Debug)]
pub struct ModifierOutcome {
    pub modifier: String,
    pub result: Result<MembershipChange, ScroogeError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipChange {
    Added(String),
    Removed(String),
}

impl ModifierOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Service for tag management
pub struct TagService<'a, R: Repository> {
    repo: &'a R,
}

impl<'a, R: Repository> TagService<'a, R> {
    /// Create a new tag service
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Create a new tag
    pub fn create(&self, name: &str, description: Option<&str>) -> ScroogeResult<Tag> {
        let name = name.trim();
        validate_tag_name(name).map_err(|e| ScroogeError::Validation(e.to_string()))?;

        if self.repo.find_tag_by_name(name)?.is_some() {
            return Err(ScroogeError::Duplicate {
                entity_type: "Tag",
                identifier: name.to_string(),
            });
        }

        let tag = match description {
            Some(description) => Tag::with_description(name, description),
            None => Tag::new(name),
        };

        self.repo.insert_tag(tag.clone())?;
        self.repo.persist()?;
        self.repo.record(AuditEntry::tag_created(&tag))?;

        Ok(tag)
    }

    /// Get a tag by its exact name
    pub fn get_by_name(&self, name: &str) -> ScroogeResult<Tag> {
        self.repo
            .find_tag_by_name(name)?
            .ok_or_else(|| ScroogeError::tag_not_found(name))
    }

    /// List all tags with their direct members
    pub fn list(&self) -> ScroogeResult<Vec<TagListing>> {
        let tags = self.repo.all_tags()?;
        let graph = TagGraph::from_tags(&tags);

        Ok(tags
            .into_iter()
            .map(|tag| {
                let mut member_names: Vec<String> =
                    tag.members.iter().map(|m| graph.name(*m)).collect();
                member_names.sort();
                TagListing { tag, member_names }
            })
            .collect())
    }

    /// Apply `+name` / `-name` modifiers to the direct members of a tag
    ///
    /// Removals are applied before additions. Every modifier succeeds or fails
    /// on its own; a rejected one does not stop the others.
    pub fn modify_members<S: AsRef<str>>(
        &self,
        parent_name: &str,
        modifiers: &[S],
    ) -> ScroogeResult<Vec<ModifierOutcome>> {
        let parent = self.get_by_name(parent_name)?;
        let mut graph = self.repo.tag_graph()?;

        let mut removals = Vec::new();
        let mut additions = Vec::new();
        let mut outcomes = Vec::new();

        for modifier in modifiers {
            let modifier = modifier.as_ref().trim();
            match parse_modifier(modifier, &graph) {
                Ok((false, child)) => removals.push((modifier.to_string(), child)),
                Ok((true, child)) => additions.push((modifier.to_string(), child)),
                Err(e) => outcomes.push(ModifierOutcome {
                    modifier: modifier.to_string(),
                    result: Err(e),
                }),
            }
        }

        let before_names = member_names(&graph, parent.id);

        for (modifier, child) in removals {
            let result = graph
                .remove_membership(parent.id, child)
                .map(|_| MembershipChange::Removed(graph.name(child)));
            outcomes.push(ModifierOutcome { modifier, result });
        }
        for (modifier, child) in additions {
            let result = graph
                .add_membership(parent.id, child)
                .map(|_| MembershipChange::Added(graph.name(child)));
            outcomes.push(ModifierOutcome { modifier, result });
        }

        let members = graph.members(parent.id);
        if members != parent.members {
            let before = parent.clone();
            let mut updated = parent;
            updated.set_members(members);

            self.repo.update_tag(updated.clone())?;
            self.repo.persist()?;

            let after_names = member_names(&graph, updated.id);
            self.repo.record(AuditEntry::members_changed(
                &before,
                &updated,
                &before_names,
                &after_names,
            ))?;
        }

        Ok(outcomes)
    }
}

/// Split a modifier into (is_addition, tag)
fn parse_modifier(modifier: &str, graph: &TagGraph) -> ScroogeResult<(bool, TagId)> {
    let (adding, name) = if let Some(name) = modifier.strip_prefix('+') {
        (true, name)
    } else if let Some(name) = modifier.strip_prefix('-') {
        (false, name)
    } else {
        return Err(ScroogeError::Validation(format!(
            "Invalid modifier '{}': has to start with '+' or '-'",
            modifier
        )));
    };

    let id = graph
        .find_by_name(name)
        .ok_or_else(|| ScroogeError::UnknownTag(name.to_string()))?;
    Ok((adding, id))
}

fn member_names(graph: &TagGraph, id: TagId) -> Vec<String> {
    let mut names: Vec<String> = graph.members(id).iter().map(|m| graph.name(*m)).collect();
    names.sort();
    names
}
