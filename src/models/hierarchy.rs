//! Tag hierarchy
//!
//! Tags form a directed acyclic graph: a tag may have any number of members
//! and any number of parents. The graph is kept as a `parent -> members`
//! adjacency map keyed by [`TagId`]; the `child -> parents` map is a derived
//! index maintained alongside it.
//!
//! Closures, ancestor matching and the cycle check before adding an edge all
//! go through the same guarded worklist search.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{ScroogeError, ScroogeResult};

use super::ids::TagId;
use super::tag::Tag;

/// In-memory view of all tags and their membership edges
#[derive(Debug, Clone, Default)]
pub struct TagGraph {
    names: HashMap<TagId, String>,
    members: HashMap<TagId, BTreeSet<TagId>>,
    parents: HashMap<TagId, BTreeSet<TagId>>,
}

impl TagGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from stored tags
    ///
    /// Member ids that do not refer to one of `tags` are ignored.
    pub fn from_tags<'a>(tags: impl IntoIterator<Item = &'a Tag>) -> Self {
        let tags: Vec<&Tag> = tags.into_iter().collect();
        let mut graph = Self::new();
        for tag in &tags {
            graph.add_tag(tag.id, tag.name.clone());
        }
        for tag in &tags {
            for member in &tag.members {
                if graph.contains(*member) {
                    graph.insert_edge(tag.id, *member);
                }
            }
        }
        graph
    }

    /// Register a tag node
    pub fn add_tag(&mut self, id: TagId, name: impl Into<String>) {
        self.names.insert(id, name.into());
        self.members.entry(id).or_default();
        self.parents.entry(id).or_default();
    }

    pub fn contains(&self, id: TagId) -> bool {
        self.names.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All tag ids in the graph
    pub fn tag_ids(&self) -> impl Iterator<Item = TagId> + '_ {
        self.names.keys().copied()
    }

    /// Look up a tag id by its exact name
    pub fn find_by_name(&self, name: &str) -> Option<TagId> {
        self.names
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(id, _)| *id)
    }

    /// Name of a tag, or its short id if it is not part of the graph
    pub fn name(&self, id: TagId) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    /// Direct members of a tag
    pub fn members(&self, id: TagId) -> BTreeSet<TagId> {
        self.members.get(&id).cloned().unwrap_or_default()
    }

    /// Direct parents of a tag
    pub fn parents(&self, id: TagId) -> BTreeSet<TagId> {
        self.parents.get(&id).cloned().unwrap_or_default()
    }

    /// Make `child` a member of `parent`
    ///
    /// Fails with [`ScroogeError::Cycle`] if `child` already reaches `parent`
    /// (which includes `parent == child`) and with
    /// [`ScroogeError::AlreadyMember`] if the edge exists. On failure the
    /// graph is unchanged.
    pub fn add_membership(&mut self, parent: TagId, child: TagId) -> ScroogeResult<()> {
        self.require(parent)?;
        self.require(child)?;

        if self.has_edge(parent, child) {
            return Err(ScroogeError::AlreadyMember {
                parent: self.name(parent),
                child: self.name(child),
            });
        }

        if self.reaches(child, parent) {
            return Err(ScroogeError::Cycle {
                parent: self.name(parent),
                child: self.name(child),
            });
        }

        self.insert_edge(parent, child);
        Ok(())
    }

    /// Remove `child` from the members of `parent`
    pub fn remove_membership(&mut self, parent: TagId, child: TagId) -> ScroogeResult<()> {
        self.require(parent)?;
        self.require(child)?;

        if !self.has_edge(parent, child) {
            return Err(ScroogeError::NotMember {
                parent: self.name(parent),
                child: self.name(child),
            });
        }

        if let Some(members) = self.members.get_mut(&parent) {
            members.remove(&child);
        }
        if let Some(parents) = self.parents.get_mut(&child) {
            parents.remove(&parent);
        }
        Ok(())
    }

    /// All tags reachable from `roots` by following member edges, roots included
    pub fn closure(&self, roots: impl IntoIterator<Item = TagId>) -> HashSet<TagId> {
        self.search(roots, None).0
    }

    /// Whether `to` is in the closure of `from`
    pub fn reaches(&self, from: TagId, to: TagId) -> bool {
        self.search([from], Some(to)).1
    }

    /// Whether an expense tagged `tag` counts toward `ancestor`
    pub fn matches(&self, tag: TagId, ancestor: TagId) -> bool {
        self.reaches(ancestor, tag)
    }

    /// A tag that is its own transitive member, if the graph has a cycle
    ///
    /// Graphs built through [`add_membership`](Self::add_membership) never
    /// have one; stored data read from elsewhere might.
    pub fn find_cycle(&self) -> Option<TagId> {
        let mut ids: Vec<TagId> = self.tag_ids().collect();
        ids.sort();
        ids.into_iter().find(|id| {
            self.members
                .get(id)
                .map(|members| self.search(members.iter().copied(), Some(*id)).1)
                .unwrap_or(false)
        })
    }

    fn has_edge(&self, parent: TagId, child: TagId) -> bool {
        self.members
            .get(&parent)
            .map(|m| m.contains(&child))
            .unwrap_or(false)
    }

    fn insert_edge(&mut self, parent: TagId, child: TagId) {
        self.members.entry(parent).or_default().insert(child);
        self.parents.entry(child).or_default().insert(parent);
    }

    fn require(&self, id: TagId) -> ScroogeResult<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(ScroogeError::tag_not_found(id.to_string()))
        }
    }

    /// Worklist traversal over member edges with a visited-set guard
    ///
    /// Returns the visited set and whether `target` was reached. The search
    /// stops as soon as `target` is visited.
    fn search(
        &self,
        roots: impl IntoIterator<Item = TagId>,
        target: Option<TagId>,
    ) -> (HashSet<TagId>, bool) {
        let mut visited = HashSet::new();
        let mut worklist: Vec<TagId> = roots.into_iter().collect();

        while let Some(tag) = worklist.pop() {
            if !visited.insert(tag) {
                continue;
            }
            if target == Some(tag) {
                return (visited, true);
            }
            if let Some(members) = self.members.get(&tag) {
                worklist.extend(members.iter().filter(|m| !visited.contains(m)).copied());
            }
        }

        (visited, false)
    }
}
