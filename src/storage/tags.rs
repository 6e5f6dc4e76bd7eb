//! Tag repository for JSON storage
//!
//! Manages loading and saving tags to tags.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::ScroogeError;
use crate::models::{Tag, TagId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable tag data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TagData {
    tags: Vec<Tag>,
}

/// Repository for tag persistence
pub struct TagRepository {
    path: PathBuf,
    data: RwLock<HashMap<TagId, Tag>>,
}

impl TagRepository {
    /// Create a new tag repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load tags from disk
    pub fn load(&self) -> Result<(), ScroogeError> {
        let file_data: TagData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for tag in file_data.tags {
            data.insert(tag.id, tag);
        }

        Ok(())
    }

    /// Save tags to disk
    pub fn save(&self) -> Result<(), ScroogeError> {
        let tags = self.get_all()?;
        write_json_atomic(&self.path, &TagData { tags })
    }

    /// Get a tag by ID
    pub fn get(&self, id: TagId) -> Result<Option<Tag>, ScroogeError> {
        let data = self
            .data
            .read()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all tags, sorted by name
    pub fn get_all(&self) -> Result<Vec<Tag>, ScroogeError> {
        let data = self
            .data
            .read()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = data.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    /// Get a tag by its exact name
    pub fn get_by_name(&self, name: &str) -> Result<Option<Tag>, ScroogeError> {
        let data = self
            .data
            .read()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.values().find(|t| t.name == name).cloned())
    }

    /// Insert or update a tag
    pub fn upsert(&self, tag: Tag) -> Result<(), ScroogeError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(tag.id, tag);
        Ok(())
    }

    /// Replace all tags
    pub fn replace_all(&self, tags: Vec<Tag>) -> Result<(), ScroogeError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        data.extend(tags.into_iter().map(|t| (t.id, t)));
        Ok(())
    }

    /// Count tags
    pub fn count(&self) -> Result<usize, ScroogeError> {
        let data = self
            .data
            .read()
            .map_err(|e| ScroogeError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}
