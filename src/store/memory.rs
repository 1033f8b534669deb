//! In-memory post store

use std::sync::RwLock;

use chrono::Utc;

use super::errors::{StoreError, StoreResult};
use super::record::{Post, PostFields, PostTable};
use super::PostStore;

/// Post store that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: RwLock<PostTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PostStore for MemoryStore {
    fn all(&self) -> StoreResult<Vec<Post>> {
        let table = self.table.read().map_err(|_| StoreError::Poisoned)?;
        Ok(table.rows().cloned().collect())
    }

    fn find(&self, id: u64) -> StoreResult<Option<Post>> {
        let table = self.table.read().map_err(|_| StoreError::Poisoned)?;
        Ok(table.get(id).cloned())
    }

    fn insert(&self, fields: PostFields) -> StoreResult<Post> {
        let mut table = self.table.write().map_err(|_| StoreError::Poisoned)?;
        Ok(table.insert(fields, Utc::now()))
    }

    fn update(&self, id: u64, fields: PostFields) -> StoreResult<Option<Post>> {
        let mut table = self.table.write().map_err(|_| StoreError::Poisoned)?;
        Ok(table.update(id, fields, Utc::now()))
    }

    fn delete(&self, id: u64) -> StoreResult<Option<Post>> {
        let mut table = self.table.write().map_err(|_| StoreError::Poisoned)?;
        Ok(table.remove(id))
    }
}
