//! Post records and the in-memory post table

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The user-writable fields of a post, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFields {
    pub title: String,
    pub description: String,
}

impl PostFields {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Ordered table of posts with an auto-increment id counter.
///
/// `next_id` only ever grows, so deleting the newest post does not free
/// its id for reuse.
#[derive(Debug, Clone)]
pub struct PostTable {
    next_id: u64,
    rows: BTreeMap<u64, Post>,
}

impl Default for PostTable {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl PostTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a table from persisted rows.
    ///
    /// The counter is raised past the highest stored id if needed.
    pub fn from_parts(next_id: u64, posts: Vec<Post>) -> Self {
        let rows: BTreeMap<u64, Post> = posts.into_iter().map(|p| (p.id, p)).collect();
        let floor = rows.keys().next_back().map_or(1, |max| max + 1);
        Self {
            next_id: next_id.max(floor),
            rows,
        }
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in ascending id order.
    pub fn rows(&self) -> impl Iterator<Item = &Post> {
        self.rows.values()
    }

    pub fn get(&self, id: u64) -> Option<&Post> {
        self.rows.get(&id)
    }

    pub fn insert(&mut self, fields: PostFields, now: DateTime<Utc>) -> Post {
        let id = self.next_id;
        self.next_id += 1;

        let post = Post {
            id,
            title: fields.title,
            description: fields.description,
            created_at: now,
            updated_at: now,
        };
        self.rows.insert(id, post.clone());
        post
    }

    /// Overwrite both fields. `updated_at` moves only if something changed.
    pub fn update(&mut self, id: u64, fields: PostFields, now: DateTime<Utc>) -> Option<Post> {
        let post = self.rows.get_mut(&id)?;

        let dirty = post.title != fields.title || post.description != fields.description;
        if dirty {
            post.title = fields.title;
            post.description = fields.description;
            post.updated_at = now;
        }
        Some(post.clone())
    }

    pub fn remove(&mut self, id: u64) -> Option<Post> {
        self.rows.remove(&id)
    }
}
