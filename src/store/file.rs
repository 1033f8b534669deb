//! File-backed post store
//!
//! The whole table lives in memory and is written out as a single JSON
//! snapshot after every mutation:
//!
//! ```text
//! { "version": 1, "next_id": 4, "checksum": 2868205937, "posts": [ ... ] }
//! ```
//!
//! The CRC32 covers `next_id` (little-endian) followed by the compact JSON
//! encoding of `posts`. A snapshot whose checksum does not match is never
//! loaded.
//!
//! Writes are atomic:
//! 1. Write the new snapshot to `posts.json.tmp`
//! 2. fsync the temp file
//! 3. Rename over `posts.json`
//!
//! The in-memory table is only replaced after the rename succeeds.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::checksum::{compute_checksum, verify_checksum};
use super::errors::{StoreError, StoreResult};
use super::record::{Post, PostFields, PostTable};
use super::PostStore;

/// Snapshot file name inside the data directory
pub const SNAPSHOT_FILE_NAME: &str = "posts.json";

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    next_id: u64,
    checksum: u32,
    posts: Value,
}

/// Bytes covered by the snapshot checksum.
fn checksummed_bytes(next_id: u64, posts: &Value) -> StoreResult<Vec<u8>> {
    let mut buf = next_id.to_le_bytes().to_vec();
    buf.extend(serde_json::to_vec(posts)?);
    Ok(buf)
}

fn snapshot_checksum(next_id: u64, posts: &Value) -> StoreResult<u32> {
    Ok(compute_checksum(&checksummed_bytes(next_id, posts)?))
}

/// Post store persisted to `<data_dir>/posts.json`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    temp_path: PathBuf,
    table: RwLock<PostTable>,
}

impl FileStore {
    /// Open the store, creating the data directory if needed.
    ///
    /// A missing snapshot means an empty store.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        fs::create_dir_all(data_dir).map_err(|e| StoreError::io(data_dir, e))?;

        let path = data_dir.join(SNAPSHOT_FILE_NAME);
        let temp_path = data_dir.join(format!("{}.tmp", SNAPSHOT_FILE_NAME));
        let table = Self::load(&path)?;

        Ok(Self {
            path,
            temp_path,
            table: RwLock::new(table),
        })
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of posts currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        let table = self.table.read().map_err(|_| StoreError::Poisoned)?;
        Ok(table.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    fn load(path: &Path) -> StoreResult<PostTable> {
        let content = match fs::read(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PostTable::new()),
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let snapshot: Snapshot = serde_json::from_slice(&content)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion(snapshot.version));
        }

        let covered = checksummed_bytes(snapshot.next_id, &snapshot.posts)?;
        if !verify_checksum(&covered, snapshot.checksum) {
            return Err(StoreError::Corrupted {
                path: path.to_path_buf(),
                expected: snapshot.checksum,
                actual: compute_checksum(&covered),
            });
        }

        let posts: Vec<Post> = serde_json::from_value(snapshot.posts)?;
        Ok(PostTable::from_parts(snapshot.next_id, posts))
    }

    fn persist(&self, table: &PostTable) -> StoreResult<()> {
        let rows: Vec<&Post> = table.rows().collect();
        let posts = serde_json::to_value(rows)?;
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            next_id: table.next_id(),
            checksum: snapshot_checksum(table.next_id(), &posts)?,
            posts,
        };
        let content = serde_json::to_vec_pretty(&snapshot)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp_path)
            .map_err(|e| StoreError::io(&self.temp_path, e))?;
        file.write_all(&content)
            .map_err(|e| StoreError::io(&self.temp_path, e))?;
        file.sync_all()
            .map_err(|e| StoreError::io(&self.temp_path, e))?;

        fs::rename(&self.temp_path, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        // make the rename itself durable
        if let Some(parent) = self.path.parent() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        Ok(())
    }

    /// Apply `f` to a copy of the table, persist it, then publish it.
    ///
    /// Holds the write lock across the fsync and copies the whole table, so
    /// each write costs O(posts). Callers on an async runtime go through
    /// `spawn_blocking`.
    fn mutate<T>(&self, f: impl FnOnce(&mut PostTable) -> T) -> StoreResult<T> {
        let mut table = self.table.write().map_err(|_| StoreError::Poisoned)?;
        let mut next = table.clone();
        let out = f(&mut next);
        self.persist(&next)?;
        *table = next;
        Ok(out)
    }
}

impl PostStore for FileStore {
    fn all(&self) -> StoreResult<Vec<Post>> {
        let table = self.table.read().map_err(|_| StoreError::Poisoned)?;
        Ok(table.rows().cloned().collect())
    }

    fn find(&self, id: u64) -> StoreResult<Option<Post>> {
        let table = self.table.read().map_err(|_| StoreError::Poisoned)?;
        Ok(table.get(id).cloned())
    }

    fn insert(&self, fields: PostFields) -> StoreResult<Post> {
        self.mutate(|table| table.insert(fields, Utc::now()))
    }

    fn update(&self, id: u64, fields: PostFields) -> StoreResult<Option<Post>> {
        {
            let table = self.table.read().map_err(|_| StoreError::Poisoned)?;
            if table.get(id).is_none() {
                return Ok(None);
            }
        }
        self.mutate(|table| table.update(id, fields, Utc::now()))
    }

    fn delete(&self, id: u64) -> StoreResult<Option<Post>> {
        {
            let table = self.table.read().map_err(|_| StoreError::Poisoned)?;
            if table.get(id).is_none() {
                return Ok(None);
            }
        }
        self.mutate(|table| table.remove(id))
    }
}
