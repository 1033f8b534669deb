//! Post record store
//!
//! The store holds the canonical state of all posts. Two backends share
//! the same in-memory [`PostTable`]:
//!
//! - [`MemoryStore`]: table behind an `RwLock`, gone when the process exits
//! - [`FileStore`]: table persisted as a checksummed JSON snapshot
//!
//! # Invariants
//!
//! - Ids are assigned monotonically from 1 and never reused
//! - Iteration order is ascending id, which is creation order
//! - A failed write leaves the visible table unchanged

mod checksum;
mod errors;
mod file;
mod memory;
mod record;

pub use checksum::{compute_checksum, verify_checksum};
pub use errors::{StoreError, StoreResult};
pub use file::{FileStore, SNAPSHOT_FILE_NAME};
pub use memory::MemoryStore;
pub use record::{Post, PostFields, PostTable};

/// Storage operations required by the post handlers.
///
/// Every method is a single atomic step: callers never observe a
/// half-applied change.
pub trait PostStore: Send + Sync {
    /// All posts in ascending id order.
    fn all(&self) -> StoreResult<Vec<Post>>;

    /// Look up a single post.
    fn find(&self, id: u64) -> StoreResult<Option<Post>>;

    /// Persist a new post and return it with its assigned id and timestamps.
    fn insert(&self, fields: PostFields) -> StoreResult<Post>;

    /// Overwrite both fields of an existing post.
    ///
    /// Returns `None` if no post has this id.
    fn update(&self, id: u64, fields: PostFields) -> StoreResult<Option<Post>>;

    /// Remove a post, returning the record as it was before deletion.
    fn delete(&self, id: u64) -> StoreResult<Option<Post>>;
}
