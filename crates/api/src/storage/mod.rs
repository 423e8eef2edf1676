// Path: crates/api/src/storage/mod.rs

//! API for a content-addressed block store.

use async_trait::async_trait;
use dagsel_types::error::StorageError;
use dagsel_types::{Block, Cid};

/// The primary trait defining a content-addressed block store.
///
/// Implementations may be local, networked, or cached. The selector engine
/// only ever calls [`BlockStore::get`]; a miss is reported as `Ok(None)` and
/// the engine decides that a miss is fatal. Retry policy, if any, belongs to
/// the implementation.
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Fetches the block addressed by `cid`, or `None` if it is not available.
    async fn get(&self, cid: &Cid) -> Result<Option<Block>, StorageError>;

    /// Stores a block under its own identifier. Storing an existing block is a no-op.
    async fn put(&self, block: Block) -> Result<(), StorageError>;

    /// Checks whether a block is available.
    async fn has(&self, cid: &Cid) -> Result<bool, StorageError> {
        Ok(self.get(cid).await?.is_some())
    }
}
