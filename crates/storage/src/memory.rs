// Path: crates/storage/src/memory.rs

//! An in-memory block store.

use async_trait::async_trait;
use dagsel_api::storage::BlockStore;
use dagsel_types::error::StorageError;
use dagsel_types::{Block, Cid};
use parking_lot::RwLock;
use std::collections::HashMap;

/// A block store backed by a `HashMap` behind a read-write lock.
#[derive(Debug, Default)]
pub struct MemoryBlockStore {
    blocks: RwLock<HashMap<Cid, Block>>,
}

impl MemoryBlockStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blocks.
    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    /// True if the store holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }

    /// Removes a block, returning it if it was present.
    pub fn remove(&self, cid: &Cid) -> Option<Block> {
        self.blocks.write().remove(cid)
    }
}

#[async_trait]
impl BlockStore for MemoryBlockStore {
    async fn get(&self, cid: &Cid) -> Result<Option<Block>, StorageError> {
        Ok(self.blocks.read().get(cid).cloned())
    }

    async fn put(&self, block: Block) -> Result<(), StorageError> {
        self.blocks.write().entry(*block.cid()).or_insert(block);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagsel_types::Multicodec;

    #[tokio::test]
    async fn test_put_get_remove() {
        let store = MemoryBlockStore::new();
        let block = Block::encoded(Multicodec::DAG_JSON, b"[1,2]".to_vec());
        let cid = *block.cid();

        assert!(store.is_empty());
        store.put(block.clone()).await.unwrap();
        store.put(block.clone()).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&cid).await.unwrap(), Some(block.clone()));

        assert_eq!(store.remove(&cid), Some(block));
        assert_eq!(store.get(&cid).await.unwrap(), None);
    }
}
