// Path: crates/storage/src/fs.rs

//! A filesystem block store.
//!
//! Each block lives in its own file, named by the string form of its CID,
//! directly under the store's root directory.

use async_trait::async_trait;
use dagsel_api::storage::BlockStore;
use dagsel_types::error::StorageError;
use dagsel_types::{Block, Cid};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A block store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FsBlockStore {
    root: PathBuf,
}

impl FsBlockStore {
    /// Opens the store at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        tracing::debug!(target: "storage", root = %root.display(), "opened filesystem block store");
        Ok(Self { root })
    }

    /// The directory holding the blocks.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, cid: &Cid) -> PathBuf {
        self.root.join(cid.to_string())
    }
}

#[async_trait]
impl BlockStore for FsBlockStore {
    async fn get(&self, cid: &Cid) -> Result<Option<Block>, StorageError> {
        let data = match tokio::fs::read(self.path_for(cid)).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        // A renamed or damaged file must not be served under the wrong name.
        if Cid::hash(cid.codec(), &data) != *cid {
            return Err(StorageError::Corrupt(*cid));
        }
        tracing::trace!(target: "storage", %cid, len = data.len(), "read block");
        Ok(Some(Block::new(*cid, data)))
    }

    async fn put(&self, block: Block) -> Result<(), StorageError> {
        let path = self.path_for(block.cid());
        if tokio::fs::try_exists(&path).await? {
            return Ok(());
        }
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, block.data()).await?;
        tokio::fs::rename(&tmp, &path).await?;
        tracing::trace!(target: "storage", cid = %block.cid(), "wrote block");
        Ok(())
    }

    async fn has(&self, cid: &Cid) -> Result<bool, StorageError> {
        Ok(tokio::fs::try_exists(self.path_for(cid)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagsel_types::Multicodec;

    #[tokio::test]
    async fn test_blocks_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let block = Block::encoded(Multicodec::DAG_JSON, br#"{"a":1}"#.to_vec());
        let cid = *block.cid();

        let store = FsBlockStore::open(dir.path().join("blocks")).await.unwrap();
        assert_eq!(store.get(&cid).await.unwrap(), None);
        store.put(block.clone()).await.unwrap();
        assert!(store.has(&cid).await.unwrap());

        let reopened = FsBlockStore::open(dir.path().join("blocks")).await.unwrap();
        assert_eq!(reopened.get(&cid).await.unwrap(), Some(block));
    }

    #[tokio::test]
    async fn test_tampered_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlockStore::open(dir.path()).await.unwrap();
        let block = Block::encoded(Multicodec::DAG_JSON, b"1".to_vec());
        let cid = *block.cid();
        store.put(block).await.unwrap();

        std::fs::write(dir.path().join(cid.to_string()), b"2").unwrap();
        assert!(matches!(
            store.get(&cid).await,
            Err(StorageError::Corrupt(c)) if c == cid
        ));
    }
}
