// Path: crates/types/src/block.rs

//! Raw content-addressed blocks.

use crate::cid::{Cid, Multicodec};
use std::fmt;
use std::sync::Arc;

/// The raw bytes of one graph node together with the identifier addressing them.
///
/// Blocks are immutable. Cloning shares the underlying buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Block {
    cid: Cid,
    data: Arc<[u8]>,
}

impl Block {
    /// Pairs already addressed bytes with their identifier.
    ///
    /// The pairing is trusted: integrity verification belongs to the store.
    pub fn new(cid: Cid, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            cid,
            data: data.into(),
        }
    }

    /// Addresses `data` encoded with `codec` and wraps it in a block.
    pub fn encoded(codec: Multicodec, data: Vec<u8>) -> Self {
        let cid = Cid::hash(codec, &data);
        Self::new(cid, data)
    }

    /// The identifier of this block.
    pub fn cid(&self) -> &Cid {
        &self.cid
    }

    /// The raw encoded bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("cid", &self.cid)
            .field("len", &self.data.len())
            .finish()
    }
}
