// Path: crates/selector/src/stream.rs

//! `futures::Stream` adapters over [`Traversal`].

use crate::engine::Traversal;
use dagsel_types::error::TraversalError;
use dagsel_types::Block;
use futures::stream::{self, Stream};

impl Traversal {
    /// Borrows the traversal as a stream of blocks.
    ///
    /// The stream ends after the last block or right after an error; the
    /// traversal's resolution can be read once it has ended.
    pub fn blocks(&mut self) -> impl Stream<Item = Result<Block, TraversalError>> + '_ {
        stream::unfold(self, |traversal| async move {
            match traversal.next_block().await {
                Ok(Some(block)) => Some((Ok(block), traversal)),
                Ok(None) => None,
                Err(e) => Some((Err(e), traversal)),
            }
        })
    }

    /// Consumes the traversal into an owned stream of blocks.
    pub fn into_stream(self) -> impl Stream<Item = Result<Block, TraversalError>> + Send {
        stream::unfold(Some(self), |state| async move {
            let mut traversal = state?;
            match traversal.next_block().await {
                Ok(Some(block)) => Some((Ok(block), Some(traversal))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }
}
