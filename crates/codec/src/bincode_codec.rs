// Path: crates/codec/src/bincode_codec.rs

//! The binary block codec.

use bincode::Options;
use dagsel_api::codec::Codec;
use dagsel_types::error::CodecError;
use dagsel_types::{Multicodec, Node};

/// The maximum size in bytes of one encoded block.
pub const MAX_BLOCK_BYTES: u64 = 1024 * 1024; // 1 MiB

/// Fixed-width, size-limited `bincode` over the serde form of [`Node`].
///
/// Map keys are sorted by construction, so encoding is canonical.
#[derive(Debug, Clone, Copy, Default)]
pub struct DagBincode;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(MAX_BLOCK_BYTES)
        .reject_trailing_bytes()
}

impl Codec for DagBincode {
    fn code(&self) -> Multicodec {
        Multicodec::DAG_BINCODE
    }

    fn decode(&self, bytes: &[u8]) -> Result<Node, CodecError> {
        options()
            .deserialize(bytes)
            .map_err(|e| CodecError::Decode(e.to_string()))
    }

    fn encode(&self, node: &Node) -> Result<Vec<u8>, CodecError> {
        options()
            .serialize(node)
            .map_err(|e| CodecError::Encode(e.to_string()))
    }
}
