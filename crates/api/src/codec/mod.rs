// Path: crates/api/src/codec/mod.rs

//! The pluggable codec layer.
//!
//! A [`Codec`] turns block bytes into a [`Node`] and back. The
//! [`CodecRegistry`] selects the codec named by a block's identifier, so a
//! single traversal may cross blocks encoded with different codecs.

use dagsel_types::error::CodecError;
use dagsel_types::{Block, Multicodec, Node};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A block codec.
pub trait Codec: Send + Sync {
    /// The multicodec code blocks encoded with this codec carry in their CID.
    fn code(&self) -> Multicodec;

    /// Decodes raw block bytes. Malformed input is a [`CodecError::Decode`].
    fn decode(&self, bytes: &[u8]) -> Result<Node, CodecError>;

    /// Encodes a node into canonical bytes.
    fn encode(&self, node: &Node) -> Result<Vec<u8>, CodecError>;
}

/// Dispatches encoding and decoding on multicodec codes.
#[derive(Clone, Default)]
pub struct CodecRegistry {
    codecs: HashMap<Multicodec, Arc<dyn Codec>>,
}

impl CodecRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a codec under its own code, replacing any previous one.
    pub fn register(&mut self, codec: Arc<dyn Codec>) -> &mut Self {
        self.codecs.insert(codec.code(), codec);
        self
    }

    /// Builder-style [`CodecRegistry::register`].
    pub fn with(mut self, codec: Arc<dyn Codec>) -> Self {
        self.register(codec);
        self
    }

    /// Looks up the codec for `code`.
    pub fn get(&self, code: Multicodec) -> Result<&Arc<dyn Codec>, CodecError> {
        self.codecs.get(&code).ok_or(CodecError::Unsupported(code))
    }

    /// Decodes a block with the codec its identifier names.
    pub fn decode(&self, block: &Block) -> Result<Node, CodecError> {
        self.get(block.cid().codec())?.decode(block.data())
    }

    /// Encodes `node` with `code` and addresses the result.
    pub fn encode(&self, code: Multicodec, node: &Node) -> Result<Block, CodecError> {
        let bytes = self.get(code)?.encode(node)?;
        Ok(Block::encoded(code, bytes))
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut codes: Vec<_> = self.codecs.keys().collect();
        codes.sort();
        f.debug_struct("CodecRegistry").field("codecs", &codes).finish()
    }
}
