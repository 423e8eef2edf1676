// Path: crates/types/src/error/mod.rs
//! Core error types for dagsel.

use crate::cid::{Cid, Multicodec};
use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors produced while parsing a content identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CidError {
    /// The string form does not start with a supported multibase prefix.
    #[error("Unsupported multibase prefix '{0}'")]
    UnsupportedMultibase(char),
    /// The string form is not valid for its multibase.
    #[error("Invalid CID encoding: {0}")]
    Encoding(String),
    /// The CID version byte is not supported.
    #[error("Unsupported CID version {0}")]
    UnsupportedVersion(u8),
    /// The multihash function is not supported.
    #[error("Unsupported multihash code 0x{0:02x}")]
    UnsupportedMultihash(u8),
    /// The digest length does not match the multihash function.
    #[error("Invalid digest length {0}")]
    DigestLength(usize),
    /// The input ended before a complete CID was read.
    #[error("Truncated CID")]
    Truncated,
}

impl ErrorCode for CidError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedMultibase(_) => "CID_UNSUPPORTED_MULTIBASE",
            Self::Encoding(_) => "CID_ENCODING",
            Self::UnsupportedVersion(_) => "CID_UNSUPPORTED_VERSION",
            Self::UnsupportedMultihash(_) => "CID_UNSUPPORTED_MULTIHASH",
            Self::DigestLength(_) => "CID_DIGEST_LENGTH",
            Self::Truncated => "CID_TRUNCATED",
        }
    }
}

/// Errors produced by a codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The bytes are not a valid encoding for the codec.
    #[error("Decode error: {0}")]
    Decode(String),
    /// The node cannot be represented by the codec.
    #[error("Encode error: {0}")]
    Encode(String),
    /// No codec is registered for the multicodec code.
    #[error("No codec registered for {0}")]
    Unsupported(Multicodec),
}

impl ErrorCode for CodecError {
    fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "CODEC_DECODE",
            Self::Encode(_) => "CODEC_ENCODE",
            Self::Unsupported(_) => "CODEC_UNSUPPORTED",
        }
    }
}

/// Represents errors that can occur within a block store backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// A generic error originating from the underlying backend.
    #[error("Backend error: {0}")]
    Backend(String),
    /// An I/O error from a filesystem-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A stored block does not hash to the identifier it was stored under.
    #[error("Stored block does not match its identifier {0}")]
    Corrupt(Cid),
}

impl ErrorCode for StorageError {
    fn code(&self) -> &'static str {
        match self {
            Self::Backend(_) => "STORAGE_BACKEND",
            Self::Io(_) => "STORAGE_IO",
            Self::Corrupt(_) => "STORAGE_CORRUPT",
        }
    }
}

/// Errors raised while parsing and validating a selector document.
///
/// Every variant is raised before the traversal fetches anything.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The document or an instruction is malformed.
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
    /// The document's root is not a valid content identifier.
    #[error("Invalid root identifier: {0}")]
    InvalidRoot(#[from] CidError),
}

impl SelectorError {
    /// Shorthand for building an [`SelectorError::InvalidSelector`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidSelector(msg.into())
    }
}

impl ErrorCode for SelectorError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidSelector(_) => "SELECTOR_INVALID",
            Self::InvalidRoot(_) => "SELECTOR_INVALID_ROOT",
        }
    }
}

/// Fatal errors that abort a traversal.
///
/// Blocks emitted before the error remain a valid prefix of the visited set.
#[derive(Error, Debug)]
pub enum TraversalError {
    /// A referenced block is absent from the store.
    #[error("Block {0} not found")]
    NotFound(Cid),
    /// A fetched block could not be decoded.
    #[error("Failed to decode block {cid}: {source}")]
    Decode {
        /// The block that failed to decode.
        cid: Cid,
        /// The codec's error.
        #[source]
        source: CodecError,
    },
    /// The block store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ErrorCode for TraversalError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "TRAVERSAL_NOT_FOUND",
            Self::Decode { .. } => "TRAVERSAL_DECODE",
            Self::Storage(_) => "TRAVERSAL_STORAGE",
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid TOML for the expected shape.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "CONFIG_IO",
            Self::Parse(_) => "CONFIG_PARSE",
        }
    }
}
