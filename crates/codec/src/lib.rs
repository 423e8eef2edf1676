// Path: crates/codec/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! Concrete block codecs.
//!
//! * [`DagBincode`]: the binary codec, `bincode` over the serde form of `Node`.
//! * [`DagJson`]: JSON with links written as `{"/": "<cid>"}`.

pub mod bincode_codec;
pub mod json;

pub use bincode_codec::DagBincode;
pub use json::DagJson;

use dagsel_api::codec::CodecRegistry;
use std::sync::Arc;

/// Returns a registry with every codec in this crate registered.
pub fn registry() -> CodecRegistry {
    CodecRegistry::new()
        .with(Arc::new(DagBincode))
        .with(Arc::new(DagJson))
}
