// Path: crates/api/src/lib.rs

//! # dagsel API Crate Lints
//!
//! This crate enforces a strict set of lints to ensure panic-free code.
//! Panics are disallowed in non-test code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
//! # dagsel API
//!
//! The capabilities the selector engine consumes from its host: fetching
//! blocks by identifier and decoding block bytes into nodes. The engine
//! receives both at construction; nothing here is process-wide state.

/// The pluggable codec layer and the registry that dispatches on multicodec codes.
pub mod codec;
/// The content-addressed block store contract.
pub mod storage;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::codec::{Codec, CodecRegistry};
    pub use crate::storage::BlockStore;
}
