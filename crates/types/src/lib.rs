// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]
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

//! # dagsel Types
//!
//! The foundational library for the dagsel workspace: content identifiers,
//! blocks, the decoded node model, configuration objects, and the error
//! enums shared by every other crate.
//!
//! ## Architectural Role
//!
//! As the base crate, `dagsel-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. Keeping the canonical
//! definitions of `Cid`, `Block` and `Node` here prevents circular
//! dependencies between the codec, storage and selector crates.

/// Raw content-addressed blocks.
pub mod block;
/// Content identifiers (CIDv1, sha2-256, base16 multibase).
pub mod cid;
/// Configuration for the command-line front end.
pub mod config;
/// A unified set of all error types used across the workspace.
pub mod error;
/// The decoded, in-memory shape of a block's content.
pub mod node;

pub use block::Block;
pub use cid::{Cid, Multicodec};
pub use node::{Node, NodeKind};

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::TraversalError> = std::result::Result<T, E>;
