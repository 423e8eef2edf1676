// Path: crates/selector/src/lib.rs
#![forbid(unsafe_code)]
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

//! # dagsel Selector
//!
//! Declarative traversal over content-addressed DAGs.
//!
//! A [`RootedSelector`] names a root block and a program of [`Selector`]
//! instructions. [`SelectorEngine::select`] turns it into a [`Traversal`]
//! that walks the graph depth first, fetching and decoding blocks on demand,
//! and yields every block it visits in order, starting with the root. Blocks
//! that were fetched but then failed to match are yielded too, so a verifier
//! replaying the same document sees the same sequence.
//!
//! ```no_run
//! # async fn run(engine: dagsel_selector::SelectorEngine, doc: serde_json::Value) -> anyhow::Result<()> {
//! let mut traversal = engine.select_json(&doc)?;
//! while let Some(block) = traversal.next_block().await? {
//!     println!("{}", block.cid());
//! }
//! if let Some(resolution) = traversal.resolution() {
//!     println!("{resolution}");
//! }
//! # Ok(())
//! # }
//! ```

/// The root selector document.
pub mod document;
/// The depth-first, block-emitting traversal engine.
pub mod engine;
/// Cursors over selector programs.
pub mod program;
/// Instruction variants and their match contracts.
pub mod selector;
mod stream;

pub use document::RootedSelector;
pub use engine::{Resolution, Selection, SelectorEngine, Traversal};
pub use program::Program;
pub use selector::{Match, Selector, Step, Visit};
