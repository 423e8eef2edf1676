// Path: crates/storage/src/lib.rs
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

//! Block store backends for dagsel.
//!
//! The selector engine consumes stores only through
//! [`dagsel_api::storage::BlockStore`]. This crate provides an in-memory
//! store for tests and embedding, a one-file-per-block filesystem store for
//! the command-line front end, and [`import_dag`] for building stores from
//! JSON descriptions of a DAG.

pub mod fs;
pub mod import;
pub mod memory;

pub use fs::FsBlockStore;
pub use import::{import_dag, ImportError};
pub use memory::MemoryBlockStore;
