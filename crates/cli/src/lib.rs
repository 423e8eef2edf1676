// Path: crates/cli/src/lib.rs
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

//! # dagsel CLI Library
//!
//! The subcommands of the `dagsel` binary. Each command writes its output to
//! a caller-supplied writer so it can be driven from tests as well as from
//! `main`. Diagnostics go through `tracing` to stderr.

/// Subcommand arguments and their implementations.
pub mod commands;
/// Configuration and store resolution shared by the commands.
pub mod util;
