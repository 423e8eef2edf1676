// Path: crates/cli/src/commands/mod.rs

pub mod cat;
pub mod import;
pub mod select;
