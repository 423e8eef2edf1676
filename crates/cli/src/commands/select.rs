// Path: crates/cli/src/commands/select.rs

use crate::util;
use anyhow::{Context, Result};
use clap::Parser;
use dagsel_selector::{RootedSelector, SelectorEngine};
use dagsel_telemetry::Timer;
use dagsel_types::config::CliConfig;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Exit code of a traversal that ended with instructions left over.
pub const EXIT_UNRESOLVED: u8 = 2;

#[derive(Parser, Debug)]
pub struct SelectArgs {
    /// The selector document (JSON).
    pub file: PathBuf,

    /// Directory of the block store.
    #[clap(long, env = "DAGSEL_STORE")]
    pub store: Option<PathBuf>,
}

/// Prints the CID of every visited block, one per line, in visit order.
///
/// Blocks already printed stay printed when the traversal fails later.
pub async fn run(args: SelectArgs, config: &CliConfig, out: &mut dyn Write) -> Result<ExitCode> {
    let raw = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read selector document {}", args.file.display()))?;
    let document = RootedSelector::from_slice(&raw).context("Invalid selector document")?;

    let store = util::open_store(args.store, config).await?;
    let engine = SelectorEngine::new(store, Arc::new(dagsel_codec::registry()));
    let _timer = Timer::new("select");

    let mut traversal = engine.select(&document);
    while let Some(block) = traversal.next_block().await.context("Traversal failed")? {
        writeln!(out, "{}", block.cid())?;
    }

    match traversal.resolution() {
        Some(resolution) if !resolution.is_resolved() => {
            writeln!(
                out,
                "The selector wasn't fully resolved: {}",
                resolution.remaining_json()
            )?;
            Ok(ExitCode::from(EXIT_UNRESOLVED))
        }
        _ => Ok(ExitCode::SUCCESS),
    }
}
