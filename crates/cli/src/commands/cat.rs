// Path: crates/cli/src/commands/cat.rs

use crate::util;
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use dagsel_api::storage::BlockStore;
use dagsel_codec::json::to_json;
use dagsel_types::config::CliConfig;
use dagsel_types::Cid;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct CatArgs {
    /// The block to print.
    pub cid: Cid,

    /// Directory of the block store.
    #[clap(long, env = "DAGSEL_STORE")]
    pub store: Option<PathBuf>,
}

/// Prints a block's decoded node as DAG-JSON.
pub async fn run(args: CatArgs, config: &CliConfig, out: &mut dyn Write) -> Result<()> {
    let store = util::open_store(args.store, config).await?;
    let block = store
        .get(&args.cid)
        .await?
        .ok_or_else(|| anyhow!("Block {} not found", args.cid))?;
    let node = dagsel_codec::registry()
        .decode(&block)
        .with_context(|| format!("Failed to decode block {}", args.cid))?;
    writeln!(out, "{}", serde_json::to_string_pretty(&to_json(&node)?)?)?;
    Ok(())
}
