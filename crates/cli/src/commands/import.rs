// Path: crates/cli/src/commands/import.rs

use crate::util;
use anyhow::{Context, Result};
use clap::Parser;
use dagsel_storage::import_dag;
use dagsel_types::config::{CliConfig, CodecName};
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// A JSON object of named DAG-JSON nodes.
    pub file: PathBuf,

    /// Directory of the block store.
    #[clap(long, env = "DAGSEL_STORE")]
    pub store: Option<PathBuf>,

    /// Codec to encode the blocks with [default: from config, else dag-bincode].
    #[clap(long)]
    pub codec: Option<CodecName>,
}

/// Imports a DAG description and prints `name cid` for every node.
pub async fn run(args: ImportArgs, config: &CliConfig, out: &mut dyn Write) -> Result<()> {
    let raw = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read DAG description {}", args.file.display()))?;
    let description: Value =
        serde_json::from_slice(&raw).context("DAG description is not valid JSON")?;

    let codec = args.codec.unwrap_or(config.import_codec);
    let store = util::open_store(args.store, config).await?;
    let cids = import_dag(
        store.as_ref(),
        &dagsel_codec::registry(),
        codec.multicodec(),
        &description,
    )
    .await
    .context("Import failed")?;

    tracing::info!(target: "cli", nodes = cids.len(), %codec, "imported DAG");
    for (name, cid) in &cids {
        writeln!(out, "{name} {cid}")?;
    }
    Ok(())
}
