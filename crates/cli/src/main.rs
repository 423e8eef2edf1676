// Path: crates/cli/src/main.rs
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

//! # dagsel
//!
//! Evaluates selectors over content-addressed DAGs stored on disk.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dagsel_cli::commands::{cat, import, select};
use dagsel_cli::util;
use dagsel_types::config::LogFormat;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[clap(
    name = "dagsel",
    version,
    about = "Selector traversal over content-addressed DAGs.",
    long_about = "dagsel walks a DAG of content-addressed blocks with a selector program and prints every block it visits, in order."
)]
struct Cli {
    /// TOML configuration file.
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format (json or pretty).
    #[clap(long, global = true)]
    log_format: Option<LogFormat>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a selector document and print the visited blocks.
    Select(select::SelectArgs),

    /// Import a JSON description of a DAG into the store.
    Import(import::ImportArgs),

    /// Print a stored block as DAG-JSON.
    Cat(cat::CatArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = util::load_config(cli.config.as_deref())?;
    dagsel_telemetry::init_tracing(cli.log_format.unwrap_or(config.log_format))?;

    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Commands::Select(args) => select::run(args, &config, &mut stdout).await,
        Commands::Import(args) => import::run(args, &config, &mut stdout)
            .await
            .map(|()| ExitCode::SUCCESS),
        Commands::Cat(args) => cat::run(args, &config, &mut stdout)
            .await
            .map(|()| ExitCode::SUCCESS),
    }
}
