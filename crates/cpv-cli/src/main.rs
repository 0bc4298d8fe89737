//! # cpv CLI entry point
//!
//! Parses command-line arguments, resolves configuration and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cpv_cli::anchor::{run_anchor, AnchorArgs};
use cpv_cli::config::CliConfig;
use cpv_cli::doctor::{run_doctor, DoctorArgs};
use cpv_cli::render::{run_render, RenderArgs};
use cpv_cli::trace::{run_trace, TraceArgs};
use cpv_replay::ExplorerTemplate;

/// Chainpoint v3 proof replay.
///
/// Replays the hash chain of a proof, derives the OP_RETURN value and
/// transaction identifier it anchors to, and renders the chain as a graph.
#[derive(Parser, Debug)]
#[command(name = "cpv", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Anchor type treated as the chain anchor (e.g. btc, tbtc).
    #[arg(long, global = true, value_name = "TAG", value_parser = clap::builder::NonEmptyStringValueParser::new())]
    chain_tag: Option<String>,

    /// Explorer for TXID links: blockstream, blockchain, blockcypher, or a
    /// URL template containing {txid}.
    #[arg(long, global = true, value_name = "PRESET|TEMPLATE")]
    explorer: Option<ExplorerTemplate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Derive the OP_RETURN value and TXID a proof anchors to.
    Anchor(AnchorArgs),

    /// Print the labeled replay traces of a proof.
    Trace(TraceArgs),

    /// Render the proof's hash chain through Graphviz.
    Render(RenderArgs),

    /// Show the resolved configuration and check that Graphviz runs.
    Doctor(DoctorArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG, when set, takes precedence over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match CliConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(2);
        }
    };
    if let Some(tag) = cli.chain_tag {
        config.chain_tag = tag;
    }
    if let Some(explorer) = cli.explorer {
        config.explorer = Some(explorer);
    }

    tracing::debug!(?config, "resolved configuration");

    let result = match cli.command {
        Commands::Anchor(args) => run_anchor(&args, &config),
        Commands::Trace(args) => run_trace(&args, &config),
        Commands::Render(args) => run_render(&args, &config),
        Commands::Doctor(args) => run_doctor(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
