//! # Anchor Subcommand
//!
//! Derives the OP_RETURN and TXID values a proof anchors to.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use cpv_replay::{AnchorEngine, AnchorInfo, ExplorerTemplate};

use crate::config::CliConfig;

/// Arguments for the `cpv anchor` subcommand.
#[derive(Args, Debug)]
pub struct AnchorArgs {
    /// Path to the Chainpoint v3 proof (JSON).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Emit a JSON object instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct AnchorReport<'a> {
    op_return: Option<&'a str>,
    txid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    explorer_link: Option<String>,
}

/// Execute the anchor subcommand.
pub fn run_anchor(args: &AnchorArgs, config: &CliConfig) -> Result<u8> {
    let proof = crate::load_proof(&args.file)?;
    let info = AnchorEngine::new(config.chain_tag.as_str()).compute_anchor(&proof)?;
    print!("{}", format_anchor(&info, config.explorer.as_ref(), args.json)?);
    Ok(0)
}

/// Render `info` for stdout.
pub fn format_anchor(
    info: &AnchorInfo,
    explorer: Option<&ExplorerTemplate>,
    json: bool,
) -> Result<String> {
    let link = explorer.map(|e| e.link(&info.txid));
    if json {
        let report = AnchorReport {
            op_return: info.op_return.as_deref(),
            txid: &info.txid,
            explorer_link: link,
        };
        return Ok(format!("{}\n", serde_json::to_string_pretty(&report)?));
    }

    let mut out = format!(
        "OP_RETURN: {}\nTXID:      {}\n",
        info.op_return.as_deref().unwrap_or("(none)"),
        info.txid
    );
    if let Some(link) = link {
        out.push_str(&format!("Explorer:  {link}\n"));
    }
    Ok(out)
}
