//! # Trace Subcommand
//!
//! Prints the labeled commitment and anchor traces with the derived anchor
//! values. The step that yields the TXID and the step holding the OP_RETURN
//! value are marked in text output.

use std::fmt::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use cpv_replay::{AnchorEngine, FullTrace, ReplayTrace, OP_RETURN_OFFSET};

use crate::config::CliConfig;

/// Arguments for the `cpv trace` subcommand.
#[derive(Args, Debug)]
pub struct TraceArgs {
    /// Path to the Chainpoint v3 proof (JSON).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Emit the full trace as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the trace subcommand.
pub fn run_trace(args: &TraceArgs, config: &CliConfig) -> Result<u8> {
    let proof = crate::load_proof(&args.file)?;
    let full = AnchorEngine::new(config.chain_tag.as_str()).compute_full_trace(&proof)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&full)?);
    } else {
        print!("{}", format_trace(&full));
    }
    Ok(0)
}

/// Human-readable dump of `full`.
pub fn format_trace(full: &FullTrace) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "seed: {}", full.seed);

    let _ = writeln!(
        out,
        "\ncommitment branch ({}):",
        full.commitment_label.as_deref().unwrap_or("unlabeled")
    );
    write_entries(&mut out, &full.commitment, |_| "");

    let k = full.anchor_index;
    let op_return_at = k.checked_sub(OP_RETURN_OFFSET);
    let _ = writeln!(
        out,
        "\nanchor branch ({}):",
        full.anchor_label.as_deref().unwrap_or("unlabeled")
    );
    write_entries(&mut out, &full.anchor, |i| {
        if i == k {
            "  <- TXID"
        } else if Some(i) == op_return_at {
            "  <- OP_RETURN"
        } else {
            ""
        }
    });

    let _ = writeln!(
        out,
        "\nOP_RETURN: {}\nTXID:      {}",
        full.anchor_info.op_return.as_deref().unwrap_or("(none)"),
        full.anchor_info.txid
    );
    out
}

fn write_entries(out: &mut String, trace: &ReplayTrace, marker: impl Fn(usize) -> &'static str) {
    let width = trace
        .iter()
        .map(|e| e.label.to_string().len())
        .max()
        .unwrap_or(0);
    for (i, entry) in trace.iter().enumerate() {
        let _ = writeln!(
            out,
            "  [{i:>3}] {:<width$}  {}{}",
            entry.label.to_string(),
            entry.value,
            marker(i)
        );
    }
}
