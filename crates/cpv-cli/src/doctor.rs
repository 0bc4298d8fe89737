//! # Doctor Subcommand
//!
//! Preflight checks before rendering: prints the resolved configuration and
//! runs the configured Graphviz program with `-V`. `anchor` and `trace` never
//! need the renderer, so a failed check only matters for `render`.

use std::fmt::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use cpv_graph::GraphvizRenderer;

use crate::config::CliConfig;

/// Arguments for the `cpv doctor` subcommand.
#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Graphviz executable to check instead of the configured one.
    #[arg(long, value_name = "PROGRAM")]
    pub dot_program: Option<PathBuf>,
}

/// Execute the doctor subcommand.
pub fn run_doctor(args: &DoctorArgs, config: &CliConfig) -> Result<u8> {
    let program = args
        .dot_program
        .clone()
        .unwrap_or_else(|| config.dot_program.clone());
    let (code, report) = doctor_report(config, &GraphvizRenderer::new(program));
    print!("{report}");
    Ok(code)
}

/// Build the report and the exit code: 0 when the renderer answers `-V`,
/// 1 otherwise.
pub fn doctor_report(config: &CliConfig, renderer: &GraphvizRenderer) -> (u8, String) {
    let mut out = String::new();
    let _ = writeln!(out, "chain tag:  {}", config.chain_tag);
    let _ = writeln!(
        out,
        "explorer:   {}",
        config
            .explorer
            .as_ref()
            .map(|e| e.template().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    let _ = writeln!(out, "format:     {}", config.format);

    match renderer.check_available() {
        Ok(banner) => {
            let _ = writeln!(out, "OK: renderer {} ({banner})", renderer.program().display());
            (0, out)
        }
        Err(e) => {
            tracing::warn!(error = %e, "renderer check failed");
            let _ = writeln!(out, "FAIL: {e}");
            let _ = writeln!(out, "  `cpv render --format dot` still works without Graphviz");
            (1, out)
        }
    }
}
