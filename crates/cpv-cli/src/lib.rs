//! # cpv-cli: Chainpoint Proof Replay CLI
//!
//! Provides the `cpv` command-line interface over the replay engine.
//!
//! ## Subcommands
//!
//! - `cpv anchor`: Derive OP_RETURN and TXID for a proof.
//! - `cpv trace`: Print both labeled replay traces.
//! - `cpv render`: Render the hash chain through Graphviz.
//! - `cpv doctor`: Show the resolved configuration and check that Graphviz runs.
//!
//! ```bash
//! cpv anchor proof.json
//! cpv trace proof.json --json
//! cpv --explorer blockstream render proof.json --output proof.svg
//! ```

pub mod anchor;
pub mod config;
pub mod doctor;
pub mod render;
pub mod trace;

use std::path::Path;

use anyhow::{Context, Result};

use cpv_proof::ProofModel;

pub use config::{CliConfig, ConfigError};

/// Read and parse a proof document from `path`.
pub fn load_proof(path: &Path) -> Result<ProofModel> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read proof: {}", path.display()))?;
    let proof = ProofModel::from_slice(&bytes)
        .with_context(|| format!("invalid proof document: {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        context = proof.context(),
        branches = proof.branches().len(),
        "loaded proof"
    );
    Ok(proof)
}
