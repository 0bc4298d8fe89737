//! # Top-Level Orchestration
//!
//! `parse → extract → replay(commitment) → resolve(anchor)`.
//!
//! [`AnchorEngine::compute_anchor`] returns only the anchor values.
//! [`AnchorEngine::compute_full_trace`] also returns both traces for the
//! rendering boundary. Either fails as a whole: no partial trace is ever
//! returned as if complete.

use serde::Serialize;

use cpv_core::{HashValue, ProofError};
use cpv_proof::{extract_sequences, ProofModel};

use crate::replayer::replay;
use crate::resolver::{AnchorInfo, AnchorResolver};
use crate::trace::ReplayTrace;

/// Anchor type whose marker triggers the Merkle-root display flip.
pub const DEFAULT_CHAIN_TAG: &str = "btc";

/// Everything the rendering boundary needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullTrace {
    /// The proof's initial hash.
    pub seed: HashValue,
    /// Label of the commitment branch.
    pub commitment_label: Option<String>,
    /// Trace of the commitment sequence.
    pub commitment: ReplayTrace,
    /// Label of the anchor branch.
    pub anchor_label: Option<String>,
    /// Trace of the anchor sequence.
    pub anchor: ReplayTrace,
    /// Position in `anchor` of the step that yields the TXID.
    pub anchor_index: usize,
    /// The derived anchor values.
    pub anchor_info: AnchorInfo,
}

/// Drives both replays for one configured chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorEngine {
    chain_tag: String,
}

impl Default for AnchorEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CHAIN_TAG)
    }
}

impl AnchorEngine {
    /// Engine for anchors of type `chain_tag`.
    pub fn new(chain_tag: impl Into<String>) -> Self {
        Self {
            chain_tag: chain_tag.into(),
        }
    }

    /// The configured chain tag.
    pub fn chain_tag(&self) -> &str {
        &self.chain_tag
    }

    /// Derive OP_RETURN and TXID for `proof`.
    pub fn compute_anchor(&self, proof: &ProofModel) -> Result<AnchorInfo, ProofError> {
        self.compute_full_trace(proof).map(|t| t.anchor_info)
    }

    /// Replay both sequences of `proof` and derive its anchor values.
    pub fn compute_full_trace(&self, proof: &ProofModel) -> Result<FullTrace, ProofError> {
        let sequences = extract_sequences(proof)?;
        let seed = proof.initial_hash().clone();

        let outer = replay(seed.clone(), sequences.commitment, &self.chain_tag);
        let resolver = AnchorResolver::new(self.chain_tag.as_str());
        let resolution = resolver.resolve_seeded(outer.terminal, sequences.anchor)?;

        tracing::info!(
            txid = %resolution.info.txid,
            op_return = resolution.info.op_return.as_deref().unwrap_or("-"),
            "anchor resolved"
        );

        Ok(FullTrace {
            seed,
            commitment_label: sequences.commitment_label.map(str::to_string),
            commitment: outer.trace,
            anchor_label: sequences.anchor_label.map(str::to_string),
            anchor: resolution.trace,
            anchor_index: resolution.anchor_index,
            anchor_info: resolution.info,
        })
    }
}

/// [`AnchorEngine::compute_anchor`] with the default chain tag.
pub fn compute_anchor(proof: &ProofModel) -> Result<AnchorInfo, ProofError> {
    AnchorEngine::default().compute_anchor(proof)
}

/// [`AnchorEngine::compute_full_trace`] with the default chain tag.
pub fn compute_full_trace(proof: &ProofModel) -> Result<FullTrace, ProofError> {
    AnchorEngine::default().compute_full_trace(proof)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn proof(branches: serde_json::Value) -> ProofModel {
        ProofModel::from_value(json!({
            "@context": "https://w3id.org/chainpoint/v3",
            "hash": "aa",
            "branches": branches,
        }))
        .unwrap()
    }

    #[test]
    fn missing_branches_propagate() {
        let p = proof(json!([]));
        assert_eq!(compute_anchor(&p).unwrap_err(), ProofError::MissingBranches);
    }

    #[test]
    fn missing_anchor_branch_fails_extraction() {
        let p = proof(json!([{ "ops": [{"op": "sha-256"}, {"anchors": [{"type": "cal"}]}] }]));
        assert!(matches!(
            compute_full_trace(&p).unwrap_err(),
            ProofError::AnchorExtractionFailed(_)
        ));
    }

    #[test]
    fn anchor_replay_is_seeded_with_commitment_terminal() {
        let p = proof(json!([{
            "ops": [{"r": "bb"}, {"op": "sha-256"}, {"anchors": [{"type": "cal"}]}],
            "branches": [{ "ops": [{"op": "sha-256-x2"}] }]
        }]));
        let full = compute_full_trace(&p).unwrap();
        let terminal = full.commitment.last().unwrap().value.clone();
        let expected = terminal.hashed(cpv_core::HashAlgorithm::Sha256x2);
        assert_eq!(full.anchor.get(0).unwrap().value, expected);
        assert_eq!(full.anchor_index, 0);
        assert_eq!(full.anchor_info.op_return, None);
    }

    #[test]
    fn engine_uses_its_chain_tag() {
        let p = proof(json!([{
            "ops": [{"op": "sha-256"}],
            "branches": [{ "ops": [{"op": "sha-256-x2"}, {"anchors": [{"type": "tbtc"}]}] }]
        }]));
        let testnet = AnchorEngine::new("tbtc").compute_full_trace(&p).unwrap();
        assert_eq!(
            testnet.anchor.last().unwrap().label,
            crate::trace::StepLabel::MerkleRoot
        );
        let mainnet = AnchorEngine::default().compute_full_trace(&p).unwrap();
        assert_eq!(
            mainnet.anchor.last().unwrap().label,
            crate::trace::StepLabel::Anchor("tbtc".to_string())
        );
        // The derived values do not depend on the display flip.
        assert_eq!(testnet.anchor_info, mainnet.anchor_info);
    }
}
