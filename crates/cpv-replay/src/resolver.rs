//! # Anchor Resolution
//!
//! Replays the anchor sequence, seeded with the commitment sequence's
//! terminal value, and reads the two anchor values at fixed positions of
//! the resulting trace `T`:
//!
//! - `k` is the position of the first `sha-256-x2` step: the step that
//!   double-hashes the serialized transaction into its identifier.
//! - `TXID = reverse_byte_order(T[k])`, the identifier in display order.
//! - `OP_RETURN = T[k - 3]` when `k >= 3`, otherwise absent. The commitment
//!   sits [`OP_RETURN_OFFSET`] steps before the transaction hash in every
//!   v3 anchor branch (prefix concat, suffix concat, then the double hash).

use serde::{Deserialize, Serialize};

use cpv_core::{reverse_byte_order, HashValue, ProofError};
use cpv_proof::Operation;

use crate::replayer::replay;
use crate::trace::ReplayTrace;

/// Distance from the anchoring double hash back to the commitment value.
/// Fixed by the proof format.
pub const OP_RETURN_OFFSET: usize = 3;

/// The values anchoring a proof to the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorInfo {
    /// Hex of the commitment embedded in the transaction, when derivable.
    pub op_return: Option<String>,
    /// Transaction identifier in display byte order.
    pub txid: String,
}

/// An [`AnchorInfo`] together with the anchor trace it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorResolution {
    /// Trace of the anchor sequence replay.
    pub trace: ReplayTrace,
    /// Position of the first double hash in `trace`.
    pub anchor_index: usize,
    /// The derived values.
    pub info: AnchorInfo,
}

/// Derives [`AnchorInfo`] from an anchor sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorResolver {
    chain_tag: String,
}

impl AnchorResolver {
    /// Resolver for anchors of type `chain_tag`.
    pub fn new(chain_tag: impl Into<String>) -> Self {
        Self {
            chain_tag: chain_tag.into(),
        }
    }

    /// The configured chain tag.
    pub fn chain_tag(&self) -> &str {
        &self.chain_tag
    }

    /// Resolve from the hex digest of the commitment sequence's terminal
    /// value.
    pub fn resolve(
        &self,
        outer_terminal_hash: &str,
        inner_ops: &[Operation],
    ) -> Result<AnchorInfo, ProofError> {
        let seed = HashValue::from_hex(outer_terminal_hash)?;
        self.resolve_seeded(seed, inner_ops).map(|r| r.info)
    }

    /// Resolve from an already-decoded seed, keeping the anchor trace.
    pub fn resolve_seeded(
        &self,
        seed: HashValue,
        inner_ops: &[Operation],
    ) -> Result<AnchorResolution, ProofError> {
        let outcome = replay(seed, inner_ops, &self.chain_tag);

        let k = outcome.anchor_index.ok_or_else(|| {
            ProofError::AnchorExtractionFailed(
                "anchor sequence contains no sha-256-x2 step".to_string(),
            )
        })?;
        let tx_entry = outcome.trace.get(k).ok_or_else(|| {
            ProofError::AnchorExtractionFailed(format!(
                "anchor index {k} is outside a trace of {} entries",
                outcome.trace.len()
            ))
        })?;
        let txid = reverse_byte_order(tx_entry.value.hex())?;

        let op_return = k
            .checked_sub(OP_RETURN_OFFSET)
            .and_then(|i| outcome.trace.get(i))
            .map(|entry| entry.value.hex().to_string());
        if op_return.is_none() {
            tracing::debug!(anchor_index = k, "no OP_RETURN position before the anchor step");
        }

        Ok(AnchorResolution {
            trace: outcome.trace,
            anchor_index: k,
            info: AnchorInfo { op_return, txid },
        })
    }
}
