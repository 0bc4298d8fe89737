//! # Operation Sequence Extraction
//!
//! Flattens the branch tree of a v3 proof into exactly two ordered
//! sequences:
//!
//! 1. the **commitment** sequence: every operation of the first top-level
//!    branch, including its trailing anchor marker;
//! 2. the **anchor** sequence: every operation of the first branch nested
//!    one level below it, including its own anchor marker. Empty when no
//!    nested branch exists.
//!
//! The v3 schema caps nesting at these two levels. A nested branch that
//! nests further is a `SchemaViolation`; no deeper semantics are guessed.

use cpv_core::ProofError;

use crate::model::ProofModel;
use crate::operation::Operation;

/// The two operation sequences of a proof, borrowed from its model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpSequences<'a> {
    /// Label of the top-level branch.
    pub commitment_label: Option<&'a str>,
    /// Top-level operations.
    pub commitment: &'a [Operation],
    /// Label of the nested branch.
    pub anchor_label: Option<&'a str>,
    /// Nested operations.
    pub anchor: &'a [Operation],
}

/// Extract the commitment and anchor sequences from `proof`.
pub fn extract_sequences(proof: &ProofModel) -> Result<OpSequences<'_>, ProofError> {
    let branches = proof.branches();
    let outer = branches.first().ok_or(ProofError::MissingBranches)?;
    if branches.len() > 1 {
        tracing::warn!(
            ignored = branches.len() - 1,
            "proof has several top-level branches; only the first is replayed"
        );
    }

    let (anchor_label, anchor) = match outer.branches.first() {
        Some(inner) => {
            if outer.branches.len() > 1 {
                tracing::warn!(
                    ignored = outer.branches.len() - 1,
                    "branch has several nested branches; only the first is used"
                );
            }
            if !inner.branches.is_empty() {
                return Err(ProofError::SchemaViolation(format!(
                    "branch {:?} nests a third level of branches",
                    inner.label.as_deref().unwrap_or("<unlabelled>")
                )));
            }
            (inner.label.as_deref(), inner.ops.as_slice())
        }
        None => (None, &[][..]),
    };

    tracing::debug!(
        commitment_ops = outer.ops.len(),
        anchor_ops = anchor.len(),
        "extracted operation sequences"
    );

    Ok(OpSequences {
        commitment_label: outer.label.as_deref(),
        commitment: &outer.ops,
        anchor_label,
        anchor,
    })
}
