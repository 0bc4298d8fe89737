//! # Hash-Chain Replayer
//!
//! Executes one ordered operation sequence against a running [`HashValue`].
//!
//! | Operation              | New value                      | Label           |
//! |------------------------|--------------------------------|-----------------|
//! | `ConcatRight(x)`       | `cur ++ x`                     | `Concat (RHS)`  |
//! | `ConcatLeft(x)`        | `x ++ cur`                     | `Concat (LHS)`  |
//! | `Hash(sha-256)`        | `H(cur)`                       | `OP (sha-256)`  |
//! | `Hash(sha-256-x2)`     | `H(H(cur))`                    | `OP (sha-256-x2)` |
//! | `AnchorMarker` (match) | unchanged; entry shows reverse | `Merkle Root`   |
//! | `AnchorMarker` (other) | unchanged                      | `Anchor (type)` |
//!
//! The position of the first double hash is latched once per run and
//! returned with the trace. Later double hashes never move it.

use cpv_core::HashValue;
use cpv_proof::Operation;

use crate::trace::{ReplayTrace, StepLabel};

/// Result of one replay run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    /// One entry per processed operation.
    pub trace: ReplayTrace,
    /// The running value after the last operation. Anchor markers never
    /// change it, so this is always in internal byte order.
    pub terminal: HashValue,
    /// Position of the first `sha-256-x2` operation, if any.
    pub anchor_index: Option<usize>,
}

/// Replay `ops` starting from `seed`.
///
/// `chain_tag` selects which anchor descriptors produce a `Merkle Root`
/// entry.
pub fn replay(seed: HashValue, ops: &[Operation], chain_tag: &str) -> ReplayOutcome {
    let mut current = seed;
    let mut trace = ReplayTrace::with_capacity(ops.len());
    let mut anchor_index = None;

    for (position, op) in ops.iter().enumerate() {
        let (label, snapshot) = match op {
            Operation::ConcatRight(operand) => {
                current = current.concat_right(operand.bytes());
                (StepLabel::ConcatRight, current.clone())
            }
            Operation::ConcatLeft(operand) => {
                current = current.concat_left(operand.bytes());
                (StepLabel::ConcatLeft, current.clone())
            }
            Operation::Hash(algorithm) => {
                current = current.hashed(*algorithm);
                if algorithm.is_double() && anchor_index.is_none() {
                    anchor_index = Some(position);
                }
                (StepLabel::Hash(*algorithm), current.clone())
            }
            Operation::AnchorMarker(descriptors) => {
                if descriptors.iter().any(|d| d.matches(chain_tag)) {
                    (StepLabel::MerkleRoot, current.reversed())
                } else {
                    let kinds: Vec<&str> = descriptors.iter().map(|d| d.kind.as_str()).collect();
                    (StepLabel::Anchor(kinds.join(",")), current.clone())
                }
            }
        };
        tracing::trace!(position, label = %label, value = %snapshot, "replay step");
        trace.push(label, snapshot);
    }

    tracing::debug!(
        steps = trace.len(),
        anchor_index = ?anchor_index,
        terminal = %current,
        "replay finished"
    );

    ReplayOutcome {
        trace,
        terminal: current,
        anchor_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpv_core::HashAlgorithm;
    use cpv_proof::{AnchorDescriptor, Operand};

    fn seed(hex: &str) -> HashValue {
        HashValue::from_hex(hex).unwrap()
    }

    fn anchors(kinds: &[&str]) -> Operation {
        Operation::AnchorMarker(
            kinds
                .iter()
                .map(|k| AnchorDescriptor {
                    kind: (*k).to_string(),
                    anchor_id: None,
                    uris: Vec::new(),
                })
                .collect(),
        )
    }

    #[test]
    fn concat_then_hash_matches_known_vector() {
        let ops = vec![
            Operation::ConcatRight(Operand::new("bb")),
            Operation::Hash(HashAlgorithm::Sha256),
        ];
        let out = replay(seed("aa"), &ops, "btc");
        assert_eq!(out.trace.len(), 2);
        assert_eq!(out.trace.get(0).unwrap().value.hex(), "aabb");
        // SHA-256(0xaabb)
        assert_eq!(
            out.terminal.hex(),
            "d798d1fac6bd4bb1c11f50312760351013379a0ab6f0a8c0af8a506b96b2525a"
        );
        assert_eq!(out.anchor_index, None);
    }

    #[test]
    fn text_operands_are_concatenated_as_utf8() {
        let ops = vec![Operation::ConcatLeft(Operand::new("id:"))];
        let out = replay(seed("ff"), &ops, "btc");
        assert_eq!(out.terminal.as_bytes(), b"id:\xff");
        assert_eq!(out.trace.get(0).unwrap().label, StepLabel::ConcatLeft);
    }

    #[test]
    fn first_double_hash_is_latched() {
        let ops = vec![
            Operation::Hash(HashAlgorithm::Sha256),
            Operation::Hash(HashAlgorithm::Sha256x2),
            Operation::ConcatRight(Operand::new("00")),
            Operation::Hash(HashAlgorithm::Sha256x2),
        ];
        let out = replay(seed("aa"), &ops, "btc");
        assert_eq!(out.anchor_index, Some(1));
        assert_eq!(out.trace.len(), 4);
    }

    #[test]
    fn matching_anchor_records_reversed_merkle_root() {
        let ops = vec![Operation::Hash(HashAlgorithm::Sha256x2), anchors(&["btc"])];
        let out = replay(seed("aa"), &ops, "btc");
        let hashed = out.trace.get(0).unwrap().value.clone();
        let root = out.trace.get(1).unwrap();
        assert_eq!(root.label, StepLabel::MerkleRoot);
        assert_eq!(root.value, hashed.reversed());
        // The running value stays in internal byte order.
        assert_eq!(out.terminal, hashed);
    }

    #[test]
    fn other_anchor_types_keep_the_value() {
        let ops = vec![Operation::Hash(HashAlgorithm::Sha256), anchors(&["cal"])];
        let out = replay(seed("aa"), &ops, "btc");
        let entry = out.trace.get(1).unwrap();
        assert_eq!(entry.label, StepLabel::Anchor("cal".to_string()));
        assert_eq!(entry.value, out.terminal);
    }

    #[test]
    fn chain_tag_is_configurable() {
        let ops = vec![anchors(&["cal", "tbtc"])];
        let out = replay(seed("0102"), &ops, "tbtc");
        assert_eq!(out.trace.get(0).unwrap().label, StepLabel::MerkleRoot);
        assert_eq!(out.trace.get(0).unwrap().value.hex(), "0201");
    }

    #[test]
    fn earlier_snapshots_are_not_aliased() {
        let ops = vec![
            Operation::ConcatRight(Operand::new("bb")),
            Operation::ConcatRight(Operand::new("cc")),
        ];
        let out = replay(seed("aa"), &ops, "btc");
        assert_eq!(out.trace.get(0).unwrap().value.hex(), "aabb");
        assert_eq!(out.trace.get(1).unwrap().value.hex(), "aabbcc");
    }

    #[test]
    fn empty_sequence_returns_seed() {
        let out = replay(seed("aa"), &[], "btc");
        assert!(out.trace.is_empty());
        assert_eq!(out.terminal.hex(), "aa");
        assert_eq!(out.anchor_index, None);
    }
}
