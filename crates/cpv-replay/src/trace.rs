//! # Replay Traces
//!
//! A [`ReplayTrace`] is the ordered, append-only record of one replay run:
//! one `(label, value)` entry per processed operation. Entries are
//! snapshots; later steps never alter them.

use std::fmt;

use serde::{Serialize, Serializer};

use cpv_core::{HashAlgorithm, HashValue};

/// What produced a trace entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepLabel {
    /// Operand appended on the right.
    ConcatRight,
    /// Operand prepended on the left.
    ConcatLeft,
    /// Hash application.
    Hash(HashAlgorithm),
    /// Anchor marker of the configured chain; the entry holds the
    /// byte-reversed (display order) digest.
    MerkleRoot,
    /// Anchor marker of some other type; the entry holds the value unchanged.
    Anchor(String),
}

impl fmt::Display for StepLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConcatRight => f.write_str("Concat (RHS)"),
            Self::ConcatLeft => f.write_str("Concat (LHS)"),
            Self::Hash(alg) => write!(f, "OP ({alg})"),
            Self::MerkleRoot => f.write_str("Merkle Root"),
            Self::Anchor(kind) => write!(f, "Anchor ({kind})"),
        }
    }
}

impl Serialize for StepLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One snapshot in a trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    /// The step that produced this value.
    pub label: StepLabel,
    /// The value after the step.
    pub value: HashValue,
}

/// Ordered entries of one replay run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReplayTrace {
    entries: Vec<TraceEntry>,
}

impl ReplayTrace {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, label: StepLabel, value: HashValue) {
        self.entries.push(TraceEntry { label, value });
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no operation was processed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&TraceEntry> {
        self.entries.get(index)
    }

    /// The final entry, if any.
    pub fn last(&self) -> Option<&TraceEntry> {
        self.entries.last()
    }

    /// All entries in processing order.
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Iterate entries in processing order.
    pub fn iter(&self) -> std::slice::Iter<'_, TraceEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ReplayTrace {
    type Item = &'a TraceEntry;
    type IntoIter = std::slice::Iter<'a, TraceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
