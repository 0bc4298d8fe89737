//! # Operations
//!
//! [`OpRecord`] mirrors the wire form of an `ops` entry: a mapping with
//! exactly one of the keys `r`, `l`, `op` or `anchors`. Serde's externally
//! tagged enum representation enforces the single-key rule.
//!
//! [`Operation`] is the validated form. Conversion resolves the operand
//! encoding of concatenations and rejects unknown hash names with
//! `UnsupportedOperation`.

use std::fmt;

use serde::{Deserialize, Serialize};

use cpv_core::{operand_bytes, HashAlgorithm, OperandEncoding, ProofError};

/// Wire form of one `ops` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpRecord {
    /// `{"r": operand}`
    #[serde(rename = "r")]
    Right(String),
    /// `{"l": operand}`
    #[serde(rename = "l")]
    Left(String),
    /// `{"op": algorithm}`
    #[serde(rename = "op")]
    Op(String),
    /// `{"anchors": [...]}`
    #[serde(rename = "anchors")]
    Anchors(Vec<AnchorDescriptor>),
}

/// One anchor declared at the end of a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorDescriptor {
    /// Anchor type, e.g. `cal` or `btc`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Anchor identifier (a calendar block height or a chain block height).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_id: Option<String>,
    /// Lookup URIs for the anchored value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uris: Vec<String>,
}

impl AnchorDescriptor {
    /// True when this descriptor's type equals `chain_tag`.
    pub fn matches(&self, chain_tag: &str) -> bool {
        self.kind == chain_tag
    }
}

/// A concatenation operand with its decoded bytes.
///
/// The original text is kept for display; the bytes are what gets
/// concatenated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    text: String,
    encoding: OperandEncoding,
    bytes: Vec<u8>,
}

impl Operand {
    /// Decode `text` per the operand encoding rule.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let (encoding, bytes) = operand_bytes(&text);
        Self {
            text,
            encoding,
            bytes,
        }
    }

    /// The operand as written in the document.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// How the bytes were obtained.
    pub fn encoding(&self) -> OperandEncoding {
        self.encoding
    }

    /// The bytes to concatenate.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// A validated step of a hash chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Append the operand to the right of the current value.
    ConcatRight(Operand),
    /// Prepend the operand to the left of the current value.
    ConcatLeft(Operand),
    /// Replace the current value with its hash.
    Hash(HashAlgorithm),
    /// Terminal anchor declaration.
    AnchorMarker(Vec<AnchorDescriptor>),
}

impl Operation {
    /// True for `Hash(Sha256x2)`.
    pub fn is_double_hash(&self) -> bool {
        matches!(self, Self::Hash(alg) if alg.is_double())
    }
}

impl TryFrom<OpRecord> for Operation {
    type Error = ProofError;

    fn try_from(record: OpRecord) -> Result<Self, Self::Error> {
        Ok(match record {
            OpRecord::Right(s) => Self::ConcatRight(Operand::new(s)),
            OpRecord::Left(s) => Self::ConcatLeft(Operand::new(s)),
            OpRecord::Op(name) => Self::Hash(name.parse()?),
            OpRecord::Anchors(descriptors) => Self::AnchorMarker(descriptors),
        })
    }
}

impl From<&Operation> for OpRecord {
    fn from(op: &Operation) -> Self {
        match op {
            Operation::ConcatRight(o) => Self::Right(o.text.clone()),
            Operation::ConcatLeft(o) => Self::Left(o.text.clone()),
            Operation::Hash(alg) => Self::Op(alg.as_str().to_string()),
            Operation::AnchorMarker(d) => Self::Anchors(d.clone()),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConcatRight(o) => write!(f, "r:{}", o.text),
            Self::ConcatLeft(o) => write!(f, "l:{}", o.text),
            Self::Hash(alg) => write!(f, "op:{alg}"),
            Self::AnchorMarker(d) => {
                let kinds: Vec<&str> = d.iter().map(|a| a.kind.as_str()).collect();
                write!(f, "anchors:[{}]", kinds.join(","))
            }
        }
    }
}
