//! # Hash Values and Algorithms
//!
//! [`HashValue`] is the running value of a hash-chain replay: an owned byte
//! buffer together with its lowercase hex digest. The two are computed
//! together at construction and never diverge.
//!
//! [`HashAlgorithm`] names the hash operations a proof may declare. Both
//! are built on SHA-256; the double variant applies it twice, which is how
//! the chain derives transaction identifiers and block Merkle nodes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::codec::{decode_hex, encode_hex, CodecError};
use crate::error::ProofError;

/// The hash operations a proof can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// `sha-256`: a single SHA-256 application.
    Sha256,
    /// `sha-256-x2`: SHA-256 applied twice.
    Sha256x2,
}

impl HashAlgorithm {
    /// The identifier used in proof documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha-256",
            Self::Sha256x2 => "sha-256-x2",
        }
    }

    /// True for the double-hash variant.
    pub fn is_double(&self) -> bool {
        matches!(self, Self::Sha256x2)
    }

    /// Apply the algorithm to `data`.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        let once = Sha256::digest(data);
        match self {
            Self::Sha256 => once.to_vec(),
            Self::Sha256x2 => Sha256::digest(once.as_slice()).to_vec(),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ProofError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha-256" => Ok(Self::Sha256),
            "sha-256-x2" => Ok(Self::Sha256x2),
            other => Err(ProofError::UnsupportedOperation(other.to_string())),
        }
    }
}

/// An owned byte buffer plus its hex digest.
///
/// Every transformation returns a new value; the receiver is left intact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashValue {
    bytes: Vec<u8>,
    hex: String,
}

impl HashValue {
    /// Wrap raw bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let hex = encode_hex(&bytes);
        Self { bytes, hex }
    }

    /// Decode a hex digest. The stored digest is normalized to lowercase.
    pub fn from_hex(s: &str) -> Result<Self, CodecError> {
        decode_hex(s).map(Self::from_bytes)
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The lowercase hex digest.
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// Consume the value, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Number of bytes in the buffer.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `self ++ operand`.
    pub fn concat_right(&self, operand: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(self.bytes.len() + operand.len());
        bytes.extend_from_slice(&self.bytes);
        bytes.extend_from_slice(operand);
        Self::from_bytes(bytes)
    }

    /// `operand ++ self`.
    pub fn concat_left(&self, operand: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(self.bytes.len() + operand.len());
        bytes.extend_from_slice(operand);
        bytes.extend_from_slice(&self.bytes);
        Self::from_bytes(bytes)
    }

    /// Hash the buffer with `algorithm`.
    pub fn hashed(&self, algorithm: HashAlgorithm) -> Self {
        Self::from_bytes(algorithm.digest(&self.bytes))
    }

    /// The same bytes in reverse order.
    pub fn reversed(&self) -> Self {
        let mut bytes = self.bytes.clone();
        bytes.reverse();
        Self::from_bytes(bytes)
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

impl Serialize for HashValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex)
    }
}

impl<'de> Deserialize<'de> for HashValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
