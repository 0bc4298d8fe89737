//! # Error Types
//!
//! The error taxonomy shared by proof parsing, sequence extraction, replay
//! and anchor resolution. Every failure is raised at the point of detection
//! and propagates unrecovered; nothing here is transient, so there are no
//! retries. A failure anywhere prevents any trace or anchor from being
//! produced.

use thiserror::Error;

use crate::codec::CodecError;

/// Errors produced by the proof verification core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// Bad hex, bad encoding, or a document that does not decode.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A required document field is absent.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// The top-level branch list is empty.
    #[error("proof contains no branches")]
    MissingBranches,

    /// The proof's context does not declare the supported version.
    #[error("unsupported proof version: {context:?} (only v{supported} is supported)")]
    UnsupportedVersion {
        /// The `@context` value as found in the document.
        context: String,
        /// The only version this engine implements.
        supported: u32,
    },

    /// An `op` value that names no known hash algorithm.
    #[error("unsupported operation: {0:?}")]
    UnsupportedOperation(String),

    /// The document's branch structure exceeds what the schema allows.
    #[error("schema violation: {0}")]
    SchemaViolation(String),

    /// No double-hash step was found, or a required offset falls outside
    /// the anchor trace.
    #[error("anchor extraction failed: {0}")]
    AnchorExtractionFailed(String),
}

impl From<CodecError> for ProofError {
    fn from(e: CodecError) -> Self {
        Self::MalformedInput(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_errors_become_malformed_input() {
        let err: ProofError = CodecError::OddLength { len: 3 }.into();
        assert_eq!(
            err,
            ProofError::MalformedInput("hex string has odd length 3".to_string())
        );
    }

    #[test]
    fn unsupported_version_display_names_context() {
        let err = ProofError::UnsupportedVersion {
            context: "https://w3id.org/chainpoint/v2".to_string(),
            supported: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("chainpoint/v2"));
        assert!(msg.contains("v3"));
    }
}
