//! # Proof Model
//!
//! Parses a proof document into a read-only [`ProofModel`].
//!
//! ## Validation Order
//!
//! 1. `@context` must be present and declare version 3. This runs against
//!    the untyped JSON, so documents of other versions are rejected with
//!    `UnsupportedVersion` whatever their remaining shape.
//! 2. `hash` must be present and be non-empty valid hex.
//! 3. The branch tree is decoded and every operation validated.
//!
//! An empty branch list is accepted here and rejected by the extractor.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use cpv_core::{HashValue, ProofError};

use crate::operation::{OpRecord, Operation};

/// The only proof version whose operation semantics are implemented.
pub const SUPPORTED_VERSION: u32 = 3;

/// Extract the integer version from a versioned context URI.
///
/// `https://w3id.org/chainpoint/v3` yields `Some(3)`. The version is the
/// number following a leading `v` in the last path segment.
pub fn parse_context_version(context: &str) -> Option<u32> {
    let segment = context.trim().trim_end_matches('/').rsplit('/').next()?;
    segment
        .strip_prefix('v')
        .or_else(|| segment.strip_prefix('V'))?
        .parse()
        .ok()
}

/// Optional descriptive fields of a proof. None of them affect replay.
///
/// A field that is present but malformed is dropped with a warning rather
/// than rejecting the proof.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofMetadata {
    /// Document type tag, `Chainpoint` for v3.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    /// Identifier the node assigned to the submitted hash.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub hash_id_node: Option<Uuid>,
    /// When the node accepted the hash.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub hash_submitted_node_at: Option<DateTime<Utc>>,
    /// Identifier the core assigned to the aggregated hash.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub hash_id_core: Option<Uuid>,
    /// When the core accepted the hash.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub hash_submitted_core_at: Option<DateTime<Utc>>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Some(raw) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match T::deserialize(&raw) {
        Ok(v) => Ok(Some(v)),
        Err(e) => {
            tracing::warn!(value = %raw, error = %e, "ignoring malformed proof metadata");
            Ok(None)
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawProof {
    #[serde(flatten)]
    metadata: ProofMetadata,
    #[serde(default)]
    branches: Vec<RawBranch>,
}

#[derive(Debug, Deserialize)]
struct RawBranch {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    ops: Vec<OpRecord>,
    #[serde(default)]
    branches: Vec<RawBranch>,
}

/// One branch of the proof tree with validated operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Branch label, e.g. `cal_anchor_branch`.
    pub label: Option<String>,
    /// Operations in declaration order.
    pub ops: Vec<Operation>,
    /// Nested branches.
    pub branches: Vec<Branch>,
}

impl TryFrom<RawBranch> for Branch {
    type Error = ProofError;

    fn try_from(raw: RawBranch) -> Result<Self, Self::Error> {
        let ops = raw
            .ops
            .into_iter()
            .map(Operation::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let branches = raw
            .branches
            .into_iter()
            .map(Branch::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            label: raw.label,
            ops,
            branches,
        })
    }
}

/// A decoded, validated proof document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofModel {
    context: String,
    version: u32,
    initial_hash: HashValue,
    metadata: ProofMetadata,
    branches: Vec<Branch>,
}

impl ProofModel {
    /// Parse a proof from JSON text.
    pub fn from_json_str(s: &str) -> Result<Self, ProofError> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| ProofError::MalformedInput(e.to_string()))?;
        Self::from_value(value)
    }

    /// Parse a proof from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ProofError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| ProofError::MalformedInput(e.to_string()))?;
        Self::from_value(value)
    }

    /// Parse a proof from an already-decoded JSON value.
    pub fn from_value(mut value: Value) -> Result<Self, ProofError> {
        let obj = value
            .as_object_mut()
            .ok_or_else(|| ProofError::MalformedInput("proof must be a JSON object".to_string()))?;

        let context = match obj.remove("@context") {
            Some(Value::String(s)) => s,
            Some(other) => {
                return Err(ProofError::MalformedInput(format!(
                    "`@context` must be a string, got {other}"
                )))
            }
            None => return Err(ProofError::MissingField("@context")),
        };
        let version = match parse_context_version(&context) {
            Some(v) if v == SUPPORTED_VERSION => v,
            _ => {
                return Err(ProofError::UnsupportedVersion {
                    context,
                    supported: SUPPORTED_VERSION,
                })
            }
        };

        let initial_hash = match obj.remove("hash") {
            Some(Value::String(s)) if s.is_empty() => {
                return Err(ProofError::MalformedInput("`hash` is empty".to_string()))
            }
            Some(Value::String(s)) => HashValue::from_hex(&s)?,
            Some(other) => {
                return Err(ProofError::MalformedInput(format!(
                    "`hash` must be a hex string, got {other}"
                )))
            }
            None => return Err(ProofError::MissingField("hash")),
        };

        let raw: RawProof =
            serde_json::from_value(value).map_err(|e| ProofError::MalformedInput(e.to_string()))?;
        let branches = raw
            .branches
            .into_iter()
            .map(Branch::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            context,
            version,
            initial_hash,
            metadata: raw.metadata,
            branches,
        })
    }

    /// The `@context` value as found in the document.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Declared proof version (always [`SUPPORTED_VERSION`]).
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The hash the proof starts from.
    pub fn initial_hash(&self) -> &HashValue {
        &self.initial_hash
    }

    /// Descriptive metadata.
    pub fn metadata(&self) -> &ProofMetadata {
        &self.metadata
    }

    /// Top-level branches.
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpv_core::HashAlgorithm;
    use serde_json::json;

    fn minimal(context: &str) -> Value {
        json!({
            "@context": context,
            "type": "Chainpoint",
            "hash": "aa",
            "branches": [{
                "label": "cal_anchor_branch",
                "ops": [{"r": "bb"}, {"op": "sha-256"}],
            }]
        })
    }

    #[test]
    fn parses_context_versions() {
        assert_eq!(parse_context_version("https://w3id.org/chainpoint/v3"), Some(3));
        assert_eq!(parse_context_version("https://w3id.org/chainpoint/v3/"), Some(3));
        assert_eq!(parse_context_version("https://w3id.org/chainpoint/v2"), Some(2));
        assert_eq!(parse_context_version("https://w3id.org/chainpoint"), None);
        assert_eq!(parse_context_version(""), None);
    }

    #[test]
    fn parses_minimal_v3_proof() {
        let proof = ProofModel::from_value(minimal("https://w3id.org/chainpoint/v3")).unwrap();
        assert_eq!(proof.version(), 3);
        assert_eq!(proof.initial_hash().hex(), "aa");
        assert_eq!(proof.metadata().kind.as_deref(), Some("Chainpoint"));
        assert_eq!(proof.branches().len(), 1);
        let branch = &proof.branches()[0];
        assert_eq!(branch.label.as_deref(), Some("cal_anchor_branch"));
        assert_eq!(branch.ops[1], Operation::Hash(HashAlgorithm::Sha256));
        assert!(branch.branches.is_empty());
    }

    #[test]
    fn version_two_is_rejected() {
        let err = ProofModel::from_value(minimal("https://w3id.org/chainpoint/v2")).unwrap_err();
        assert!(matches!(err, ProofError::UnsupportedVersion { supported: 3, .. }));
    }

    #[test]
    fn version_guard_runs_before_structure_checks() {
        // A v2 receipt has no `hash` and a foreign layout.
        let v2 = json!({
            "@context": "https://w3id.org/chainpoint/v2",
            "type": "ChainpointSHA256v2",
            "targetHash": "aa",
            "proof": [{"left": "bb"}],
        });
        assert!(matches!(
            ProofModel::from_value(v2).unwrap_err(),
            ProofError::UnsupportedVersion { .. }
        ));
    }

    #[test]
    fn missing_context_and_hash() {
        let mut doc = minimal("https://w3id.org/chainpoint/v3");
        doc.as_object_mut().unwrap().remove("@context");
        assert_eq!(
            ProofModel::from_value(doc).unwrap_err(),
            ProofError::MissingField("@context")
        );

        let mut doc = minimal("https://w3id.org/chainpoint/v3");
        doc.as_object_mut().unwrap().remove("hash");
        assert_eq!(
            ProofModel::from_value(doc).unwrap_err(),
            ProofError::MissingField("hash")
        );
    }

    #[test]
    fn non_hex_initial_hash_is_malformed() {
        let mut doc = minimal("https://w3id.org/chainpoint/v3");
        doc["hash"] = json!("not-hex");
        assert!(matches!(
            ProofModel::from_value(doc).unwrap_err(),
            ProofError::MalformedInput(_)
        ));
    }

    #[test]
    fn unknown_op_is_rejected_at_parse() {
        let mut doc = minimal("https://w3id.org/chainpoint/v3");
        doc["branches"][0]["ops"] = json!([{"op": "keccak-256"}]);
        assert_eq!(
            ProofModel::from_value(doc).unwrap_err(),
            ProofError::UnsupportedOperation("keccak-256".to_string())
        );
    }

    #[test]
    fn metadata_is_typed() {
        let mut doc = minimal("https://w3id.org/chainpoint/v3");
        doc["hash_id_node"] = json!("3ddb3860-1d7e-11e8-b2c5-01e9b3a1f7a3");
        doc["hash_submitted_node_at"] = json!("2018-03-01T19:06:18Z");
        let proof = ProofModel::from_value(doc).unwrap();
        let meta = proof.metadata();
        assert!(meta.hash_id_node.is_some());
        assert_eq!(
            meta.hash_submitted_node_at.map(|t| t.timestamp()),
            Some(1_519_931_178)
        );
        assert!(meta.hash_id_core.is_none());
    }

    #[test]
    fn malformed_metadata_is_dropped_not_fatal() {
        let mut doc = minimal("https://w3id.org/chainpoint/v3");
        doc["type"] = json!(3);
        doc["hash_id_node"] = json!("node-1234");
        doc["hash_submitted_node_at"] = json!("2018-03-01 16:02:23");
        doc["hash_id_core"] = json!("3ddb3860-1d7e-11e8-b2c5-01e9b3a1f7a3");
        let proof = ProofModel::from_value(doc).unwrap();
        let meta = proof.metadata();
        assert_eq!(meta.kind, None);
        assert_eq!(meta.hash_id_node, None);
        assert_eq!(meta.hash_submitted_node_at, None);
        assert!(meta.hash_id_core.is_some());
        assert_eq!(proof.branches()[0].ops.len(), 2);
    }

    #[test]
    fn null_metadata_is_absent() {
        let mut doc = minimal("https://w3id.org/chainpoint/v3");
        doc["hash_id_core"] = Value::Null;
        let proof = ProofModel::from_value(doc).unwrap();
        assert_eq!(proof.metadata().hash_id_core, None);
    }

    #[test]
    fn empty_initial_hash_is_malformed() {
        let mut doc = minimal("https://w3id.org/chainpoint/v3");
        doc["hash"] = json!("");
        assert!(matches!(
            ProofModel::from_value(doc).unwrap_err(),
            ProofError::MalformedInput(_)
        ));
    }

    #[test]
    fn non_object_document_is_malformed() {
        assert!(matches!(
            ProofModel::from_json_str("[1,2,3]").unwrap_err(),
            ProofError::MalformedInput(_)
        ));
        assert!(matches!(
            ProofModel::from_json_str("{not json").unwrap_err(),
            ProofError::MalformedInput(_)
        ));
    }

    #[test]
    fn empty_branch_list_parses() {
        let mut doc = minimal("https://w3id.org/chainpoint/v3");
        doc["branches"] = json!([]);
        let proof = ProofModel::from_value(doc).unwrap();
        assert!(proof.branches().is_empty());
    }
}
