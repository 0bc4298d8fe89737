//! # cpv-proof: Chainpoint Proof Document Model
//!
//! Decodes a Chainpoint v3 proof document into a read-only [`ProofModel`]
//! and flattens its branch structure into the two operation sequences the
//! replay engine consumes.
//!
//! ## Document Shape
//!
//! ```json
//! {
//!   "@context": "https://w3id.org/chainpoint/v3",
//!   "type": "Chainpoint",
//!   "hash": "<hex>",
//!   "branches": [{
//!     "label": "cal_anchor_branch",
//!     "ops": [{"l": "..."}, {"op": "sha-256"}, {"anchors": [{"type": "cal"}]}],
//!     "branches": [{
//!       "label": "btc_anchor_branch",
//!       "ops": [{"r": "..."}, {"op": "sha-256-x2"}, {"anchors": [{"type": "btc"}]}]
//!     }]
//!   }]
//! }
//! ```
//!
//! Each `ops` entry is a single-key mapping decoded once into an
//! [`Operation`]; consumers never inspect the keys again.

pub mod extract;
pub mod model;
pub mod operation;

pub use extract::{extract_sequences, OpSequences};
pub use model::{parse_context_version, Branch, ProofMetadata, ProofModel, SUPPORTED_VERSION};
pub use operation::{AnchorDescriptor, OpRecord, Operand, Operation};
