//! # cpv-core: Foundational Types for the Chainpoint Proof Verifier
//!
//! This crate is the leaf of the workspace DAG. It defines the byte-level
//! primitives every other crate builds on: the hex/UTF-8 codec, the
//! [`HashValue`] buffer that keeps raw bytes and their hex digest in sync,
//! the supported [`HashAlgorithm`]s, and the [`ProofError`] taxonomy.
//!
//! ## Key Design Principles
//!
//! 1. **Bytes and digest travel together.** A `HashValue` can only be built
//!    from bytes or from validated hex, so its hex form is never stale.
//!
//! 2. **Values are replaced, not mutated.** Every transformation on a
//!    `HashValue` returns a fresh value. Snapshots captured earlier in a
//!    replay remain valid.
//!
//! 3. **One error taxonomy.** Parsing, extraction, replay and anchor
//!    resolution all report through `ProofError`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cpv-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod codec;
pub mod error;
pub mod hash;

pub use codec::{
    decode_hex, encode_hex, is_hex_string, operand_bytes, reverse_byte_order, CodecError,
    OperandEncoding,
};
pub use error::ProofError;
pub use hash::{HashAlgorithm, HashValue};
