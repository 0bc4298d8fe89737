//! # cpv-replay: Hash-Chain Replay Engine
//!
//! Replays the operation sequences of a Chainpoint proof and derives the two
//! values anchoring it to the chain: the OP_RETURN commitment and the TXID
//! of the transaction carrying it.
//!
//! ## Control Flow
//!
//! ```text
//! ProofModel ──extract──▶ [commitment ops, anchor ops]
//!     │
//!     └─ initial hash ──replay(commitment ops)──▶ terminal hash
//!                                                     │
//!                        replay(anchor ops) ◀─────────┘
//!                               │
//!                 first sha-256-x2 at k ──▶ TXID = reverse(T[k])
//!                                          OP_RETURN = T[k-3]
//! ```
//!
//! Each replay run owns its trace, its running value and its anchor latch.
//! The only value crossing from the first run to the second is the seed.
//! Runs are pure CPU work with no I/O, so independent callers may process
//! proofs in parallel without coordination.

pub mod engine;
pub mod explorer;
pub mod replayer;
pub mod resolver;
pub mod trace;

pub use engine::{compute_anchor, compute_full_trace, AnchorEngine, FullTrace, DEFAULT_CHAIN_TAG};
pub use explorer::{ExplorerTemplate, ExplorerTemplateError, TXID_PLACEHOLDER};
pub use replayer::{replay, ReplayOutcome};
pub use resolver::{AnchorInfo, AnchorResolution, AnchorResolver, OP_RETURN_OFFSET};
pub use trace::{ReplayTrace, StepLabel, TraceEntry};
