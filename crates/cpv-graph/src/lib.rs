//! # cpv-graph: Rendering Boundary
//!
//! Turns a [`cpv_replay::FullTrace`] into a node/edge [`Graph`] and hands
//! it to an external layout program.
//!
//! ## Crate Policy
//!
//! - Projection and DOT serialization are pure. Only [`GraphvizRenderer`]
//!   touches the filesystem or spawns processes.
//! - The temporary DOT artifact is scoped to a single render call and is
//!   removed on every exit path, including spawn failure and non-zero exit.
//! - Renderer errors never originate in the replay core; they carry the
//!   external tool's diagnostic output.

pub mod dot;
pub mod graph;
pub mod render;

pub use dot::to_dot;
pub use graph::{Edge, Graph, GraphProjector, Node, NodeKind};
pub use render::{GraphvizRenderer, OutputFormat, RenderError, Renderer, DEFAULT_DOT_PROGRAM};
