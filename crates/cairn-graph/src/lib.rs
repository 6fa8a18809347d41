//! Cairn Graph
//!
//! This crate turns a set of [`NodeDef`](cairn_config::NodeDef)s into a
//! validated dependency graph. An edge runs from a producer to every node
//! that binds one of its outputs. The graph is guaranteed to be:
//! - free of duplicate node names
//! - free of bindings to nodes that do not exist
//! - acyclic
//!
//! Construction order is computed with Kahn's algorithm, grouped into waves
//! of nodes whose producers all belong to earlier waves.

mod error;
mod graph;

pub use error::GraphError;
pub use graph::Graph;
