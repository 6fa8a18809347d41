//! Cairn Builder
//!
//! The [`GraphBuilder`] takes a set of node definitions and constructs every
//! node in dependency order:
//!
//! ```text
//! NodeDefs ──► Graph::new ──► waves ──► resolve inputs ──► provider.construct
//!                 │                            ▲                  │
//!                 │ duplicate / dangling /     │                  ▼
//!                 │ cycle → fail before any    └──────── OutputRegistry.register
//!                 ▼ construction
//! ```
//!
//! Nodes in the same wave have no dependency on each other and are
//! constructed concurrently. A node's inputs are resolved from the
//! [`OutputRegistry`](cairn_outputs::OutputRegistry) only after every
//! producer it binds to has been constructed and has registered its outputs.

mod builder;
mod error;
mod input;
mod node;

pub use builder::GraphBuilder;
pub use error::BuildError;
pub use input::resolve_inputs;
pub use node::{BuildResult, ResourceNode};
