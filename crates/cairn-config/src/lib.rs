//! Cairn Config
//!
//! This crate contains the serializable stack definition types for cairn.
//! A stack is a set of named resource nodes whose inputs are wired to other
//! nodes' outputs, an optional frontend artifact that gets templated with
//! resolved outputs, and the list of outputs exposed once the build succeeds.
//!
//! Definitions are loaded from JSON files (via CLI with `cairn build stack.json`).
//! The builder takes these types, validates the dependency graph, and
//! constructs the resources in dependency order.
//!
//! # Example
//!
//! ```json
//! {
//!   "name": "photos",
//!   "nodes": [
//!     { "name": "Storage", "kind": "template",
//!       "properties": { "outputs": { "bucketUrl": "https://x.example" } } },
//!     { "name": "Api", "kind": "template",
//!       "inputs": { "endpoint": { "output": "Storage.bucketUrl" } },
//!       "properties": { "outputs": { "apiUrl": "{{ endpoint }}/api" } } }
//!   ],
//!   "outputs": [ { "name": "ApiEndpoint", "value": "Api.apiUrl" } ]
//! }
//! ```

mod artifact;
mod error;
mod input;
mod node;
mod output_ref;
mod stack;

pub use artifact::ArtifactDef;
pub use error::ConfigError;
pub use input::InputBinding;
pub use node::NodeDef;
pub use output_ref::OutputRef;
pub use stack::{PublicOutputDef, StackDef};
