//! Cairn Provider
//!
//! Resource kinds (object storage, functions, API gateways, bots, search
//! domains, pipelines) are opaque to the graph builder. Each kind is backed
//! by a [`ResourceProvider`] that turns a node's resolved inputs and
//! properties into the outputs it exposes. Providers are looked up by kind
//! in a [`ProviderRegistry`].
//!
//! The built-in [`TemplateProvider`] (kind `template`) computes outputs by
//! rendering minijinja templates against the node's inputs, which is enough
//! to describe a topology without talking to a real cloud backend.

mod error;
mod provider;
mod registry;
mod template;

pub use error::ProviderError;
pub use provider::{ConstructRequest, Outputs, ResourceProvider};
pub use registry::ProviderRegistry;
pub use template::TemplateProvider;
