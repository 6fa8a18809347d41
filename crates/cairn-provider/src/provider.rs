use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::ProviderError;

/// Outputs produced by a constructed resource, keyed by output name.
pub type Outputs = BTreeMap<String, String>;

/// Everything a provider needs to construct one node.
#[derive(Debug, Clone)]
pub struct ConstructRequest {
  pub node: String,
  pub kind: String,
  /// Inputs with every output binding already resolved.
  pub inputs: BTreeMap<String, serde_json::Value>,
  pub properties: serde_json::Value,
}

/// Backend for one resource kind.
///
/// The builder calls `construct` exactly once per node, after every producer
/// the node binds to has been constructed. Implementations must not retry
/// internally; a failure aborts the whole build.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
  /// The node kind this provider handles, e.g. "template".
  fn kind(&self) -> &str;

  /// Construct the resource and return its outputs.
  async fn construct(&self, request: &ConstructRequest) -> Result<Outputs, ProviderError>;
}
