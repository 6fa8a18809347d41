//! Error types for graph construction.

use cairn_config::ConfigError;
use cairn_graph::GraphError;
use cairn_outputs::OutputError;
use cairn_provider::ProviderError;
use thiserror::Error;

/// Errors that can occur while building a graph.
#[derive(Debug, Error)]
pub enum BuildError {
  /// A node definition is invalid on its own (bad name, empty kind).
  #[error(transparent)]
  Config(#[from] ConfigError),

  /// The node definitions do not form a valid graph, or a binding could not
  /// be resolved.
  #[error(transparent)]
  Graph(#[from] GraphError),

  /// Registering an output failed.
  #[error(transparent)]
  Output(#[from] OutputError),

  /// No provider is registered for the node's kind.
  #[error("no provider for kind '{kind}' (node '{node}')")]
  UnknownKind { node: String, kind: String },

  /// The provider failed to construct the node.
  #[error("failed to construct node '{node}': {source}")]
  Construction {
    node: String,
    #[source]
    source: ProviderError,
  },
}
