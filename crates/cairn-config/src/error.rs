use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a stack definition.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// An output reference was not of the form `Node.output`.
  #[error("invalid output reference '{value}': expected 'Node.output'")]
  InvalidOutputRef { value: String },

  /// A node name is empty or contains a reserved character.
  #[error("invalid node name '{name}': {reason}")]
  InvalidNodeName { name: String, reason: String },

  /// A node declared an empty kind.
  #[error("node '{node}' has an empty kind")]
  EmptyKind { node: String },

  /// Two public outputs share the same name.
  #[error("duplicate public output: {name}")]
  DuplicatePublicOutput { name: String },

  /// A placeholder token in the artifact section is empty.
  #[error("artifact placeholder tokens must not be empty")]
  EmptyPlaceholder,

  /// Failed to read the definition file.
  #[error("failed to read stack file {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The definition is not valid JSON or does not match the schema.
  #[error("failed to parse stack definition: {0}")]
  Parse(#[from] serde_json::Error),
}
