use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactDef;
use crate::error::ConfigError;
use crate::node::NodeDef;
use crate::output_ref::OutputRef;

/// An output exposed once the stack has been built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicOutputDef {
  pub name: String,
  pub value: OutputRef,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

impl PublicOutputDef {
  pub fn new(name: impl Into<String>, value: OutputRef) -> Self {
    Self {
      name: name.into(),
      value,
      description: None,
    }
  }
}

/// A complete stack definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackDef {
  pub name: String,
  pub nodes: Vec<NodeDef>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub artifact: Option<ArtifactDef>,
  #[serde(default)]
  pub outputs: Vec<PublicOutputDef>,
}

impl StackDef {
  /// Parse and validate a definition from a JSON string.
  pub fn from_json(content: &str) -> Result<Self, ConfigError> {
    let def: StackDef = serde_json::from_str(content)?;
    def.validate()?;
    Ok(def)
  }

  /// Load a definition from a file.
  ///
  /// Relative artifact directories are resolved against the file's directory.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let mut def = Self::from_json(&content)?;
    if let (Some(artifact), Some(base)) = (def.artifact.as_mut(), path.parent()) {
      artifact.resolve_paths(base);
    }
    Ok(def)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    for node in &self.nodes {
      node.validate()?;
    }

    let mut seen = HashSet::new();
    for output in &self.outputs {
      if !seen.insert(output.name.as_str()) {
        return Err(ConfigError::DuplicatePublicOutput {
          name: output.name.clone(),
        });
      }
    }

    if let Some(artifact) = &self.artifact
      && artifact.placeholders.keys().any(|token| token.is_empty())
    {
      return Err(ConfigError::EmptyPlaceholder);
    }

    Ok(())
  }
}
