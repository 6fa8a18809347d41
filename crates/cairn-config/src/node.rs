use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::input::InputBinding;
use crate::output_ref::OutputRef;

/// Declaration of a single resource node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
  /// Unique name within the stack, e.g. "Storage".
  pub name: String,
  /// Resource kind, used to select the provider that constructs the node.
  pub kind: String,
  #[serde(default)]
  pub inputs: BTreeMap<String, InputBinding>,
  /// Provider-specific configuration.
  #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
  pub properties: serde_json::Value,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

impl NodeDef {
  pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      kind: kind.into(),
      inputs: BTreeMap::new(),
      properties: serde_json::Value::Null,
      description: None,
    }
  }

  pub fn with_input(mut self, key: impl Into<String>, binding: InputBinding) -> Self {
    self.inputs.insert(key.into(), binding);
    self
  }

  pub fn with_properties(mut self, properties: serde_json::Value) -> Self {
    self.properties = properties;
    self
  }

  /// Output bindings of this node as `(input name, referenced output)`.
  pub fn dependencies(&self) -> impl Iterator<Item = (&str, &OutputRef)> {
    self
      .inputs
      .iter()
      .filter_map(|(key, binding)| binding.output_ref().map(|r| (key.as_str(), r)))
  }

  /// Check the node's own fields. Cross-node checks (duplicates, dangling
  /// references, cycles) belong to the graph.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.name.trim().is_empty() {
      return Err(ConfigError::InvalidNodeName {
        name: self.name.clone(),
        reason: "name must not be empty".to_string(),
      });
    }
    if self.name.contains('.') {
      return Err(ConfigError::InvalidNodeName {
        name: self.name.clone(),
        reason: "name must not contain '.'".to_string(),
      });
    }
    if self.kind.trim().is_empty() {
      return Err(ConfigError::EmptyKind {
        node: self.name.clone(),
      });
    }
    Ok(())
  }
}
