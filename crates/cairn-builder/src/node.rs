//! Constructed nodes and build results.

use std::collections::BTreeMap;

use cairn_config::InputBinding;

/// A constructed resource node. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceNode {
  pub name: String,
  pub kind: String,
  pub description: Option<String>,
  /// Bindings as declared.
  pub bindings: BTreeMap<String, InputBinding>,
  /// Inputs after resolution, as handed to the provider.
  pub inputs: BTreeMap<String, serde_json::Value>,
  /// Outputs the provider produced.
  pub outputs: BTreeMap<String, String>,
}

impl ResourceNode {
  pub fn output(&self, name: &str) -> Option<&str> {
    self.outputs.get(name).map(String::as_str)
  }
}

/// Result of a complete graph build.
#[derive(Debug, Clone)]
pub struct BuildResult {
  /// Unique build ID, also attached to every log event of the build.
  pub build_id: String,
  /// Node names in the order they were constructed.
  pub order: Vec<String>,
  /// Constructed nodes keyed by name.
  pub nodes: BTreeMap<String, ResourceNode>,
}

impl BuildResult {
  pub fn node(&self, name: &str) -> Option<&ResourceNode> {
    self.nodes.get(name)
  }
}
