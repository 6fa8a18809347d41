//! Input resolution against the output registry.

use std::collections::BTreeMap;

use cairn_config::{InputBinding, NodeDef};
use cairn_graph::GraphError;
use cairn_outputs::OutputRegistry;

/// Resolve every input binding of a node.
///
/// Literal bindings pass through unchanged; output bindings are looked up in
/// the registry and become JSON strings. A producer that never registered
/// the referenced output fails with [`GraphError::UnresolvedBinding`].
pub fn resolve_inputs(
  node: &NodeDef,
  registry: &OutputRegistry,
) -> Result<BTreeMap<String, serde_json::Value>, GraphError> {
  let mut resolved = BTreeMap::new();

  for (key, binding) in &node.inputs {
    let value = match binding {
      InputBinding::Literal(value) => value.clone(),
      InputBinding::Output(output_ref) => registry
        .resolve_ref(output_ref)
        .map(serde_json::Value::String)
        .map_err(|_| GraphError::UnresolvedBinding {
          node: node.name.clone(),
          input: key.clone(),
          producer: output_ref.node.clone(),
          output: output_ref.output.clone(),
        })?,
    };
    resolved.insert(key.clone(), value);
  }

  Ok(resolved)
}
