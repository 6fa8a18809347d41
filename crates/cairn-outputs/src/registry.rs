use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::{PoisonError, RwLock};

use cairn_config::OutputRef;
use tracing::debug;

use crate::error::OutputError;

/// Resolved output value (endpoint URLs, identifiers, ...).
pub type OutputValue = String;

/// Write-once store of node outputs.
///
/// The map sits behind a lock so the registry can be shared by reference
/// while several nodes of one construction wave finish; writes are
/// serialized by the lock.
#[derive(Debug, Default)]
pub struct OutputRegistry {
  entries: RwLock<BTreeMap<OutputRef, OutputValue>>,
}

impl OutputRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register an output. Fails if the key already exists.
  pub fn register(
    &self,
    node: &str,
    output: &str,
    value: impl Into<OutputValue>,
  ) -> Result<(), OutputError> {
    let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

    match entries.entry(OutputRef::new(node, output)) {
      Entry::Occupied(_) => Err(OutputError::DuplicateOutput {
        node: node.to_string(),
        output: output.to_string(),
      }),
      Entry::Vacant(slot) => {
        slot.insert(value.into());
        debug!(node = %node, output = %output, "output_registered");
        Ok(())
      }
    }
  }

  /// Resolve a registered output.
  pub fn resolve(&self, node: &str, output: &str) -> Result<OutputValue, OutputError> {
    self.resolve_ref(&OutputRef::new(node, output))
  }

  pub fn resolve_ref(&self, key: &OutputRef) -> Result<OutputValue, OutputError> {
    let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
    entries
      .get(key)
      .cloned()
      .ok_or_else(|| OutputError::MissingOutput {
        node: key.node.clone(),
        output: key.output.clone(),
      })
  }

  /// All outputs registered by one node, keyed by output name.
  pub fn outputs_of(&self, node: &str) -> BTreeMap<String, OutputValue> {
    let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
    entries
      .iter()
      .filter(|(key, _)| key.node == node)
      .map(|(key, value)| (key.output.clone(), value.clone()))
      .collect()
  }

  /// Copy of every entry, ordered by node then output name.
  pub fn snapshot(&self) -> BTreeMap<OutputRef, OutputValue> {
    self
      .entries
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  pub fn len(&self) -> usize {
    self
      .entries
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
