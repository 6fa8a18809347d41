//! Input binding types for node configuration.
//!
//! A node input is either wired to another node's output or carries a
//! literal value:
//!
//! ```json
//! {
//!   "endpoint": { "output": "Storage.bucketUrl" },
//!   "memory_mb": { "literal": 512 }
//! }
//! ```
//!
//! Output bindings are what create edges in the dependency graph: the
//! producer node is constructed strictly before the consumer.

use serde::{Deserialize, Serialize};

use crate::output_ref::OutputRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputBinding {
  /// Value of another node's output, resolved once that node is constructed.
  Output(OutputRef),
  /// Literal configuration passed through unchanged.
  Literal(serde_json::Value),
}

impl InputBinding {
  pub fn output(node: impl Into<String>, output: impl Into<String>) -> Self {
    Self::Output(OutputRef::new(node, output))
  }

  pub fn literal(value: impl Into<serde_json::Value>) -> Self {
    Self::Literal(value.into())
  }

  /// The referenced output, if this binding creates a dependency edge.
  pub fn output_ref(&self) -> Option<&OutputRef> {
    match self {
      Self::Output(r) => Some(r),
      Self::Literal(_) => None,
    }
  }
}
