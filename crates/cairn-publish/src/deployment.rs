use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

/// An output exposed by the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedOutput {
  pub name: String,
  pub value: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

/// A constructed node as recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSummary {
  pub name: String,
  pub kind: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub outputs: BTreeMap<String, String>,
}

/// Everything a publisher needs to ship one build.
///
/// Serializes to the manifest written next to the artifact; the local
/// artifact directory is not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deployment {
  pub stack: String,
  pub build_id: String,
  #[serde(skip)]
  pub artifact_dir: Option<PathBuf>,
  pub outputs: Vec<PublishedOutput>,
  pub resources: Vec<ResourceSummary>,
}

impl Deployment {
  /// Public outputs keyed by name.
  pub fn output_map(&self) -> BTreeMap<String, String> {
    self
      .outputs
      .iter()
      .map(|o| (o.name.clone(), o.value.clone()))
      .collect()
  }
}

/// Acknowledgement returned by a publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishReceipt {
  /// Number of artifact files shipped.
  pub files: usize,
  /// Where the deployment ended up (directory, bucket URL, ...).
  pub location: String,
}
