use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::output_ref::OutputRef;

/// Frontend artifact produced after the graph is built.
///
/// Every file under `source_dir` is mirrored into `dest_dir`. Files whose
/// name matches one of the `templated` glob patterns get each placeholder
/// token replaced by the value of the output it is bound to:
///
/// ```json
/// {
///   "source_dir": "frontend",
///   "dest_dir": ".frontend-build",
///   "templated": ["app.js"],
///   "placeholders": {
///     "YOUR_API_ENDPOINT": "Api.apiEndpoint",
///     "YOUR_API_KEY": "Api.apiKeyId"
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDef {
  pub source_dir: PathBuf,
  pub dest_dir: PathBuf,
  #[serde(default)]
  pub templated: Vec<String>,
  #[serde(default)]
  pub placeholders: BTreeMap<String, OutputRef>,
}

impl ArtifactDef {
  /// Make relative directories relative to `base` (the stack file's directory).
  pub(crate) fn resolve_paths(&mut self, base: &Path) {
    if self.source_dir.is_relative() {
      self.source_dir = base.join(&self.source_dir);
    }
    if self.dest_dir.is_relative() {
      self.dest_dir = base.join(&self.dest_dir);
    }
  }
}
