use std::path::PathBuf;

use cairn_artifact::ArtifactError;
use thiserror::Error;

/// Errors raised while publishing a deployment.
#[derive(Debug, Error)]
pub enum PublishError {
  /// The deployment target rejected or failed the deployment.
  #[error("external deployment failure at '{target}': {source}")]
  ExternalDeploymentFailure {
    target: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  /// The rendered artifact tree could not be read.
  #[error(transparent)]
  Artifact(#[from] ArtifactError),

  /// The manifest could not be serialized.
  #[error("failed to serialize manifest: {0}")]
  Manifest(#[from] serde_json::Error),

  /// The artifact directory and the publish target share files.
  #[error(
    "artifact directory {} overlaps publish target {}",
    artifact_dir.display(),
    target.display()
  )]
  OverlappingTarget { artifact_dir: PathBuf, target: PathBuf },

  /// An artifact file would be overwritten by publisher bookkeeping.
  #[error("artifact file '{key}' uses a key reserved by the publisher")]
  ReservedKey { key: String },
}

impl PublishError {
  pub fn external(
    target: impl Into<String>,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
  ) -> Self {
    Self::ExternalDeploymentFailure {
      target: target.into(),
      source: source.into(),
    }
  }
}
