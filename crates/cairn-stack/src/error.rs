use cairn_artifact::ArtifactError;
use cairn_builder::BuildError;
use cairn_outputs::OutputError;
use cairn_publish::PublishError;
use thiserror::Error;

/// Errors from a build-and-deploy run.
#[derive(Debug, Error)]
pub enum StackError {
  #[error(transparent)]
  Build(#[from] BuildError),

  /// A public output or placeholder refers to an output nobody registered.
  #[error(transparent)]
  Output(#[from] OutputError),

  #[error(transparent)]
  Artifact(#[from] ArtifactError),

  #[error(transparent)]
  Publish(#[from] PublishError),

  #[error("duplicate public output: {name}")]
  DuplicatePublicOutput { name: String },
}
