use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while rendering an artifact tree.
#[derive(Debug, Error)]
pub enum ArtifactError {
  /// The source directory does not exist or is not a directory.
  #[error("artifact source not found: {}", path.display())]
  SourceNotFound { path: PathBuf },

  /// Reading or writing a file failed.
  #[error("io error at {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// A placeholder token cannot be used for substitution.
  #[error("invalid placeholder token '{token}': {reason}")]
  InvalidPlaceholder { token: String, reason: String },

  /// A templated-file pattern is not a valid glob.
  #[error("invalid templated file pattern '{pattern}': {source}")]
  InvalidPattern {
    pattern: String,
    #[source]
    source: globset::Error,
  },

  /// The destination lies inside the source tree.
  #[error(
    "artifact destination {} is inside source {}",
    dest_dir.display(),
    source_dir.display()
  )]
  DestinationInsideSource {
    source_dir: PathBuf,
    dest_dir: PathBuf,
  },
}

impl ArtifactError {
  pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
    Self::Io {
      path: path.to_path_buf(),
      source,
    }
  }
}
