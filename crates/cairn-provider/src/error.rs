use thiserror::Error;

/// Errors returned by resource providers.
#[derive(Debug, Error)]
pub enum ProviderError {
  /// The node's properties do not match what the provider expects.
  #[error("invalid properties for kind '{kind}': {message}")]
  InvalidProperties { kind: String, message: String },

  /// An output template could not be rendered.
  #[error("failed to render output '{output}': {message}")]
  Render { output: String, message: String },

  /// The backing service rejected the resource.
  #[error("{message}")]
  Failed { message: String },
}
