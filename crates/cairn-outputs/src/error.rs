use thiserror::Error;

/// Errors raised by the output registry.
#[derive(Debug, Error)]
pub enum OutputError {
  /// The output was already registered.
  #[error("duplicate output: {node}.{output}")]
  DuplicateOutput { node: String, output: String },

  /// The output has not been registered.
  #[error("missing output: {node}.{output}")]
  MissingOutput { node: String, output: String },
}
