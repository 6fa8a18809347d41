use std::path::Path;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};

/// Streamed object content.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StoreError>> + Send>>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("no object stored under '{0}'")]
  NotFound(String),

  /// Keys are relative, `/`-separated and may not leave the store.
  #[error("invalid object key '{0}'")]
  InvalidKey(String),

  #[error("store io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Destination a rendered artifact is published into.
///
/// Objects are addressed by their path relative to the artifact root
/// (`assets/style.css`). Publishers read back their previous manifest with
/// `get` and remove files that disappeared from the tree with `delete`.
#[async_trait]
pub trait Store: Send + Sync {
  async fn get(&self, key: &str) -> Result<ByteStream, StoreError>;

  /// Replaces any object already stored under `key`.
  async fn put(&self, key: &str, data: ByteStream, content_type: &str) -> Result<(), StoreError>;

  async fn delete(&self, key: &str) -> Result<(), StoreError>;

  /// Local directory holding the objects, for stores backed by one.
  fn local_root(&self) -> Option<&Path> {
    None
  }
}

/// Drain a stream into memory. Only meant for small objects like manifests.
pub async fn read_all(mut stream: ByteStream) -> Result<Vec<u8>, StoreError> {
  let mut data = Vec::new();
  while let Some(chunk) = stream.next().await {
    data.extend_from_slice(&chunk?);
  }
  Ok(data)
}
