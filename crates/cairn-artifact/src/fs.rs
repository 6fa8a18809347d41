use std::io;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

use crate::store::{ByteStream, Store, StoreError};

/// Store kept in a local directory, one file per key.
///
/// `put` writes to a hidden sibling and renames it over the target, so a
/// reader never observes a half-written object. `delete` also removes
/// directories it leaves empty.
#[derive(Debug, Clone)]
pub struct FsStore {
  root: PathBuf,
}

impl FsStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  fn object_path(&self, key: &str) -> Result<PathBuf, StoreError> {
    let relative = Path::new(key);
    let inside = !key.is_empty()
      && relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !inside {
      return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(self.root.join(relative))
  }

  /// Remove empty directories from `dir` up to, not including, the root.
  async fn prune_empty(&self, mut dir: Option<&Path>) {
    while let Some(current) = dir {
      if current == self.root || fs::remove_dir(current).await.is_err() {
        break;
      }
      dir = current.parent();
    }
  }
}

fn missing_as_not_found(key: &str, err: io::Error) -> StoreError {
  if err.kind() == io::ErrorKind::NotFound {
    StoreError::NotFound(key.to_string())
  } else {
    StoreError::Io(err)
  }
}

async fn write_stream(path: &Path, mut data: ByteStream) -> Result<(), StoreError> {
  let mut file = File::create(path).await?;
  while let Some(chunk) = data.next().await {
    file.write_all(&chunk?).await?;
  }
  file.sync_all().await?;
  Ok(())
}

#[async_trait]
impl Store for FsStore {
  async fn get(&self, key: &str) -> Result<ByteStream, StoreError> {
    let path = self.object_path(key)?;
    let file = File::open(&path)
      .await
      .map_err(|e| missing_as_not_found(key, e))?;
    Ok(Box::pin(
      ReaderStream::new(file).map(|chunk| chunk.map_err(StoreError::Io)),
    ))
  }

  async fn put(&self, key: &str, data: ByteStream, _content_type: &str) -> Result<(), StoreError> {
    let path = self.object_path(key)?;
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).await?;
    }

    let name = path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_default();
    let staging = path.with_file_name(format!(".{}.cairn-upload", name));

    let written = match write_stream(&staging, data).await {
      Ok(()) => fs::rename(&staging, &path).await.map_err(StoreError::Io),
      Err(e) => Err(e),
    };
    if written.is_err() {
      let _ = fs::remove_file(&staging).await;
    }
    written
  }

  async fn delete(&self, key: &str) -> Result<(), StoreError> {
    let path = self.object_path(key)?;
    fs::remove_file(&path)
      .await
      .map_err(|e| missing_as_not_found(key, e))?;
    self.prune_empty(path.parent()).await;
    Ok(())
  }

  fn local_root(&self) -> Option<&Path> {
    Some(&self.root)
  }
}
