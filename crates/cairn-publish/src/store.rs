use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use cairn_artifact::{ByteStream, Store, StoreError, paths_overlap, read_all, walk_tree};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, instrument, warn};

use crate::deployment::{Deployment, PublishReceipt};
use crate::error::PublishError;
use crate::publisher::DeploymentPublisher;

/// Key the deployment manifest is stored under. Artifact files may not use it.
pub const MANIFEST_KEY: &str = "cairn-manifest.json";

/// Manifest as written: the deployment plus the keys uploaded with it.
#[derive(Serialize)]
struct Manifest<'a> {
  #[serde(flatten)]
  deployment: &'a Deployment,
  files: &'a BTreeSet<String>,
}

/// The part of an earlier manifest needed to prune stale files.
#[derive(Deserialize)]
struct PreviousManifest {
  #[serde(default)]
  files: BTreeSet<String>,
}

/// Publishes a deployment into an artifact store.
///
/// Every file of the rendered artifact is uploaded under its path relative
/// to the artifact root (`assets/style.css`), then the manifest under
/// [`MANIFEST_KEY`]. Files listed by the previous manifest that are no
/// longer part of the artifact are deleted from the store.
pub struct StorePublisher<S: Store> {
  store: S,
  location: String,
}

impl<S: Store> StorePublisher<S> {
  /// `location` names the target in receipts and errors.
  pub fn new(store: S, location: impl Into<String>) -> Self {
    Self {
      store,
      location: location.into(),
    }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  fn target(&self, key: &str) -> String {
    format!("{}/{}", self.location.trim_end_matches('/'), key)
  }

  /// Keys and source paths of every artifact file.
  async fn artifact_files(&self, dir: &Path) -> Result<Vec<(String, PathBuf)>, PublishError> {
    if let Some(root) = self.store.local_root()
      && paths_overlap(dir, root).await
    {
      return Err(PublishError::OverlappingTarget {
        artifact_dir: dir.to_path_buf(),
        target: root.to_path_buf(),
      });
    }

    let mut files = Vec::new();
    for entry in walk_tree(dir).await? {
      if entry.is_dir {
        continue;
      }
      let key = store_key(&entry.relative);
      if key == MANIFEST_KEY {
        return Err(PublishError::ReservedKey { key });
      }
      files.push((key, dir.join(&entry.relative)));
    }
    Ok(files)
  }

  async fn upload(&self, key: &str, path: &Path) -> Result<(), PublishError> {
    let file = File::open(path)
      .await
      .map_err(|e| PublishError::external(self.target(key), e))?;
    let data: ByteStream = Box::pin(ReaderStream::new(file).map(|r| r.map_err(StoreError::Io)));

    self
      .store
      .put(key, data, content_type(path))
      .await
      .map_err(|e| PublishError::external(self.target(key), e))?;

    debug!(key = %key, "artifact_uploaded");
    Ok(())
  }

  /// Keys recorded by the manifest currently in the store, if any.
  async fn previous_files(&self) -> Result<BTreeSet<String>, PublishError> {
    let stream = match self.store.get(MANIFEST_KEY).await {
      Ok(stream) => stream,
      Err(StoreError::NotFound(_)) => return Ok(BTreeSet::new()),
      Err(e) => return Err(PublishError::external(self.target(MANIFEST_KEY), e)),
    };
    let data = read_all(stream)
      .await
      .map_err(|e| PublishError::external(self.target(MANIFEST_KEY), e))?;

    match serde_json::from_slice::<PreviousManifest>(&data) {
      Ok(previous) => Ok(previous.files),
      Err(e) => {
        warn!(error = %e, "previous_manifest_unreadable");
        Ok(BTreeSet::new())
      }
    }
  }

  async fn write_manifest(
    &self,
    deployment: &Deployment,
    files: &BTreeSet<String>,
  ) -> Result<(), PublishError> {
    let manifest = Bytes::from(serde_json::to_vec_pretty(&Manifest { deployment, files })?);
    let data: ByteStream = Box::pin(futures::stream::once(async move { Ok(manifest) }));
    self
      .store
      .put(MANIFEST_KEY, data, "application/json")
      .await
      .map_err(|e| PublishError::external(self.target(MANIFEST_KEY), e))
  }
}

#[async_trait]
impl<S: Store> DeploymentPublisher for StorePublisher<S> {
  #[instrument(
    name = "store_publish",
    skip(self, deployment),
    fields(stack = %deployment.stack, location = %self.location)
  )]
  async fn publish(&self, deployment: &Deployment) -> Result<PublishReceipt, PublishError> {
    let files = match &deployment.artifact_dir {
      Some(dir) => self.artifact_files(dir).await?,
      None => Vec::new(),
    };
    let previous = self.previous_files().await?;

    for (key, path) in &files {
      self.upload(key, path).await?;
    }

    let current: BTreeSet<String> = files.iter().map(|(key, _)| key.clone()).collect();
    self.write_manifest(deployment, &current).await?;

    let mut pruned = 0;
    for key in previous.difference(&current) {
      if key == MANIFEST_KEY {
        continue;
      }
      match self.store.delete(key).await {
        Ok(()) => {
          pruned += 1;
          debug!(key = %key, "stale_artifact_deleted");
        }
        Err(StoreError::NotFound(_)) => {}
        Err(e) => return Err(PublishError::external(self.target(key), e)),
      }
    }

    info!(
      files = current.len(),
      pruned,
      outputs = deployment.outputs.len(),
      resources = deployment.resources.len(),
      "deployment_published"
    );

    Ok(PublishReceipt {
      files: current.len(),
      location: self.location.clone(),
    })
  }
}

/// `/`-separated key for a path relative to the artifact root.
fn store_key(relative: &Path) -> String {
  relative
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}

fn content_type(path: &Path) -> &'static str {
  let ext = path
    .extension()
    .and_then(|e| e.to_str())
    .map(str::to_ascii_lowercase);
  match ext.as_deref() {
    Some("html" | "htm") => "text/html",
    Some("js" | "mjs") => "application/javascript",
    Some("css") => "text/css",
    Some("json") => "application/json",
    Some("svg") => "image/svg+xml",
    Some("png") => "image/png",
    Some("jpg" | "jpeg") => "image/jpeg",
    Some("gif") => "image/gif",
    Some("ico") => "image/x-icon",
    Some("txt") => "text/plain",
    _ => "application/octet-stream",
  }
}
