//! Integration tests for the shipped publishers.

use std::collections::BTreeMap;

use async_trait::async_trait;
use cairn_artifact::{ByteStream, FsStore, Store, StoreError};
use cairn_publish::{
  Deployment, DeploymentPublisher, MANIFEST_KEY, NoopPublisher, PublishError, PublishedOutput,
  ResourceSummary, StorePublisher,
};

fn deployment(artifact_dir: Option<std::path::PathBuf>) -> Deployment {
  Deployment {
    stack: "photo-album".to_string(),
    build_id: "build-1".to_string(),
    artifact_dir,
    outputs: vec![PublishedOutput {
      name: "websiteUrl".to_string(),
      value: "http://photos.example".to_string(),
      description: Some("The URL of the website".to_string()),
    }],
    resources: vec![ResourceSummary {
      name: "FrontendWebsite".to_string(),
      kind: "template".to_string(),
      description: None,
      outputs: BTreeMap::from([("url".to_string(), "photos.example".to_string())]),
    }],
  }
}

struct FailingStore;

#[async_trait]
impl Store for FailingStore {
  async fn get(&self, key: &str) -> Result<ByteStream, StoreError> {
    Err(StoreError::NotFound(key.to_string()))
  }

  async fn put(&self, _key: &str, _data: ByteStream, _content_type: &str) -> Result<(), StoreError> {
    Err(StoreError::Io(std::io::Error::new(
      std::io::ErrorKind::PermissionDenied,
      "bucket is read-only",
    )))
  }

  async fn delete(&self, key: &str) -> Result<(), StoreError> {
    Err(StoreError::NotFound(key.to_string()))
  }
}

#[tokio::test]
async fn test_store_publisher_uploads_tree_and_manifest() {
  let build = tempfile::tempdir().unwrap();
  std::fs::create_dir_all(build.path().join("assets")).unwrap();
  std::fs::write(build.path().join("index.html"), "<html></html>").unwrap();
  std::fs::write(build.path().join("assets/logo.bin"), [0u8, 159, 146, 150]).unwrap();

  let target = tempfile::tempdir().unwrap();
  let publisher = StorePublisher::new(FsStore::new(target.path()), "file://bucket");

  let receipt = publisher
    .publish(&deployment(Some(build.path().to_path_buf())))
    .await
    .unwrap();

  assert_eq!(receipt.files, 2);
  assert_eq!(receipt.location, "file://bucket");
  assert_eq!(
    std::fs::read(target.path().join("assets/logo.bin")).unwrap(),
    vec![0u8, 159, 146, 150]
  );
  assert_eq!(
    std::fs::read_to_string(target.path().join("index.html")).unwrap(),
    "<html></html>"
  );

  let manifest: serde_json::Value =
    serde_json::from_slice(&std::fs::read(target.path().join(MANIFEST_KEY)).unwrap()).unwrap();
  assert_eq!(manifest["stack"], "photo-album");
  assert_eq!(manifest["outputs"][0]["value"], "http://photos.example");
  assert_eq!(manifest["outputs"][0]["description"], "The URL of the website");
  assert_eq!(manifest["resources"][0]["outputs"]["url"], "photos.example");
  assert!(manifest.get("artifact_dir").is_none());
}

#[tokio::test]
async fn test_store_publisher_without_artifact_writes_manifest_only() {
  let target = tempfile::tempdir().unwrap();
  let publisher = StorePublisher::new(FsStore::new(target.path()), "file://bucket");

  let receipt = publisher.publish(&deployment(None)).await.unwrap();

  assert_eq!(receipt.files, 0);
  assert!(target.path().join(MANIFEST_KEY).exists());
}

#[tokio::test]
async fn test_store_failure_is_external_deployment_failure() {
  let build = tempfile::tempdir().unwrap();
  std::fs::write(build.path().join("index.html"), "<html></html>").unwrap();

  let publisher = StorePublisher::new(FailingStore, "s3://photos");
  let err = publisher
    .publish(&deployment(Some(build.path().to_path_buf())))
    .await
    .unwrap_err();

  match err {
    PublishError::ExternalDeploymentFailure { target, source } => {
      assert_eq!(target, "s3://photos/index.html");
      assert!(source.to_string().contains("bucket is read-only"));
    }
    other => panic!("unexpected error: {other:?}"),
  }
}

#[tokio::test]
async fn test_noop_publisher_accepts_everything() {
  let receipt = NoopPublisher.publish(&deployment(None)).await.unwrap();
  assert_eq!(receipt.files, 0);
  assert_eq!(receipt.location, "noop");
}

#[tokio::test]
async fn test_publishing_into_the_artifact_directory_is_rejected() {
  let build = tempfile::tempdir().unwrap();
  let app = "const url = \"https://real.example\";";
  std::fs::write(build.path().join("app.js"), app).unwrap();

  // Same directory on both sides
  let publisher = StorePublisher::new(FsStore::new(build.path()), "file://build");
  let err = publisher
    .publish(&deployment(Some(build.path().to_path_buf())))
    .await
    .unwrap_err();
  assert!(matches!(err, PublishError::OverlappingTarget { .. }));
  assert_eq!(
    std::fs::read_to_string(build.path().join("app.js")).unwrap(),
    app
  );

  // Store nested inside the artifact
  let nested = StorePublisher::new(FsStore::new(build.path().join("publish")), "file://nested");
  let err = nested
    .publish(&deployment(Some(build.path().to_path_buf())))
    .await
    .unwrap_err();
  assert!(matches!(err, PublishError::OverlappingTarget { .. }));
  assert!(!build.path().join("publish").exists());
}

#[tokio::test]
async fn test_artifact_file_named_like_the_manifest_is_rejected() {
  let build = tempfile::tempdir().unwrap();
  std::fs::write(build.path().join("index.html"), "<html></html>").unwrap();
  std::fs::write(build.path().join(MANIFEST_KEY), "{}").unwrap();

  let target = tempfile::tempdir().unwrap();
  let publisher = StorePublisher::new(FsStore::new(target.path()), "file://bucket");
  let err = publisher
    .publish(&deployment(Some(build.path().to_path_buf())))
    .await
    .unwrap_err();

  assert!(matches!(err, PublishError::ReservedKey { ref key } if key == MANIFEST_KEY));
  assert!(!target.path().join("index.html").exists());
  assert!(!target.path().join(MANIFEST_KEY).exists());
}

#[tokio::test]
async fn test_republish_removes_files_gone_from_the_tree() {
  let build = tempfile::tempdir().unwrap();
  std::fs::create_dir_all(build.path().join("old")).unwrap();
  std::fs::write(build.path().join("index.html"), "<html></html>").unwrap();
  std::fs::write(build.path().join("old/legacy.js"), "legacy").unwrap();

  let target = tempfile::tempdir().unwrap();
  // Written by something else, never listed in a manifest
  std::fs::write(target.path().join("robots.txt"), "User-agent: *").unwrap();
  let publisher = StorePublisher::new(FsStore::new(target.path()), "file://bucket");

  publisher
    .publish(&deployment(Some(build.path().to_path_buf())))
    .await
    .unwrap();
  assert!(target.path().join("old/legacy.js").exists());

  std::fs::remove_dir_all(build.path().join("old")).unwrap();
  let receipt = publisher
    .publish(&deployment(Some(build.path().to_path_buf())))
    .await
    .unwrap();

  assert_eq!(receipt.files, 1);
  assert!(!target.path().join("old").exists());
  assert!(target.path().join("index.html").exists());
  assert!(target.path().join("robots.txt").exists());

  let manifest: serde_json::Value =
    serde_json::from_slice(&std::fs::read(target.path().join(MANIFEST_KEY)).unwrap()).unwrap();
  assert_eq!(manifest["files"], serde_json::json!(["index.html"]));
}
