//! End-to-end tests for Stack::build_and_deploy.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use cairn_artifact::FsStore;
use cairn_builder::BuildError;
use cairn_config::{ArtifactDef, InputBinding, NodeDef, OutputRef, PublicOutputDef, StackDef};
use cairn_graph::GraphError;
use cairn_outputs::OutputError;
use cairn_provider::ProviderRegistry;
use cairn_publish::{
  Deployment, DeploymentPublisher, MANIFEST_KEY, PublishError, PublishReceipt, StorePublisher,
};
use cairn_stack::{Stack, StackError};
use serde_json::json;

fn nodes() -> Vec<NodeDef> {
  vec![
    NodeDef::new("FrontendWebsite", "template")
      .with_input("bucket", InputBinding::output("Storage", "frontendBucket"))
      .with_properties(json!({ "outputs": { "url": "{{ bucket }}.web.example" } })),
    NodeDef::new("Api", "template")
      .with_input("stage", InputBinding::literal(json!("prod")))
      .with_input("bucket", InputBinding::output("Storage", "photosBucket"))
      .with_properties(json!({
        "outputs": {
          "apiEndpoint": "https://api.example/{{ stage }}",
          "apiKeyId": "key-{{ bucket }}"
        }
      })),
    NodeDef::new("Storage", "template").with_properties(json!({
      "outputs": { "frontendBucket": "frontend", "photosBucket": "photos" }
    })),
  ]
}

fn public() -> Vec<PublicOutputDef> {
  vec![
    PublicOutputDef::new("apiEndpoint", OutputRef::new("Api", "apiEndpoint")),
    PublicOutputDef::new("websiteUrl", OutputRef::new("FrontendWebsite", "url")),
  ]
}

fn frontend(root: &Path) -> std::path::PathBuf {
  let source = root.join("frontend");
  std::fs::create_dir_all(source.join("assets")).unwrap();
  std::fs::write(
    source.join("app.js"),
    "const url = \"YOUR_API_ENDPOINT\";\nconst key = \"YOUR_API_KEY\";\n",
  )
  .unwrap();
  std::fs::write(source.join("index.html"), "<script src=\"app.js\"></script>").unwrap();
  std::fs::write(source.join("assets/logo.bin"), [0u8, 255, 1, 254]).unwrap();
  source
}

fn artifact(source: std::path::PathBuf, dest: std::path::PathBuf) -> ArtifactDef {
  ArtifactDef {
    source_dir: source,
    dest_dir: dest,
    templated: vec!["app.js".to_string()],
    placeholders: BTreeMap::from([
      (
        "YOUR_API_ENDPOINT".to_string(),
        OutputRef::new("Api", "apiEndpoint"),
      ),
      ("YOUR_API_KEY".to_string(), OutputRef::new("Api", "apiKeyId")),
    ]),
  }
}

struct RejectingPublisher;

#[async_trait]
impl DeploymentPublisher for RejectingPublisher {
  async fn publish(&self, _deployment: &Deployment) -> Result<PublishReceipt, PublishError> {
    Err(PublishError::external("cloud", "stack rollback complete"))
  }
}

#[tokio::test]
async fn test_build_render_publish() {
  let dir = tempfile::tempdir().unwrap();
  let source = frontend(dir.path());
  let dest = dir.path().join("build");
  let bucket = dir.path().join("bucket");

  let stack = Stack::new("photo-album", ProviderRegistry::with_defaults())
    .with_publisher(StorePublisher::new(FsStore::new(&bucket), "file://bucket"));

  let outputs = stack
    .build_and_deploy(nodes(), Some(&artifact(source, dest.clone())), &public())
    .await
    .unwrap();

  assert_eq!(
    outputs,
    BTreeMap::from([
      ("apiEndpoint".to_string(), "https://api.example/prod".to_string()),
      ("websiteUrl".to_string(), "frontend.web.example".to_string()),
    ])
  );

  let app = std::fs::read_to_string(dest.join("app.js")).unwrap();
  assert_eq!(
    app,
    "const url = \"https://api.example/prod\";\nconst key = \"key-photos\";\n"
  );
  assert_eq!(
    std::fs::read(dest.join("assets/logo.bin")).unwrap(),
    vec![0u8, 255, 1, 254]
  );

  // Published copy matches the rendered tree
  assert_eq!(std::fs::read_to_string(bucket.join("app.js")).unwrap(), app);
  let manifest: serde_json::Value =
    serde_json::from_slice(&std::fs::read(bucket.join(MANIFEST_KEY)).unwrap()).unwrap();
  let resources: Vec<&str> = manifest["resources"]
    .as_array()
    .unwrap()
    .iter()
    .map(|r| r["name"].as_str().unwrap())
    .collect();
  assert_eq!(resources, vec!["Storage", "Api", "FrontendWebsite"]);
}

#[tokio::test]
async fn test_run_from_definition_without_artifact() {
  let def = StackDef::from_json(
    &json!({
      "name": "minimal",
      "nodes": [
        {
          "name": "Storage",
          "kind": "template",
          "properties": { "outputs": { "bucketUrl": "https://x.example" } }
        },
        {
          "name": "Api",
          "kind": "template",
          "inputs": { "endpoint": { "output": "Storage.bucketUrl" } },
          "properties": { "outputs": { "apiUrl": "{{ endpoint }}/api" } }
        }
      ],
      "outputs": [{ "name": "apiUrl", "value": "Api.apiUrl" }]
    })
    .to_string(),
  )
  .unwrap();

  let stack = Stack::new(def.name.clone(), ProviderRegistry::with_defaults());
  let outputs = stack.run(&def).await.unwrap();
  assert_eq!(outputs["apiUrl"], "https://x.example/api");
}

#[tokio::test]
async fn test_missing_placeholder_output_writes_nothing() {
  let dir = tempfile::tempdir().unwrap();
  let source = frontend(dir.path());
  let dest = dir.path().join("build");

  let mut def = artifact(source, dest.clone());
  def
    .placeholders
    .insert("YOUR_REGION".to_string(), OutputRef::new("Api", "region"));

  let stack = Stack::new("photo-album", ProviderRegistry::with_defaults());
  let err = stack
    .build_and_deploy(nodes(), Some(&def), &public())
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    StackError::Output(OutputError::MissingOutput { ref node, ref output })
      if node == "Api" && output == "region"
  ));
  assert!(!dest.exists());
}

#[tokio::test]
async fn test_cycle_renders_nothing() {
  let dir = tempfile::tempdir().unwrap();
  let source = frontend(dir.path());
  let dest = dir.path().join("build");

  let cyclic = vec![
    NodeDef::new("Lambdas", "template")
      .with_input("domain", InputBinding::output("OpenSearch", "domain")),
    NodeDef::new("OpenSearch", "template")
      .with_input("fn", InputBinding::output("Lambdas", "indexFn")),
  ];

  let stack = Stack::new("photo-album", ProviderRegistry::with_defaults());
  let err = stack
    .build_and_deploy(cyclic, Some(&artifact(source, dest.clone())), &[])
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    StackError::Build(BuildError::Graph(GraphError::CyclicDependency { .. }))
  ));
  assert!(!dest.exists());
}

#[tokio::test]
async fn test_duplicate_public_output() {
  let stack = Stack::new("photo-album", ProviderRegistry::with_defaults());
  let public = vec![
    PublicOutputDef::new("url", OutputRef::new("Api", "apiEndpoint")),
    PublicOutputDef::new("url", OutputRef::new("FrontendWebsite", "url")),
  ];

  let err = stack
    .build_and_deploy(nodes(), None, &public)
    .await
    .unwrap_err();
  assert_eq!(err.to_string(), "duplicate public output: url");
}

#[tokio::test]
async fn test_publisher_failure_surfaces() {
  let stack =
    Stack::new("photo-album", ProviderRegistry::with_defaults()).with_publisher(RejectingPublisher);

  let err = stack
    .build_and_deploy(nodes(), None, &public())
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    StackError::Publish(PublishError::ExternalDeploymentFailure { ref target, .. }) if target == "cloud"
  ));
  assert_eq!(
    err.to_string(),
    "external deployment failure at 'cloud': stack rollback complete"
  );
}

#[tokio::test]
async fn test_photo_album_demo() {
  let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/photo-album/stack.json");
  let mut def = StackDef::load(&path).unwrap();

  let dir = tempfile::tempdir().unwrap();
  let dest = dir.path().join("build");
  def.artifact.as_mut().unwrap().dest_dir = dest.clone();

  let stack = Stack::new(def.name.clone(), ProviderRegistry::with_defaults());
  let graph = stack.plan(&def.nodes).unwrap();
  assert_eq!(graph.entry_points(), ["LexBot", "Storage"]);

  let outputs = stack.run(&def).await.unwrap();
  assert_eq!(
    outputs["FrontendWebsiteUrl"],
    "http://photo-album-frontend.s3-website.example"
  );
  assert_eq!(outputs["ApiEndpoint"], "https://photos-api.example/prod");

  let app = std::fs::read_to_string(dest.join("app.js")).unwrap();
  assert!(app.contains("const API_ENDPOINT = \"https://photos-api.example/prod\";"));
  assert!(app.contains("const API_KEY = \"photos-key-prod\";"));
  assert!(dest.join("assets/style.css").exists());
}
