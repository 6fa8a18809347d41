use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use cairn_artifact::{ArtifactTemplater, Substitutions};
use cairn_builder::{BuildResult, GraphBuilder};
use cairn_config::{ArtifactDef, NodeDef, PublicOutputDef, StackDef};
use cairn_graph::Graph;
use cairn_outputs::{OutputError, OutputRegistry};
use cairn_provider::ProviderRegistry;
use cairn_publish::{
  Deployment, DeploymentPublisher, NoopPublisher, PublishedOutput, ResourceSummary,
};
use tracing::{error, info, instrument};

use crate::error::StackError;

/// Builds a resource graph, renders its artifact and publishes the result.
///
/// The publisher defaults to [`NoopPublisher`].
pub struct Stack<P: DeploymentPublisher = NoopPublisher> {
  name: String,
  builder: GraphBuilder,
  publisher: P,
}

impl Stack<NoopPublisher> {
  pub fn new(name: impl Into<String>, providers: ProviderRegistry) -> Self {
    Self {
      name: name.into(),
      builder: GraphBuilder::new(providers),
      publisher: NoopPublisher,
    }
  }
}

impl<P: DeploymentPublisher> Stack<P> {
  /// Replace the publisher.
  pub fn with_publisher<Q: DeploymentPublisher>(self, publisher: Q) -> Stack<Q> {
    Stack {
      name: self.name,
      builder: self.builder,
      publisher,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn publisher(&self) -> &P {
    &self.publisher
  }

  /// Validate the nodes and return the graph they form, constructing nothing.
  pub fn plan(&self, nodes: &[NodeDef]) -> Result<Graph, StackError> {
    Ok(self.builder.plan(nodes)?)
  }

  /// Build and deploy using everything stored in a stack definition.
  pub async fn run(&self, def: &StackDef) -> Result<BTreeMap<String, String>, StackError> {
    self
      .build_and_deploy(def.nodes.clone(), def.artifact.as_ref(), &def.outputs)
      .await
  }

  /// Build every node, render the artifact (if any), publish, and return the
  /// public outputs keyed by name.
  ///
  /// Every public output and placeholder is resolved before anything is
  /// written to the artifact destination.
  #[instrument(
    name = "build_and_deploy",
    skip_all,
    fields(stack = %self.name, nodes = nodes.len())
  )]
  pub async fn build_and_deploy(
    &self,
    nodes: Vec<NodeDef>,
    artifact: Option<&ArtifactDef>,
    public: &[PublicOutputDef],
  ) -> Result<BTreeMap<String, String>, StackError> {
    self
      .deploy(nodes, artifact, public)
      .await
      .inspect_err(|e| error!(stack = %self.name, error = %e, "deploy_failed"))
  }

  async fn deploy(
    &self,
    nodes: Vec<NodeDef>,
    artifact: Option<&ArtifactDef>,
    public: &[PublicOutputDef],
  ) -> Result<BTreeMap<String, String>, StackError> {
    let mut names = HashSet::new();
    for def in public {
      if !names.insert(def.name.as_str()) {
        return Err(StackError::DuplicatePublicOutput {
          name: def.name.clone(),
        });
      }
    }

    let registry = OutputRegistry::new();
    let result = self.builder.build(nodes, &registry).await?;

    let outputs = resolve_public(public, &registry)?;
    let artifact_dir = match artifact {
      Some(def) => Some(render_artifact(def, &registry).await?),
      None => None,
    };

    let deployment = Deployment {
      stack: self.name.clone(),
      build_id: result.build_id.clone(),
      artifact_dir,
      outputs,
      resources: summarize(&result),
    };

    let receipt = self.publisher.publish(&deployment).await?;
    info!(
      build_id = %deployment.build_id,
      location = %receipt.location,
      files = receipt.files,
      outputs = deployment.outputs.len(),
      "stack_deployed"
    );

    Ok(deployment.output_map())
  }
}

fn resolve_public(
  public: &[PublicOutputDef],
  registry: &OutputRegistry,
) -> Result<Vec<PublishedOutput>, OutputError> {
  public
    .iter()
    .map(|def| {
      Ok(PublishedOutput {
        name: def.name.clone(),
        value: registry.resolve_ref(&def.value)?,
        description: def.description.clone(),
      })
    })
    .collect()
}

async fn render_artifact(
  def: &ArtifactDef,
  registry: &OutputRegistry,
) -> Result<PathBuf, StackError> {
  let values = def
    .placeholders
    .iter()
    .map(|(token, source)| Ok((token.clone(), registry.resolve_ref(source)?)))
    .collect::<Result<BTreeMap<_, _>, OutputError>>()?;

  let substitutions = Substitutions::new(values)?;
  let templater = ArtifactTemplater::new(&def.templated)?;
  templater
    .render(&def.source_dir, &def.dest_dir, &substitutions)
    .await?;

  Ok(def.dest_dir.clone())
}

fn summarize(result: &BuildResult) -> Vec<ResourceSummary> {
  result
    .order
    .iter()
    .filter_map(|name| result.node(name))
    .map(|node| ResourceSummary {
      name: node.name.clone(),
      kind: node.kind.clone(),
      description: node.description.clone(),
      outputs: node.outputs.clone(),
    })
    .collect()
}
