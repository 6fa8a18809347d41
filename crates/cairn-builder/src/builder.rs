//! Graph builder implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use cairn_config::NodeDef;
use cairn_graph::Graph;
use cairn_outputs::OutputRegistry;
use cairn_provider::{ConstructRequest, ProviderRegistry, ResourceProvider};
use tracing::{error, info, instrument};

use crate::error::BuildError;
use crate::input::resolve_inputs;
use crate::node::{BuildResult, ResourceNode};

/// A node whose inputs are resolved and whose provider is known.
struct PendingNode {
  def: NodeDef,
  inputs: BTreeMap<String, serde_json::Value>,
  provider: Arc<dyn ResourceProvider>,
}

/// Constructs resource nodes in dependency order.
pub struct GraphBuilder {
  providers: ProviderRegistry,
}

impl GraphBuilder {
  pub fn new(providers: ProviderRegistry) -> Self {
    Self { providers }
  }

  pub fn providers(&self) -> &ProviderRegistry {
    &self.providers
  }

  /// Validate node definitions without constructing anything.
  ///
  /// Checks names, bindings and acyclicity, then that every kind has a
  /// provider.
  pub fn plan(&self, nodes: &[NodeDef]) -> Result<Graph, BuildError> {
    for node in nodes {
      node.validate()?;
    }
    let graph = Graph::new(nodes)?;

    for node in nodes {
      if !self.providers.contains(&node.kind) {
        return Err(BuildError::UnknownKind {
          node: node.name.clone(),
          kind: node.kind.clone(),
        });
      }
    }

    Ok(graph)
  }

  /// Construct every node, registering outputs into `registry` as nodes
  /// complete.
  ///
  /// Nothing is constructed unless the whole graph validates. The first
  /// failure aborts the build; nodes constructed before it are discarded.
  #[instrument(
    name = "graph_build",
    skip(self, nodes, registry),
    fields(nodes = nodes.len())
  )]
  pub async fn build(
    &self,
    nodes: Vec<NodeDef>,
    registry: &OutputRegistry,
  ) -> Result<BuildResult, BuildError> {
    let build_id = uuid::Uuid::new_v4().to_string();

    let graph = self.plan(&nodes)?;

    info!(
      build_id = %build_id,
      nodes = graph.len(),
      waves = graph.waves().len(),
      "build_started"
    );

    let mut defs: BTreeMap<String, NodeDef> = nodes
      .into_iter()
      .map(|node| (node.name.clone(), node))
      .collect();

    let mut result = BuildResult {
      build_id,
      order: Vec::with_capacity(defs.len()),
      nodes: BTreeMap::new(),
    };

    for wave in graph.waves() {
      let outcome = match self.prepare_wave(wave, &mut defs, registry, &result.build_id) {
        Ok(pending) => self.construct_wave(pending, registry, &mut result).await,
        Err(e) => Err(e),
      };

      if let Err(e) = outcome {
        error!(build_id = %result.build_id, error = %e, "build_failed");
        return Err(e);
      }
    }

    info!(
      build_id = %result.build_id,
      constructed = result.order.len(),
      outputs = registry.len(),
      "build_completed"
    );

    Ok(result)
  }

  /// Resolve inputs and look up providers for every node of a wave.
  fn prepare_wave(
    &self,
    wave: &[String],
    defs: &mut BTreeMap<String, NodeDef>,
    registry: &OutputRegistry,
    build_id: &str,
  ) -> Result<Vec<PendingNode>, BuildError> {
    let mut pending = Vec::with_capacity(wave.len());

    for name in wave {
      let Some(def) = defs.remove(name) else {
        continue;
      };

      let inputs = resolve_inputs(&def, registry)?;
      let provider = self
        .providers
        .get(&def.kind)
        .ok_or_else(|| BuildError::UnknownKind {
          node: def.name.clone(),
          kind: def.kind.clone(),
        })?;

      info!(
        build_id = %build_id,
        node = %def.name,
        kind = %def.kind,
        "node_started"
      );

      pending.push(PendingNode {
        def,
        inputs,
        provider,
      });
    }

    Ok(pending)
  }

  /// Construct one wave concurrently, then register outputs in name order.
  async fn construct_wave(
    &self,
    pending: Vec<PendingNode>,
    registry: &OutputRegistry,
    result: &mut BuildResult,
  ) -> Result<(), BuildError> {
    let constructions = pending.iter().map(|node| async move {
      let request = ConstructRequest {
        node: node.def.name.clone(),
        kind: node.def.kind.clone(),
        inputs: node.inputs.clone(),
        properties: node.def.properties.clone(),
      };
      node.provider.construct(&request).await
    });

    let outcomes = futures::future::join_all(constructions).await;

    for (node, outcome) in pending.into_iter().zip(outcomes) {
      let outputs = outcome.map_err(|source| {
        error!(
          build_id = %result.build_id,
          node = %node.def.name,
          error = %source,
          "node_failed"
        );
        BuildError::Construction {
          node: node.def.name.clone(),
          source,
        }
      })?;

      for (output, value) in &outputs {
        registry.register(&node.def.name, output, value.clone())?;
      }

      info!(
        build_id = %result.build_id,
        node = %node.def.name,
        outputs = outputs.len(),
        "node_constructed"
      );

      let PendingNode { def, inputs, .. } = node;
      result.order.push(def.name.clone());
      result.nodes.insert(
        def.name.clone(),
        ResourceNode {
          name: def.name,
          kind: def.kind,
          description: def.description,
          bindings: def.inputs,
          inputs,
          outputs,
        },
      );
    }

    Ok(())
  }
}
