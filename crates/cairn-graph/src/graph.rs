use std::collections::BTreeMap;

use cairn_config::NodeDef;

use crate::error::GraphError;

/// Validated dependency graph.
///
/// Node names are kept in ordered maps so every traversal, and therefore the
/// construction order, is deterministic for a given set of definitions.
#[derive(Debug, Clone)]
pub struct Graph {
  /// Adjacency list: producer -> nodes consuming one of its outputs.
  adjacency: BTreeMap<String, Vec<String>>,
  /// Reverse adjacency: consumer -> producers it depends on.
  reverse_adjacency: BTreeMap<String, Vec<String>>,
  /// Construction waves, in order.
  waves: Vec<Vec<String>>,
}

impl Graph {
  /// Build and validate a graph from node definitions.
  ///
  /// Fails on the first duplicate name, dangling binding or cycle found.
  pub fn new(nodes: &[NodeDef]) -> Result<Self, GraphError> {
    let mut adjacency: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut reverse_adjacency: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for node in nodes {
      if adjacency.insert(node.name.clone(), Vec::new()).is_some() {
        return Err(GraphError::DuplicateNode {
          node: node.name.clone(),
        });
      }
      reverse_adjacency.insert(node.name.clone(), Vec::new());
    }

    // Wire edges from output bindings
    for node in nodes {
      for (input, dep) in node.dependencies() {
        if !adjacency.contains_key(&dep.node) {
          return Err(GraphError::UnresolvedBinding {
            node: node.name.clone(),
            input: input.to_string(),
            producer: dep.node.clone(),
            output: dep.output.clone(),
          });
        }

        let consumers = adjacency.entry(dep.node.clone()).or_default();
        if !consumers.contains(&node.name) {
          consumers.push(node.name.clone());
        }

        let producers = reverse_adjacency.entry(node.name.clone()).or_default();
        if !producers.contains(&dep.node) {
          producers.push(dep.node.clone());
        }
      }
    }

    for list in adjacency.values_mut().chain(reverse_adjacency.values_mut()) {
      list.sort();
    }

    if let Some(cycle) = find_cycle(&adjacency) {
      return Err(GraphError::CyclicDependency { cycle });
    }

    let waves = compute_waves(&adjacency, &reverse_adjacency);

    Ok(Self {
      adjacency,
      reverse_adjacency,
      waves,
    })
  }

  /// Groups of nodes that can be constructed together. Every node appears
  /// in a later wave than all of its producers.
  pub fn waves(&self) -> &[Vec<String>] {
    &self.waves
  }

  /// Full construction order (the waves flattened).
  pub fn topological_order(&self) -> Vec<String> {
    self.waves.iter().flatten().cloned().collect()
  }

  /// Nodes that bind no outputs.
  pub fn entry_points(&self) -> &[String] {
    self.waves.first().map(|w| w.as_slice()).unwrap_or(&[])
  }

  /// Nodes consuming an output of the given node.
  pub fn downstream(&self, node: &str) -> &[String] {
    self
      .adjacency
      .get(node)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Producers the given node depends on.
  pub fn upstream(&self, node: &str) -> &[String] {
    self
      .reverse_adjacency
      .get(node)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  pub fn contains(&self, node: &str) -> bool {
    self.adjacency.contains_key(node)
  }

  pub fn len(&self) -> usize {
    self.adjacency.len()
  }

  pub fn is_empty(&self) -> bool {
    self.adjacency.is_empty()
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mark {
  InProgress,
  Done,
}

/// Depth-first search for a back edge. Returns the cycle as a path whose
/// first and last entries are the same node.
fn find_cycle(adjacency: &BTreeMap<String, Vec<String>>) -> Option<Vec<String>> {
  fn dfs<'a>(
    node: &'a str,
    adjacency: &'a BTreeMap<String, Vec<String>>,
    marks: &mut BTreeMap<&'a str, Mark>,
    path: &mut Vec<&'a str>,
  ) -> Option<Vec<String>> {
    marks.insert(node, Mark::InProgress);
    path.push(node);

    if let Some(neighbors) = adjacency.get(node) {
      for next in neighbors {
        match marks.get(next.as_str()) {
          Some(Mark::InProgress) => {
            // Back edge: the cycle is the path suffix starting at `next`
            let start = path.iter().position(|n| *n == next).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
            cycle.push(next.clone());
            return Some(cycle);
          }
          Some(Mark::Done) => {}
          None => {
            if let Some(cycle) = dfs(next, adjacency, marks, path) {
              return Some(cycle);
            }
          }
        }
      }
    }

    path.pop();
    marks.insert(node, Mark::Done);
    None
  }

  let mut marks: BTreeMap<&str, Mark> = BTreeMap::new();
  let mut path = Vec::new();

  for node in adjacency.keys() {
    if !marks.contains_key(node.as_str())
      && let Some(cycle) = dfs(node, adjacency, &mut marks, &mut path)
    {
      return Some(cycle);
    }
  }

  None
}

/// Kahn's algorithm, one wave per round of zero in-degree nodes.
///
/// Only called on acyclic graphs, so every node ends up in a wave.
fn compute_waves(
  adjacency: &BTreeMap<String, Vec<String>>,
  reverse_adjacency: &BTreeMap<String, Vec<String>>,
) -> Vec<Vec<String>> {
  let mut indegree: BTreeMap<&str, usize> = reverse_adjacency
    .iter()
    .map(|(node, producers)| (node.as_str(), producers.len()))
    .collect();

  let mut current: Vec<&str> = indegree
    .iter()
    .filter(|(_, degree)| **degree == 0)
    .map(|(node, _)| *node)
    .collect();

  let mut waves = Vec::new();
  while !current.is_empty() {
    let mut next = Vec::new();
    for node in &current {
      for consumer in adjacency.get(*node).into_iter().flatten() {
        if let Some(degree) = indegree.get_mut(consumer.as_str()) {
          *degree -= 1;
          if *degree == 0 {
            next.push(consumer.as_str());
          }
        }
      }
    }
    next.sort();
    waves.push(current.iter().map(|n| n.to_string()).collect());
    current = next;
  }

  waves
}
