use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
  /// Two nodes declare the same name.
  #[error("duplicate node: {node}")]
  DuplicateNode { node: String },

  /// An input is bound to an output that its producer never registers, or to
  /// a producer that does not exist.
  #[error("unresolved binding: input '{input}' of node '{node}' refers to '{producer}.{output}'")]
  UnresolvedBinding {
    node: String,
    input: String,
    producer: String,
    output: String,
  },

  /// The bindings form a cycle. The path starts and ends with the same node.
  #[error("cyclic dependency: {}", cycle.join(" -> "))]
  CyclicDependency { cycle: Vec<String> },
}
