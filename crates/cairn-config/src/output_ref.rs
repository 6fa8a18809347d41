use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Reference to a named output of a node, written `Node.output`.
///
/// The first `.` separates the node name from the output name, so output
/// names may themselves contain dots (`Api.stage.url` is node `Api`, output
/// `stage.url`). Node names never contain a dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OutputRef {
  pub node: String,
  pub output: String,
}

impl OutputRef {
  pub fn new(node: impl Into<String>, output: impl Into<String>) -> Self {
    Self {
      node: node.into(),
      output: output.into(),
    }
  }

  /// Parse a dotted `Node.output` reference.
  pub fn parse(value: &str) -> Result<Self, ConfigError> {
    let invalid = || ConfigError::InvalidOutputRef {
      value: value.to_string(),
    };

    let (node, output) = value.trim().split_once('.').ok_or_else(invalid)?;
    if node.is_empty() || output.is_empty() {
      return Err(invalid());
    }

    Ok(Self::new(node, output))
  }
}

impl fmt::Display for OutputRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.node, self.output)
  }
}

impl FromStr for OutputRef {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl TryFrom<String> for OutputRef {
  type Error = ConfigError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::parse(&value)
  }
}

impl From<OutputRef> for String {
  fn from(value: OutputRef) -> Self {
    value.to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_simple() {
    let r = OutputRef::parse("Storage.bucketUrl").unwrap();
    assert_eq!(r, OutputRef::new("Storage", "bucketUrl"));
    assert_eq!(r.to_string(), "Storage.bucketUrl");
  }

  #[test]
  fn test_parse_splits_on_first_dot() {
    let r: OutputRef = "Api.stage.url".parse().unwrap();
    assert_eq!(r.node, "Api");
    assert_eq!(r.output, "stage.url");
  }

  #[test]
  fn test_parse_invalid() {
    for bad in ["Storage", ".bucketUrl", "Storage.", ""] {
      assert!(
        matches!(
          OutputRef::parse(bad),
          Err(ConfigError::InvalidOutputRef { .. })
        ),
        "expected '{}' to be rejected",
        bad
      );
    }
  }

  #[test]
  fn test_serde_as_string() {
    let r = OutputRef::new("Api", "apiUrl");
    let json = serde_json::to_string(&r).unwrap();
    assert_eq!(json, "\"Api.apiUrl\"");

    let back: OutputRef = serde_json::from_str(&json).unwrap();
    assert_eq!(back, r);

    assert!(serde_json::from_str::<OutputRef>("\"nodot\"").is_err());
  }
}
