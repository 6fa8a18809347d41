use std::collections::HashMap;
use std::sync::Arc;

use crate::provider::ResourceProvider;
use crate::template::TemplateProvider;

/// Providers indexed by the node kind they handle.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
  providers: HashMap<String, Arc<dyn ResourceProvider>>,
}

impl ProviderRegistry {
  /// An empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// A registry containing the built-in providers.
  pub fn with_defaults() -> Self {
    let mut registry = Self::new();
    registry.register(TemplateProvider::new());
    registry
  }

  /// Register a provider under its kind, replacing any previous one.
  pub fn register(&mut self, provider: impl ResourceProvider + 'static) -> &mut Self {
    self.register_arc(Arc::new(provider))
  }

  pub fn register_arc(&mut self, provider: Arc<dyn ResourceProvider>) -> &mut Self {
    self.providers.insert(provider.kind().to_string(), provider);
    self
  }

  pub fn get(&self, kind: &str) -> Option<Arc<dyn ResourceProvider>> {
    self.providers.get(kind).cloned()
  }

  pub fn contains(&self, kind: &str) -> bool {
    self.providers.contains_key(kind)
  }

  /// Registered kinds, sorted.
  pub fn kinds(&self) -> Vec<String> {
    let mut kinds: Vec<String> = self.providers.keys().cloned().collect();
    kinds.sort();
    kinds
  }
}

impl std::fmt::Debug for ProviderRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ProviderRegistry")
      .field("kinds", &self.kinds())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ProviderError;
  use crate::provider::{ConstructRequest, Outputs};
  use async_trait::async_trait;

  struct Bucket;

  #[async_trait]
  impl ResourceProvider for Bucket {
    fn kind(&self) -> &str {
      "bucket"
    }

    async fn construct(&self, request: &ConstructRequest) -> Result<Outputs, ProviderError> {
      Ok(Outputs::from([(
        "bucketName".to_string(),
        request.node.to_lowercase(),
      )]))
    }
  }

  #[test]
  fn test_defaults_include_template() {
    let registry = ProviderRegistry::with_defaults();
    assert!(registry.contains("template"));
    assert!(registry.get("bucket").is_none());
  }

  #[test]
  fn test_register_by_kind() {
    let mut registry = ProviderRegistry::with_defaults();
    registry.register(Bucket);

    assert_eq!(registry.kinds(), vec!["bucket", "template"]);
    assert_eq!(registry.get("bucket").unwrap().kind(), "bucket");
  }
}
