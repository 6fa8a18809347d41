//! Output computation using minijinja templates.
//!
//! A `template` node lists its outputs under `properties.outputs`. Every
//! value is rendered against the node's resolved inputs:
//!
//! ```json
//! {
//!   "name": "Api",
//!   "kind": "template",
//!   "inputs": { "endpoint": { "output": "Storage.bucketUrl" } },
//!   "properties": {
//!     "outputs": {
//!       "apiUrl": "{{ endpoint }}/api",
//!       "stage": "prod"
//!     }
//!   }
//! }
//! ```
//!
//! Undefined variables are an error, so a typo in a template never renders
//! as an empty string.

use async_trait::async_trait;
use minijinja::{Environment, UndefinedBehavior};
use tracing::debug;

use crate::error::ProviderError;
use crate::provider::{ConstructRequest, Outputs, ResourceProvider};

pub const TEMPLATE_KIND: &str = "template";

#[derive(Debug, Clone, Default)]
pub struct TemplateProvider;

impl TemplateProvider {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl ResourceProvider for TemplateProvider {
  fn kind(&self) -> &str {
    TEMPLATE_KIND
  }

  async fn construct(&self, request: &ConstructRequest) -> Result<Outputs, ProviderError> {
    let templates = match request.properties.get("outputs") {
      None | Some(serde_json::Value::Null) => return Ok(Outputs::new()),
      Some(serde_json::Value::Object(map)) => map,
      Some(_) => {
        return Err(ProviderError::InvalidProperties {
          kind: TEMPLATE_KIND.to_string(),
          message: "'outputs' must be an object".to_string(),
        });
      }
    };

    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);

    let mut outputs = Outputs::new();
    for (name, template) in templates {
      let value = match template {
        serde_json::Value::String(source) => render(&env, name, source, request)?,
        // Numbers, bools and structured values are exposed as JSON text
        other => other.to_string(),
      };
      outputs.insert(name.clone(), value);
    }

    debug!(
      node = %request.node,
      outputs = outputs.len(),
      "template_outputs_rendered"
    );
    Ok(outputs)
  }
}

fn render(
  env: &Environment,
  output: &str,
  source: &str,
  request: &ConstructRequest,
) -> Result<String, ProviderError> {
  env
    .render_str(source, &request.inputs)
    .map_err(|e| ProviderError::Render {
      output: output.to_string(),
      message: e.to_string(),
    })
}
