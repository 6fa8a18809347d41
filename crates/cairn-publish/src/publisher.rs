use async_trait::async_trait;
use tracing::debug;

use crate::deployment::{Deployment, PublishReceipt};
use crate::error::PublishError;

/// Ships a finished build to a deployment target.
#[async_trait]
pub trait DeploymentPublisher: Send + Sync {
  async fn publish(&self, deployment: &Deployment) -> Result<PublishReceipt, PublishError>;
}

/// Publisher that accepts every deployment and does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

#[async_trait]
impl DeploymentPublisher for NoopPublisher {
  async fn publish(&self, deployment: &Deployment) -> Result<PublishReceipt, PublishError> {
    debug!(
      stack = %deployment.stack,
      outputs = deployment.outputs.len(),
      "publish_skipped"
    );
    Ok(PublishReceipt {
      files: 0,
      location: "noop".to_string(),
    })
  }
}
