//! Cairn Publish
//!
//! Once the graph is built and the artifact rendered, a
//! [`DeploymentPublisher`] hands the result to whatever performs the actual
//! deployment. Publishers never retry; a failure is reported as
//! [`PublishError::ExternalDeploymentFailure`] and aborts the run.
//!
//! - [`StorePublisher`] uploads the artifact tree and a `cairn-manifest.json`
//!   into an artifact [`Store`](cairn_artifact::Store), removing files an
//!   earlier publish uploaded that are gone from the tree.
//! - [`NoopPublisher`] accepts every deployment without side effects.

mod deployment;
mod error;
mod publisher;
mod store;

pub use deployment::{Deployment, PublishReceipt, PublishedOutput, ResourceSummary};
pub use error::PublishError;
pub use publisher::{DeploymentPublisher, NoopPublisher};
pub use store::{MANIFEST_KEY, StorePublisher};
