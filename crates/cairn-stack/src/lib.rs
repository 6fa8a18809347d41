//! Cairn Stack
//!
//! A [`Stack`] ties the pipeline together for one invocation:
//!
//! 1. build every node in dependency order into a fresh output registry
//! 2. resolve the public outputs and the artifact placeholders
//! 3. render the artifact tree
//! 4. hand the deployment to the publisher
//!
//! The public outputs are the only state returned. All failures abort the
//! invocation; no step is retried.

mod error;
mod stack;

pub use error::StackError;
pub use stack::Stack;
