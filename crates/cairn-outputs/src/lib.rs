//! Cairn Outputs
//!
//! The [`OutputRegistry`] collects every output produced while a stack is
//! built, keyed by `(node name, output name)`. Entries are write-once: a
//! second registration of the same key is an error, and reading a key that
//! was never registered is an error rather than a default.
//!
//! A registry lives for exactly one build invocation.

mod error;
mod registry;

pub use error::OutputError;
pub use registry::{OutputRegistry, OutputValue};
