//! Cairn Artifact
//!
//! This crate produces and stores the deployable artifact of a stack (the
//! frontend bundle).
//!
//! The [`ArtifactTemplater`] mirrors a source tree into a build directory.
//! Files whose name matches a configured glob set are rendered by literal
//! placeholder substitution ([`Substitutions`]); every other file is copied
//! byte-for-byte. Rendered files are written atomically: the content is
//! buffered in memory, written to a temporary sibling and renamed over the
//! destination, so a failure never leaves a half-written file behind.
//!
//! The [`Store`] trait is the storage backend artifacts are published to.
//! [`FsStore`] keeps them on the local filesystem; other backends (object
//! storage buckets, ...) implement the same trait.

mod error;
mod fs;
mod path;
mod store;
mod substitute;
mod templater;
mod walk;

pub use error::ArtifactError;
pub use fs::FsStore;
pub use path::paths_overlap;
pub use store::{ByteStream, Store, StoreError, read_all};
pub use substitute::Substitutions;
pub use templater::{ArtifactTemplater, RenderReport, RenderedFile};
pub use walk::{TreeEntry, walk_tree};
