use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::ArtifactError;

/// A file or directory found under a walked root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
  /// Path relative to the walked root.
  pub relative: PathBuf,
  pub is_dir: bool,
}

/// Lists every entry under `root`, depth-first, siblings sorted by name.
///
/// A directory always precedes its contents. Symlinks are followed.
pub async fn walk_tree(root: &Path) -> Result<Vec<TreeEntry>, ArtifactError> {
  let mut entries = Vec::new();
  walk_dir(root, Path::new(""), &mut entries).await?;
  Ok(entries)
}

async fn walk_dir(
  root: &Path,
  relative: &Path,
  out: &mut Vec<TreeEntry>,
) -> Result<(), ArtifactError> {
  let dir = root.join(relative);
  let mut reader = fs::read_dir(&dir)
    .await
    .map_err(|e| ArtifactError::io(&dir, e))?;

  let mut children: Vec<(OsString, bool)> = Vec::new();
  while let Some(entry) = reader
    .next_entry()
    .await
    .map_err(|e| ArtifactError::io(&dir, e))?
  {
    let path = entry.path();
    let metadata = fs::metadata(&path)
      .await
      .map_err(|e| ArtifactError::io(&path, e))?;
    children.push((entry.file_name(), metadata.is_dir()));
  }
  children.sort();

  for (name, is_dir) in children {
    let child = relative.join(&name);
    out.push(TreeEntry {
      relative: child.clone(),
      is_dir,
    });
    if is_dir {
      Box::pin(walk_dir(root, &child, out)).await?;
    }
  }
  Ok(())
}
