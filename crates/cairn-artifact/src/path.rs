use std::path::{Path, PathBuf};

use tokio::fs;

/// Canonical form of `path`, which may not exist yet: the deepest existing
/// ancestor is canonicalized and the missing components are appended.
pub(crate) async fn normalize(path: &Path) -> PathBuf {
  let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
  let mut existing = absolute.as_path();
  let mut missing = Vec::new();

  loop {
    if let Ok(canonical) = fs::canonicalize(existing).await {
      return missing
        .iter()
        .rev()
        .fold(canonical, |acc: PathBuf, part| acc.join(part));
    }
    match (existing.parent(), existing.file_name()) {
      (Some(parent), Some(name)) => {
        missing.push(name.to_os_string());
        existing = parent;
      }
      _ => break,
    }
  }

  absolute
}

/// Whether the two directories are the same or one contains the other.
pub async fn paths_overlap(a: &Path, b: &Path) -> bool {
  let a = normalize(a).await;
  let b = normalize(b).await;
  a.starts_with(&b) || b.starts_with(&a)
}
