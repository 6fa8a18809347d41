use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info, instrument};

use crate::error::ArtifactError;
use crate::path::normalize;
use crate::substitute::Substitutions;
use crate::walk::walk_tree;

const COPY_BUFFER: usize = 64 * 1024;

/// One file written by [`ArtifactTemplater::render`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedFile {
  /// Path relative to the destination root.
  pub path: PathBuf,
  pub templated: bool,
  pub replacements: usize,
}

/// Summary of a render, one entry per file in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderReport {
  pub files: Vec<RenderedFile>,
}

impl RenderReport {
  pub fn get(&self, path: impl AsRef<Path>) -> Option<&RenderedFile> {
    let path = path.as_ref();
    self.files.iter().find(|f| f.path == path)
  }

  pub fn templated_files(&self) -> usize {
    self.files.iter().filter(|f| f.templated).count()
  }

  pub fn total_replacements(&self) -> usize {
    self.files.iter().map(|f| f.replacements).sum()
  }
}

/// Mirrors a source tree into a destination, substituting placeholders in
/// templated files.
///
/// A file is templated when its file name matches one of the configured
/// glob patterns (`app.js`, `*.html`, ...).
#[derive(Debug, Clone)]
pub struct ArtifactTemplater {
  patterns: Vec<String>,
  matcher: GlobSet,
}

impl ArtifactTemplater {
  pub fn new<I, S>(patterns: I) -> Result<Self, ArtifactError>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut builder = GlobSetBuilder::new();
    let mut kept = Vec::new();
    for pattern in patterns {
      let pattern = pattern.as_ref();
      let glob = Glob::new(pattern).map_err(|source| ArtifactError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
      })?;
      builder.add(glob);
      kept.push(pattern.to_string());
    }
    let matcher = builder.build().map_err(|source| ArtifactError::InvalidPattern {
      pattern: kept.join(", "),
      source,
    })?;

    Ok(Self {
      patterns: kept,
      matcher,
    })
  }

  pub fn patterns(&self) -> &[String] {
    &self.patterns
  }

  /// Whether the file at `path` is rendered rather than copied.
  pub fn is_templated(&self, path: &Path) -> bool {
    path
      .file_name()
      .is_some_and(|name| self.matcher.is_match(name))
  }

  /// Renders `source` into `dest`.
  ///
  /// Running the same render twice yields the same destination tree.
  #[instrument(
    name = "artifact_render",
    skip(self, substitutions),
    fields(source = %source.display(), dest = %dest.display())
  )]
  pub async fn render(
    &self,
    source: &Path,
    dest: &Path,
    substitutions: &Substitutions,
  ) -> Result<RenderReport, ArtifactError> {
    match fs::metadata(source).await {
      Ok(meta) if meta.is_dir() => {}
      Ok(_) => {
        return Err(ArtifactError::SourceNotFound {
          path: source.to_path_buf(),
        });
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(ArtifactError::SourceNotFound {
          path: source.to_path_buf(),
        });
      }
      Err(e) => return Err(ArtifactError::io(source, e)),
    }
    ensure_not_nested(source, dest).await?;

    let entries = walk_tree(source).await?;
    fs::create_dir_all(dest)
      .await
      .map_err(|e| ArtifactError::io(dest, e))?;

    let mut report = RenderReport::default();
    for entry in entries {
      let from = source.join(&entry.relative);
      let to = dest.join(&entry.relative);

      if entry.is_dir {
        fs::create_dir_all(&to)
          .await
          .map_err(|e| ArtifactError::io(&to, e))?;
        continue;
      }

      let templated = self.is_templated(&entry.relative);
      let replacements = if templated {
        render_file(&from, &to, substitutions).await?
      } else {
        copy_file(&from, &to).await?;
        0
      };

      debug!(
        path = %entry.relative.display(),
        templated,
        replacements,
        "artifact_file_written"
      );
      report.files.push(RenderedFile {
        path: entry.relative,
        templated,
        replacements,
      });
    }

    info!(
      files = report.files.len(),
      templated = report.templated_files(),
      replacements = report.total_replacements(),
      "artifact_rendered"
    );
    Ok(report)
  }
}

async fn ensure_not_nested(source: &Path, dest: &Path) -> Result<(), ArtifactError> {
  if normalize(dest).await.starts_with(normalize(source).await) {
    return Err(ArtifactError::DestinationInsideSource {
      source_dir: source.to_path_buf(),
      dest_dir: dest.to_path_buf(),
    });
  }
  Ok(())
}

async fn render_file(
  from: &Path,
  to: &Path,
  substitutions: &Substitutions,
) -> Result<usize, ArtifactError> {
  let text = fs::read_to_string(from)
    .await
    .map_err(|e| ArtifactError::io(from, e))?;
  let (rendered, count) = substitutions.apply(&text);
  write_atomic(to, rendered.as_bytes()).await?;
  Ok(count)
}

/// Byte-for-byte copy; errors name the side that failed.
async fn copy_file(from: &Path, to: &Path) -> Result<(), ArtifactError> {
  let mut reader = File::open(from)
    .await
    .map_err(|e| ArtifactError::io(from, e))?;
  let mut writer = File::create(to)
    .await
    .map_err(|e| ArtifactError::io(to, e))?;

  let mut buf = vec![0u8; COPY_BUFFER];
  loop {
    let n = reader
      .read(&mut buf)
      .await
      .map_err(|e| ArtifactError::io(from, e))?;
    if n == 0 {
      break;
    }
    writer
      .write_all(&buf[..n])
      .await
      .map_err(|e| ArtifactError::io(to, e))?;
  }
  writer.flush().await.map_err(|e| ArtifactError::io(to, e))
}

/// Writes through a temporary sibling and renames it into place.
async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), ArtifactError> {
  let tmp = temp_sibling(path);
  if let Err(e) = write_then_rename(&tmp, path, contents).await {
    let _ = fs::remove_file(&tmp).await;
    return Err(ArtifactError::io(path, e));
  }
  Ok(())
}

async fn write_then_rename(tmp: &Path, path: &Path, contents: &[u8]) -> io::Result<()> {
  let mut file = File::create(tmp).await?;
  file.write_all(contents).await?;
  file.sync_all().await?;
  drop(file);
  fs::rename(tmp, path).await
}

fn temp_sibling(path: &Path) -> PathBuf {
  let name = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default();
  path.with_file_name(format!(".{}.cairn-tmp", name))
}
