use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cairn_artifact::{ArtifactTemplater, FsStore, Substitutions, paths_overlap};
use cairn_config::StackDef;
use cairn_provider::ProviderRegistry;
use cairn_publish::StorePublisher;
use cairn_stack::Stack;

/// Cairn - build a resource graph in dependency order and ship its frontend
#[derive(Parser)]
#[command(name = "cairn")]
#[command(version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build every node, render the artifact and publish the result
  Build {
    /// Path to the stack file (JSON)
    stack_file: PathBuf,

    /// Override the artifact source directory
    #[arg(long)]
    source: Option<PathBuf>,

    /// Override the artifact destination directory
    #[arg(long)]
    dest: Option<PathBuf>,

    /// Publish the rendered artifact and manifest into this directory
    #[arg(long)]
    publish_dir: Option<PathBuf>,

    /// Build and render, but skip publishing
    #[arg(long)]
    dry_run: bool,
  },

  /// Validate the graph and print the construction order
  Plan {
    /// Path to the stack file (JSON)
    stack_file: PathBuf,
  },

  /// Render an artifact tree without building anything
  Render {
    source: PathBuf,
    dest: PathBuf,

    /// File name pattern of files to template (repeatable)
    #[arg(long = "templated", value_name = "PATTERN")]
    templated: Vec<String>,

    /// Placeholder substitution (repeatable)
    #[arg(long = "set", value_name = "TOKEN=VALUE", value_parser = parse_assignment)]
    set: Vec<(String, String)>,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| "cairn=info".into()),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let rt = tokio::runtime::Runtime::new()?;

  match cli.command {
    Commands::Build {
      stack_file,
      source,
      dest,
      publish_dir,
      dry_run,
    } => rt.block_on(build(stack_file, source, dest, publish_dir, dry_run)),
    Commands::Plan { stack_file } => plan(&stack_file),
    Commands::Render {
      source,
      dest,
      templated,
      set,
    } => rt.block_on(render(source, dest, templated, set)),
  }
}

fn load_stack(path: &Path) -> Result<StackDef> {
  StackDef::load(path).with_context(|| format!("failed to load stack file: {}", path.display()))
}

async fn build(
  stack_file: PathBuf,
  source: Option<PathBuf>,
  dest: Option<PathBuf>,
  publish_dir: Option<PathBuf>,
  dry_run: bool,
) -> Result<()> {
  let mut def = load_stack(&stack_file)?;

  match def.artifact.as_mut() {
    Some(artifact) => {
      if let Some(source) = source {
        artifact.source_dir = source;
      }
      if let Some(dest) = dest {
        artifact.dest_dir = dest;
      }
    }
    None if source.is_some() || dest.is_some() => {
      bail!("stack '{}' has no artifact section", def.name);
    }
    None => {}
  }

  let publish_dir = publish_dir.filter(|_| !dry_run);
  if let (Some(dir), Some(artifact)) = (&publish_dir, &def.artifact)
    && paths_overlap(&artifact.dest_dir, dir).await
  {
    bail!(
      "publish directory {} overlaps artifact destination {}",
      dir.display(),
      artifact.dest_dir.display()
    );
  }

  eprintln!("Loaded stack: {} ({} nodes)", def.name, def.nodes.len());

  let stack = Stack::new(def.name.clone(), ProviderRegistry::with_defaults());
  let outputs = match publish_dir {
    Some(dir) => {
      let location = format!("file://{}", dir.display());
      stack
        .with_publisher(StorePublisher::new(FsStore::new(dir), location))
        .run(&def)
        .await
    }
    None => stack.run(&def).await,
  }
  .with_context(|| format!("failed to build stack '{}'", def.name))?;

  println!("{}", serde_json::to_string_pretty(&outputs)?);

  Ok(())
}

fn plan(stack_file: &Path) -> Result<()> {
  let def = load_stack(stack_file)?;
  let stack = Stack::new(def.name.clone(), ProviderRegistry::with_defaults());
  let graph = stack
    .plan(&def.nodes)
    .with_context(|| format!("invalid stack '{}'", def.name))?;

  let plan = serde_json::json!({
    "stack": def.name,
    "order": graph.topological_order(),
    "waves": graph.waves(),
  });
  println!("{}", serde_json::to_string_pretty(&plan)?);

  Ok(())
}

async fn render(
  source: PathBuf,
  dest: PathBuf,
  templated: Vec<String>,
  set: Vec<(String, String)>,
) -> Result<()> {
  let templater = ArtifactTemplater::new(&templated)?;
  let substitutions = Substitutions::new(set.into_iter().collect::<BTreeMap<_, _>>())?;

  let report = templater
    .render(&source, &dest, &substitutions)
    .await
    .with_context(|| format!("failed to render {}", source.display()))?;

  eprintln!(
    "Rendered {} files ({} templated, {} replacements)",
    report.files.len(),
    report.templated_files(),
    report.total_replacements()
  );
  println!("{}", serde_json::to_string_pretty(&report)?);

  Ok(())
}

fn parse_assignment(value: &str) -> Result<(String, String), String> {
  match value.split_once('=') {
    Some((token, replacement)) if !token.is_empty() => {
      Ok((token.to_string(), replacement.to_string()))
    }
    _ => Err(format!("expected TOKEN=VALUE, got '{}'", value)),
  }
}
