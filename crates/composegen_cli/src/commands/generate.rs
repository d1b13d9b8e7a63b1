//! Generate command - run one manifest generation pass.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;
use walkdir::WalkDir;

use composegen_core::{Generator, GeneratorConfig, ManifestWriter};

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to the composegen configuration file
    #[arg(short, long, default_value = "composegen.yml")]
    config: PathBuf,

    /// Build output directory to scan for service artifacts
    #[arg(short, long)]
    dist: Option<PathBuf>,

    /// Explicit artifact paths (relative, '/'-separated); bypasses --dist
    #[arg(value_name = "ARTIFACT")]
    artifacts: Vec<String>,

    /// Synthesize manifests without writing them
    #[arg(long)]
    dry_run: bool,

    /// Print the completion report as JSON
    #[arg(long)]
    json: bool,
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    let config = GeneratorConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config {:?}", args.config))?;
    let generator = Generator::new(&config)?;

    let artifacts = if !args.artifacts.is_empty() {
        args.artifacts
    } else {
        let dist = args
            .dist
            .as_deref()
            .context("provide --dist or explicit artifact paths")?;
        collect_artifacts(dist)?
    };

    info!("running pass over {} artifact(s)", artifacts.len());
    let report = generator.run(&artifacts)?;

    if !args.dry_run {
        ManifestWriter::write_all(&report)?;
    }

    if args.json {
        let json = serde_json::json!({
            "output_dir": report.output_dir,
            "services": report.service_names(),
            "output_paths": report.output_paths(),
            "dry_run": args.dry_run,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!(
            "Generated {} manifest(s) in {}{}",
            report.len(),
            report.output_dir.display(),
            if args.dry_run { " (dry run)" } else { "" }
        );
        for manifest in &report.manifests {
            println!("  {} -> {}", manifest.service, manifest.output_path.display());
        }
    }

    Ok(())
}

/// Collect artifact paths relative to `dist`, '/'-separated regardless of
/// platform, in a stable walk order.
fn collect_artifacts(dist: &Path) -> Result<Vec<String>> {
    let mut artifacts = Vec::new();
    for entry in WalkDir::new(dist)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.path().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dist)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        artifacts.push(relative);
    }
    Ok(artifacts)
}
