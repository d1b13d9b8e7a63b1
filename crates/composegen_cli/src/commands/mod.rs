//! CLI command definitions.

use clap::{Parser, Subcommand};

pub mod generate;
pub mod validate;

/// composegen - per-service compose manifests from build artifacts
#[derive(Parser)]
#[command(name = "composegen")]
#[command(version, about = "composegen - per-service compose manifests from build artifacts")]
#[command(long_about = r#"
composegen derives one compose manifest per service discovered among a
build's output artifacts. Prioritized regex rules assign each service a
template; the template's sample entry is re-keyed to the service's name.

WORKFLOWS:
  generate  → Discover services under a dist directory and write manifests
  validate  → Check configuration, rules, and templates without writing

EXIT CODES:
  0 - Success
  1 - General error
  2 - Configuration error
  3 - Validation failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate per-service manifests from a build's artifacts
    Generate(generate::GenerateArgs),

    /// Validate the configuration and templates without writing anything
    Validate(validate::ValidateArgs),
}
