//! Validate command - check configuration and templates without writing.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use composegen_core::{GenerateError, Generator, GeneratorConfig, SERVICES_KEY};

#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the composegen configuration file
    #[arg(short, long, default_value = "composegen.yml")]
    config: PathBuf,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("validating configuration {:?}", args.config);

    let config = GeneratorConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config {:?}", args.config))?;

    // Construction exercises every fail-fast check: template source,
    // encoding, mask and rule pattern compilation, template parsing.
    let generator = Generator::new(&config)?;
    println!("✅ Configuration is valid");

    if !generator.rules().has_catch_all() {
        println!("⚠️  No catch-all rule: unmatched services will be excluded");
    }

    let mut failures = Vec::new();
    for template in generator.templates().list() {
        let sample_count = template
            .document
            .get(SERVICES_KEY)
            .and_then(|services| services.as_mapping())
            .map(|services| services.len());

        match sample_count {
            Some(1) => println!("✅ Template `{}` has one sample entry", template.name),
            Some(n) => {
                println!(
                    "❌ Template `{}` has {} entries under `{}`, expected exactly one",
                    template.name, n, SERVICES_KEY
                );
                failures.push(GenerateError::MalformedTemplate {
                    template: template.name.clone(),
                    message: format!(
                        "expected exactly one sample entry under `{SERVICES_KEY}`, found {n}"
                    ),
                });
            }
            None => {
                println!(
                    "❌ Template `{}` is missing its `{}` mapping",
                    template.name, SERVICES_KEY
                );
                failures.push(GenerateError::MalformedTemplate {
                    template: template.name.clone(),
                    message: format!("missing `{SERVICES_KEY}` mapping"),
                });
            }
        }
    }

    if generator.templates().is_empty() {
        println!("⚠️  No templates loaded");
    }

    match failures.into_iter().next() {
        Some(failure) => Err(failure.into()),
        None => Ok(()),
    }
}
