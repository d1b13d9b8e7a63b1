//! composegen CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Configuration error
//! - 3: Validation failure

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Cli, Commands};
use composegen_core::GenerateError;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const CONFIG_ERROR: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive("composegen=debug".parse().unwrap())
    } else if cli.quiet {
        EnvFilter::from_default_env().add_directive("composegen=error".parse().unwrap())
    } else {
        EnvFilter::from_default_env().add_directive("composegen=info".parse().unwrap())
    };

    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(categorize_error(&e))
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    match e.downcast_ref::<GenerateError>() {
        Some(
            GenerateError::MissingTemplates
            | GenerateError::TemplatesConflict
            | GenerateError::InvalidRulePattern { .. }
            | GenerateError::InvalidMask { .. }
            | GenerateError::UnsupportedEncoding(_),
        ) => ExitCodes::CONFIG_ERROR,
        Some(
            GenerateError::TemplateNotFound(_) | GenerateError::MalformedTemplate { .. },
        ) => ExitCodes::VALIDATION_FAILURE,
        _ => ExitCodes::GENERAL_ERROR,
    }
}
