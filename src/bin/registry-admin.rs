//! Registry Admin CLI Binary
//!
//! Command-line interface for catalog configuration and registry role administration.

use clap::Parser;
use registry_admin::cli::{Cli, RunContext};
use registry_admin::logging::{init_logging, LoggingConfig};
use registry_admin::settings::{Settings, SettingsLoader};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", registry_admin::cli::map_error(&e));
            process::exit(1);
        }
    };

    // Initialize logging early
    let logging_config = build_logging_config(&cli, &settings);
    if let Err(e) = init_logging(&logging_config) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("registry-admin starting");

    let context = match RunContext::new(settings) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing client: {}", e);
            eprintln!("{}", registry_admin::cli::map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", registry_admin::cli::map_error(&e));
            process::exit(1);
        }
    }
}

fn load_settings(cli: &Cli) -> registry_admin::Result<Settings> {
    match cli.settings {
        Some(ref path) => SettingsLoader::load_from_file(path),
        None => SettingsLoader::load(),
    }
}

/// Build logging configuration from settings and CLI flags.
/// Precedence: CLI flags override settings override defaults.
fn build_logging_config(cli: &Cli, settings: &Settings) -> LoggingConfig {
    let mut config = settings.logging.clone();
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    config
}
