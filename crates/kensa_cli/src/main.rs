//! kensa CLI
//!
//! Verifies installed WordPress plugins against published checksums.

mod cli;
mod commands;
mod output;
mod utils;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::plugins::{PluginsArgs, run_plugins};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(verified) => {
            if verified {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Commands::Plugins {
            plugins,
            all,
            strict,
            plugin_version,
            insecure,
        } => run_plugins(
            cli,
            PluginsArgs {
                plugins,
                all: *all,
                strict: *strict,
                version: plugin_version.as_deref(),
                insecure: *insecure,
            },
        ),
    }
}
