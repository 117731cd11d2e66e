//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// kensa - Verify installed plugins against published checksums
#[derive(Parser)]
#[command(name = "kensa")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Plugins directory (overrides the configuration file)
    #[arg(long, global = true, value_name = "DIR")]
    pub plugins_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify plugin files against published checksums and print the result as JSON
    #[command(disable_version_flag = true)]
    Plugins {
        /// One or more plugins to verify
        plugins: Vec<String>,

        /// Verify all installed plugins
        #[arg(long)]
        all: bool,

        /// Also report "soft changes" such as readme.txt edits
        #[arg(long)]
        strict: bool,

        /// Verify checksums against a specific plugin version
        #[arg(long = "version", value_name = "VERSION")]
        plugin_version: Option<String>,

        /// Retry downloads without certificate validation if the TLS handshake fails
        #[arg(long)]
        insecure: bool,
    },
}
