//! Subcommand implementations

pub mod plugins;
