//! Plugins command implementation

use std::path::Path;

use kensa_core::{KensaConfig, PackageLookup, PathResolver, VerificationSession, VerifyOptions};
use kensa_registry::{ChecksumFetcher, PluginDirectory};
use miette::{IntoDiagnostic, Result};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::output::output_json;
use crate::utils::create_tokio_runtime;

const USAGE_ERROR: &str = "You need to specify either one or more plugin slugs to check or use the --all flag to check all plugins.";

pub struct PluginsArgs<'a> {
    pub plugins: &'a [String],
    pub all: bool,
    pub strict: bool,
    pub version: Option<&'a str>,
    pub insecure: bool,
}

/// Verifies the selected plugins and prints one JSON report per plugin.
///
/// Returns whether every plugin verified.
pub fn run_plugins(cli: &Cli, args: PluginsArgs<'_>) -> Result<bool> {
    if args.plugins.is_empty() && !args.all {
        return Err(miette::miette!(USAGE_ERROR));
    }

    let config = load_config(cli.config.as_deref())?;
    let plugins_root = cli
        .plugins_dir
        .clone()
        .unwrap_or_else(|| config.plugins_root());
    debug!("Plugins directory: {}", plugins_root.display());

    let registry = PluginDirectory::new(&plugins_root);
    let lookup = PackageLookup::from_registry(&registry).into_diagnostic()?;

    let packages = if args.all {
        lookup.all()
    } else {
        lookup.resolve(args.plugins)
    };

    if packages.is_empty() && !args.all {
        return Err(miette::miette!(USAGE_ERROR));
    }

    let fetcher = ChecksumFetcher::builder()
        .url_template(&config.checksum_url)
        .timeout(config.timeout_duration())
        .insecure(args.insecure)
        .build()
        .into_diagnostic()?;

    let options = VerifyOptions {
        strict: args.strict,
        version: args.version.map(str::to_string),
        filter: config.ignore_filter().into_diagnostic()?,
    };

    let session = VerificationSession::new(
        &lookup,
        fetcher,
        PathResolver::new(&plugins_root),
        options,
    );

    let runtime = create_tokio_runtime()?;
    let outcome = runtime
        .block_on(session.run(&packages))
        .into_diagnostic()?;

    output_json(&outcome.reports)?;
    Ok(outcome.succeeded)
}

pub fn load_config(path: Option<&Path>) -> Result<KensaConfig> {
    if let Some(path) = path {
        return KensaConfig::from_file(path).into_diagnostic();
    }

    if let Some(path) = KensaConfig::discover(".") {
        info!("Using config: {}", path.display());
        return KensaConfig::from_file(&path).into_diagnostic();
    }

    debug!("No config file found, using defaults");
    Ok(KensaConfig::new())
}
