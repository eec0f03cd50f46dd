//! deployer-props CLI entrypoint.
//!
//! Loads property files, resolves them and prints the result.

use std::process::ExitCode;

use openshift_deployer_props::cli::{Cli, Commands, OutputFormatter, SourceArgs};
use openshift_deployer_props::directives::DeploymentDirectives;
use openshift_deployer_props::error::{DeployerError, Result};
use openshift_deployer_props::properties::{PropertiesLoader, PropertyMap};
use openshift_deployer_props::resolver::{
    ConfigFingerprint, DEFAULT_APPLICATION_PORT, DeploymentPropertyResolver,
    ResolvedDeploymentConfig, ResolverSettings,
};

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.log_json);

    let formatter = OutputFormatter::new(cli.output);

    match run(cli, &formatter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(DeployerError::Resolution(error)) => {
            println!("{}", formatter.format_errors(&error));
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Dispatches the selected command.
fn run(cli: Cli, formatter: &OutputFormatter) -> Result<()> {
    let settings = match &cli.settings {
        Some(path) => ResolverSettings::load_file(path)?,
        None => ResolverSettings::default(),
    };
    let resolver = DeploymentPropertyResolver::new(settings);

    match cli.command {
        Commands::Resolve { source } => {
            let config = resolve(&resolver, &source)?;
            println!("{}", formatter.format_config(&config));
        }
        Commands::Validate { source } => {
            resolve(&resolver, &source)?;
            eprintln!("All properties are valid.");
        }
        Commands::Directives {
            source,
            app_id,
            namespace,
        } => {
            let config = resolve(&resolver, &source)?;
            let application_port = resolver
                .settings()
                .reserved_application_port
                .unwrap_or(DEFAULT_APPLICATION_PORT);
            let directives =
                DeploymentDirectives::from_config(&config, &app_id, &namespace, application_port);
            println!("{}", formatter.format_directives(&directives));
        }
        Commands::Fingerprint { source } => {
            let config = resolve(&resolver, &source)?;
            println!("{}", formatter.format_fingerprint(&ConfigFingerprint::compute(&config)));
        }
        Commands::Keys => println!("{}", formatter.format_keys()),
    }

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Loads the property sources and resolves them.
fn resolve(
    resolver: &DeploymentPropertyResolver,
    source: &SourceArgs,
) -> Result<ResolvedDeploymentConfig> {
    let (raw, overrides) = load_sources(source)?;
    info!(
        "Resolving {} properties with {} overrides",
        raw.len(),
        overrides.len()
    );
    Ok(resolver.resolve(&raw, &overrides)?)
}

/// Loads the global property map and the merged override map.
fn load_sources(source: &SourceArgs) -> Result<(PropertyMap, PropertyMap)> {
    let loader = PropertiesLoader::new();

    let raw = loader.load_file(&source.properties)?;

    let mut overrides = match &source.overrides {
        Some(path) => loader.load_file(path)?,
        None => PropertyMap::new(),
    };

    if source.env {
        let env = PropertiesLoader::from_env();
        debug!("Applying {} overrides from environment", env.len());
        overrides.extend(env);
    }

    Ok((raw, overrides))
}
