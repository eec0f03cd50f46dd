//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Resolve OpenShift deployer properties into a deployment configuration.
#[derive(Parser, Debug)]
#[command(name = "deployer-props")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a resolver settings YAML file.
    #[arg(short, long, global = true, env = "DEPLOYER_PROPS_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit log lines as JSON.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the property maps come from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Global property file (`.properties`, `.yaml` or `.yml`).
    pub properties: PathBuf,

    /// Per-deployment override file.
    #[arg(short = 'O', long)]
    pub overrides: Option<PathBuf>,

    /// Also read `SPRING_CLOUD_DEPLOYER_*` environment variables as overrides.
    #[arg(long)]
    pub env: bool,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve properties and print the resulting configuration.
    Resolve {
        /// Property sources.
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Check properties and list every error.
    Validate {
        /// Property sources.
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the resources that would be created.
    Directives {
        /// Property sources.
        #[command(flatten)]
        source: SourceArgs,

        /// Application identifier.
        #[arg(long)]
        app_id: String,

        /// Target namespace.
        #[arg(short, long, default_value = "default")]
        namespace: String,
    },

    /// Print the fingerprint of the resolved configuration.
    Fingerprint {
        /// Property sources.
        #[command(flatten)]
        source: SourceArgs,
    },

    /// List the recognized property keys.
    Keys,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}
