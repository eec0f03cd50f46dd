//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::directives::{DeploymentDirectives, ResourceDirective, ServiceType};
use crate::error::ResolutionError;
use crate::properties::PropertyKey;
use crate::resolver::{ConfigFingerprint, ResolvedDeploymentConfig};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Property key row for table display.
#[derive(Tabled)]
struct KeyRow {
    #[tabled(rename = "Key")]
    name: String,
    #[tabled(rename = "Shape")]
    shape: String,
    #[tabled(rename = "Default")]
    default: String,
    #[tabled(rename = "Alias")]
    alias: String,
}

/// Error row for table display.
#[derive(Tabled)]
struct ErrorRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Problem")]
    message: String,
}

/// Directive row for table display.
#[derive(Tabled)]
struct DirectiveRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Details")]
    details: String,
    #[tabled(rename = "After")]
    after: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

#[derive(Serialize)]
struct ErrorJson {
    kind: String,
    key: String,
    value: String,
    message: String,
}

#[derive(Serialize)]
struct KeyJson {
    name: &'static str,
    shape: String,
    default: Option<&'static str>,
    alias: Option<&'static str>,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a resolved configuration.
    #[must_use]
    pub fn format_config(&self, config: &ResolvedDeploymentConfig) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(config).unwrap_or_default(),
            OutputFormat::Text => Self::format_config_text(config),
        }
    }

    fn format_config_text(config: &ResolvedDeploymentConfig) -> String {
        let mut output = String::new();
        let none = || "-".dimmed().to_string();
        let opt = |v: &Option<String>| v.clone().unwrap_or_else(none);

        let _ = writeln!(output, "\n{} Resolved deployment configuration\n", "✓".green());
        let _ = writeln!(output, "   Force build:      {}", config.force_build);
        let _ = writeln!(output, "   Service account:  {}", opt(&config.service_account));
        let _ = writeln!(output, "   Image tag:        {}", opt(&config.image_tag));
        let _ = writeln!(
            output,
            "   Dockerfile:       {}",
            config
                .dockerfile_override
                .as_ref()
                .map_or_else(none, |d| format!("inline ({} lines)", d.lines().count()))
        );
        let _ = writeln!(output, "   Exposure:         {}", config.exposure);
        let _ = writeln!(output, "   Entry point:      {}", config.entry_point_style);
        let _ = writeln!(
            output,
            "   Command:          {}",
            config
                .container_command
                .as_ref()
                .map_or_else(none, |tokens| format!("{tokens:?}"))
        );
        let _ = writeln!(
            output,
            "   Container ports:  {}",
            if config.container_ports.is_empty() {
                none()
            } else {
                config
                    .container_ports
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        );

        Self::write_pairs(&mut output, "Node selector", config.node_selector.iter().map(|(k, v)| (k, v)));
        Self::write_pairs(&mut output, "Labels", config.labels.iter());
        Self::write_pairs(&mut output, "Environment", config.environment_variables.iter().map(|(k, v)| (k, v)));

        if !config.volume_mounts.is_empty() {
            output.push_str("\n   Volume mounts:\n");
            for mount in &config.volume_mounts {
                let _ = writeln!(output, "     - {mount}");
            }
        }

        let _ = write!(
            output,
            "\n   Fingerprint: {}\n",
            ConfigFingerprint::compute(config).short()
        );

        output
    }

    fn write_pairs<'a>(
        output: &mut String,
        title: &str,
        pairs: impl Iterator<Item = (&'a String, &'a String)>,
    ) {
        let mut pairs = pairs.peekable();
        if pairs.peek().is_none() {
            return;
        }
        let _ = writeln!(output, "\n   {title}:");
        for (key, value) in pairs {
            let _ = writeln!(output, "     {key} = {value}");
        }
    }

    /// Formats a resolution failure.
    #[must_use]
    pub fn format_errors(&self, error: &ResolutionError) -> String {
        match self.format {
            OutputFormat::Json => {
                let errors: Vec<ErrorJson> = error
                    .errors()
                    .iter()
                    .map(|e| ErrorJson {
                        kind: e.kind().to_string(),
                        key: e.key().to_string(),
                        value: e.value().to_string(),
                        message: e.to_string(),
                    })
                    .collect();
                serde_json::to_string_pretty(&errors).unwrap_or_default()
            }
            OutputFormat::Text => {
                let rows: Vec<ErrorRow> = error
                    .errors()
                    .iter()
                    .map(|e| ErrorRow {
                        kind: e.kind().to_string(),
                        key: Self::short_key(e.key()),
                        value: Self::truncate(e.value(), 30),
                        message: Self::truncate(&e.to_string(), 60),
                    })
                    .collect();

                let mut output = format!(
                    "\n{} {} invalid propert{}\n\n",
                    "✗".red(),
                    error.len(),
                    if error.len() == 1 { "y" } else { "ies" }
                );
                output.push_str(&Table::new(rows).to_string());
                output.push('\n');
                output
            }
        }
    }

    /// Formats the recognized key table.
    #[must_use]
    pub fn format_keys(&self) -> String {
        match self.format {
            OutputFormat::Json => {
                let keys: Vec<KeyJson> = PropertyKey::all()
                    .iter()
                    .map(|k| KeyJson {
                        name: k.name(),
                        shape: k.shape().to_string(),
                        default: k.default_value(),
                        alias: k.alias(),
                    })
                    .collect();
                serde_json::to_string_pretty(&keys).unwrap_or_default()
            }
            OutputFormat::Text => {
                let rows: Vec<KeyRow> = PropertyKey::all()
                    .iter()
                    .map(|k| KeyRow {
                        name: k.name().to_string(),
                        shape: k.shape().to_string(),
                        default: k.default_value().unwrap_or("").to_string(),
                        alias: k.alias().unwrap_or("").to_string(),
                    })
                    .collect();
                let mut output = Table::new(rows).to_string();
                output.push('\n');
                output
            }
        }
    }

    /// Formats a directive list.
    #[must_use]
    pub fn format_directives(&self, directives: &DeploymentDirectives) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(directives).unwrap_or_default(),
            OutputFormat::Text => {
                let rows: Vec<DirectiveRow> = directives
                    .directives
                    .iter()
                    .enumerate()
                    .map(|(i, d)| DirectiveRow {
                        index: i + 1,
                        kind: d.directive.kind().to_string(),
                        details: Self::directive_details(&d.directive),
                        after: d
                            .dependencies
                            .iter()
                            .map(|dep| (dep + 1).to_string())
                            .collect::<Vec<_>>()
                            .join(","),
                        reason: Self::truncate(&d.reason, 40),
                    })
                    .collect();

                let mut output = format!(
                    "\n📋 Resources for {} ({})\n\n",
                    directives.app_id.bold(),
                    &directives.fingerprint[..8]
                );
                output.push_str(&Table::new(rows).to_string());
                output.push('\n');
                output
            }
        }
    }

    /// Formats a fingerprint.
    #[must_use]
    pub fn format_fingerprint(&self, fingerprint: &ConfigFingerprint) -> String {
        match self.format {
            OutputFormat::Json => serde_json::json!({ "fingerprint": fingerprint.as_str() }).to_string(),
            OutputFormat::Text => fingerprint.to_string(),
        }
    }

    fn directive_details(directive: &ResourceDirective) -> String {
        match directive {
            ResourceDirective::Build { dockerfile, forced } => match (dockerfile, forced) {
                (Some(_), true) => String::from("inline Dockerfile, forced"),
                (Some(_), false) => String::from("inline Dockerfile"),
                (None, _) => String::from("forced"),
            },
            ResourceDirective::DeploymentConfig {
                image_tag,
                entry_point_style,
                ..
            } => format!("tag {image_tag}, {entry_point_style}"),
            ResourceDirective::Service { ports, service_type } => {
                let ports = ports
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                match service_type {
                    ServiceType::ClusterIp => format!("ports {ports}"),
                    ServiceType::NodePort { port: Some(p) } => format!("ports {ports}, nodePort {p}"),
                    ServiceType::NodePort { port: None } => format!("ports {ports}, nodePort auto"),
                }
            }
            ResourceDirective::Route { host } => {
                host.clone().unwrap_or_else(|| String::from("generated host"))
            }
        }
    }

    /// Drops the shared `spring.cloud.deployer.` prefix for display.
    fn short_key(key: &str) -> String {
        key.strip_prefix("spring.cloud.deployer.").unwrap_or(key).to_string()
    }

    /// Truncates a string to a maximum length.
    fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
            format!("{truncated}...")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PropertyError;

    #[test]
    fn test_truncate() {
        assert_eq!(OutputFormatter::truncate("short", 10), "short");
        assert_eq!(OutputFormatter::truncate("a much longer string", 10), "a much ...");
    }

    #[test]
    fn test_short_key() {
        assert_eq!(
            OutputFormatter::short_key("spring.cloud.deployer.openshift.image.tag"),
            "openshift.image.tag"
        );
        assert_eq!(OutputFormatter::short_key("other"), "other");
    }

    #[test]
    fn test_errors_json() {
        let error = ResolutionError::from_errors(vec![PropertyError::out_of_range(
            "spring.cloud.deployer.openshift.containerPorts",
            "0",
            1,
            65535,
        )])
        .unwrap();

        let json = OutputFormatter::new(OutputFormat::Json).format_errors(&error);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed[0]["kind"], "OutOfRange");
        assert_eq!(parsed[0]["value"], "0");
    }

    #[test]
    fn test_keys_json_lists_every_key() {
        let json = OutputFormatter::new(OutputFormat::Json).format_keys();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), PropertyKey::all().len());
    }
}
