//! Process-wide resolver settings.
//!
//! Values the resolver would otherwise read from global state are passed in
//! explicitly through [`ResolverSettings`].

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{DeployerError, Result, SourceError};

/// Port the deployer always exposes for the application itself.
pub const DEFAULT_APPLICATION_PORT: u16 = 8080;

/// Explicit defaults for one resolver instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverSettings {
    /// Routing subdomain used to build the default route host.
    pub default_routing_subdomain: Option<String>,
    /// Port removed from the extra container ports; `None` keeps every port.
    pub reserved_application_port: Option<u16>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            default_routing_subdomain: None,
            reserved_application_port: Some(DEFAULT_APPLICATION_PORT),
        }
    }
}

impl ResolverSettings {
    /// Creates settings with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default routing subdomain.
    #[must_use]
    pub fn with_routing_subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.default_routing_subdomain = Some(subdomain.into());
        self
    }

    /// Sets or clears the reserved application port.
    #[must_use]
    pub fn with_reserved_port(mut self, port: Option<u16>) -> Self {
        self.reserved_application_port = port;
        self
    }

    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading resolver settings from: {}", path.display());

        if !path.exists() {
            return Err(DeployerError::Source(SourceError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse_yaml(&content).map_err(|e| match e {
            DeployerError::Source(SourceError::ParseError { message, .. }) => {
                DeployerError::Source(SourceError::ParseError {
                    message,
                    location: Some(path.display().to_string()),
                })
            }
            other => other,
        })
    }

    /// Parses settings from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            DeployerError::Source(SourceError::ParseError {
                message: format!("YAML parse error: {e}"),
                location: None,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ResolverSettings::default();
        assert_eq!(settings.default_routing_subdomain, None);
        assert_eq!(settings.reserved_application_port, Some(8080));
    }

    #[test]
    fn test_parse_yaml_partial() {
        let settings = ResolverSettings::parse_yaml("defaultRoutingSubdomain: apps.example.com\n").unwrap();
        assert_eq!(settings.default_routing_subdomain.as_deref(), Some("apps.example.com"));
        assert_eq!(settings.reserved_application_port, Some(8080));
    }

    #[test]
    fn test_parse_yaml_clears_reserved_port() {
        let settings = ResolverSettings::parse_yaml("reservedApplicationPort: null\n").unwrap();
        assert_eq!(settings.reserved_application_port, None);
    }

    #[test]
    fn test_builder() {
        let settings = ResolverSettings::new()
            .with_routing_subdomain("apps.local")
            .with_reserved_port(None);
        assert_eq!(settings.default_routing_subdomain.as_deref(), Some("apps.local"));
        assert_eq!(settings.reserved_application_port, None);
    }
}
