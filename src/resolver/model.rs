//! The resolved, strongly-typed deployment configuration.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Immutable output of one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDeploymentConfig {
    /// Rebuild the image even if a build already exists.
    pub force_build: bool,
    /// Service account the containers run under.
    pub service_account: Option<String>,
    /// Image tag override.
    pub image_tag: Option<String>,
    /// Inline Dockerfile text.
    pub dockerfile_override: Option<String>,
    /// Node selector in declaration order, labels unique.
    pub node_selector: Vec<(String, String)>,
    /// Route hostname override.
    pub route_host: Option<String>,
    /// Volume mounts in declaration order, mount paths unique.
    pub volume_mounts: Vec<VolumeMount>,
    /// Labels added to the deployment.
    pub labels: BTreeMap<String, String>,
    /// How the application is exposed outside the cluster.
    pub exposure: Exposure,
    /// Environment variables in declaration order, names unique.
    pub environment_variables: Vec<(String, String)>,
    /// Container command tokens.
    pub container_command: Option<Vec<String>>,
    /// Extra container ports.
    pub container_ports: BTreeSet<u16>,
    /// How command line arguments reach the container.
    pub entry_point_style: EntryPointStyle,
    /// Routing subdomain used to build a default route host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_subdomain: Option<String>,
}

/// A single volume mount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    /// Name of the volume.
    pub name: String,
    /// Path inside the container.
    pub mount_path: String,
    /// Whether the mount is read-only.
    pub read_only: bool,
}

/// How the application is reachable from outside the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Exposure {
    /// Not exposed.
    #[default]
    None,
    /// Exposed through a route.
    Route {
        /// Hostname override; the default host is derived otherwise.
        host_override: Option<String>,
    },
    /// Exposed through a NodePort service.
    NodePort {
        /// Requested port; the cluster picks one when `None`.
        port: Option<u16>,
    },
}

/// The Docker ENTRYPOINT style of the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPointStyle {
    /// Arguments are passed as an exec array.
    #[default]
    Exec,
    /// Arguments are passed as environment variables for a shell entrypoint.
    Shell,
    /// Arguments are passed as a single JSON application property.
    Boot,
}

impl VolumeMount {
    /// Creates a new volume mount.
    #[must_use]
    pub fn new(name: impl Into<String>, mount_path: impl Into<String>, read_only: bool) -> Self {
        Self {
            name: name.into(),
            mount_path: mount_path.into(),
            read_only,
        }
    }
}

impl Exposure {
    /// Returns true for [`Exposure::Route`].
    #[must_use]
    pub const fn is_route(&self) -> bool {
        matches!(self, Self::Route { .. })
    }

    /// Returns true for [`Exposure::NodePort`].
    #[must_use]
    pub const fn is_node_port(&self) -> bool {
        matches!(self, Self::NodePort { .. })
    }
}

impl ResolvedDeploymentConfig {
    /// Returns the route hostname for an application, if it is exposed
    /// through a route.
    ///
    /// The `route.host` override wins. Otherwise the host is
    /// `{app_id}-{namespace}.{subdomain}` when a routing subdomain is
    /// configured, and `None` lets the cluster generate one.
    #[must_use]
    pub fn route_hostname(&self, app_id: &str, namespace: &str) -> Option<String> {
        let Exposure::Route { host_override } = &self.exposure else {
            return None;
        };

        host_override.clone().or_else(|| {
            self.routing_subdomain
                .as_deref()
                .map(|subdomain| format!("{app_id}-{namespace}.{subdomain}"))
        })
    }

    /// Returns the value of an environment variable.
    #[must_use]
    pub fn env_var(&self, name: &str) -> Option<&str> {
        self.environment_variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true when a new image build is required.
    #[must_use]
    pub const fn requires_build(&self) -> bool {
        self.force_build || self.dockerfile_override.is_some()
    }
}

impl FromStr for EntryPointStyle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("exec") {
            Ok(Self::Exec)
        } else if s.eq_ignore_ascii_case("shell") {
            Ok(Self::Shell)
        } else if s.eq_ignore_ascii_case("boot") {
            Ok(Self::Boot)
        } else {
            Err(())
        }
    }
}

impl fmt::Display for EntryPointStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exec => "exec",
            Self::Shell => "shell",
            Self::Boot => "boot",
        })
    }
}

impl fmt::Display for Exposure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Route { host_override: None } => f.write_str("route"),
            Self::Route { host_override: Some(host) } => write!(f, "route ({host})"),
            Self::NodePort { port: None } => f.write_str("nodePort (auto)"),
            Self::NodePort { port: Some(port) } => write!(f, "nodePort ({port})"),
        }
    }
}

impl fmt::Display for VolumeMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.mount_path)?;
        if self.read_only {
            f.write_str(":ro")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(exposure: Exposure, subdomain: Option<&str>) -> ResolvedDeploymentConfig {
        ResolvedDeploymentConfig {
            force_build: false,
            service_account: None,
            image_tag: None,
            dockerfile_override: None,
            node_selector: vec![],
            route_host: None,
            volume_mounts: vec![],
            labels: BTreeMap::new(),
            exposure,
            environment_variables: vec![],
            container_command: None,
            container_ports: BTreeSet::new(),
            entry_point_style: EntryPointStyle::Exec,
            routing_subdomain: subdomain.map(String::from),
        }
    }

    #[test]
    fn test_route_hostname_override_wins() {
        let config = config_with(
            Exposure::Route { host_override: Some(String::from("app.example.com")) },
            Some("apps.cluster.local"),
        );
        assert_eq!(config.route_hostname("app", "ns").as_deref(), Some("app.example.com"));
    }

    #[test]
    fn test_route_hostname_from_subdomain() {
        let config = config_with(Exposure::Route { host_override: None }, Some("apps.cluster.local"));
        assert_eq!(
            config.route_hostname("ticktock", "scdf").as_deref(),
            Some("ticktock-scdf.apps.cluster.local")
        );
    }

    #[test]
    fn test_route_hostname_requires_route() {
        let config = config_with(Exposure::NodePort { port: None }, Some("apps.cluster.local"));
        assert_eq!(config.route_hostname("app", "ns"), None);

        let config = config_with(Exposure::Route { host_override: None }, None);
        assert_eq!(config.route_hostname("app", "ns"), None);
    }

    #[test]
    fn test_entry_point_style_from_str() {
        assert_eq!("EXEC".parse::<EntryPointStyle>(), Ok(EntryPointStyle::Exec));
        assert_eq!("shell".parse::<EntryPointStyle>(), Ok(EntryPointStyle::Shell));
        assert!("bash".parse::<EntryPointStyle>().is_err());
    }

    #[test]
    fn test_exposure_serializes_tagged() {
        let json = serde_json::to_string(&Exposure::NodePort { port: Some(30080) }).unwrap();
        assert_eq!(json, r#"{"type":"nodePort","port":30080}"#);
    }
}
