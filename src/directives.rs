//! Resource-construction directives.
//!
//! Turns a [`ResolvedDeploymentConfig`] into the ordered list of resources the
//! assembly collaborator has to create for one application. The directives
//! only describe what to build; turning them into API objects happens
//! elsewhere.

use serde::Serialize;
use std::fmt;

use crate::resolver::{ConfigFingerprint, EntryPointStyle, Exposure, ResolvedDeploymentConfig};

/// Image tag used when no tag is configured.
pub const DEFAULT_IMAGE_TAG: &str = "latest";

/// The directive list for one application.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentDirectives {
    /// Application identifier the resources are named after.
    pub app_id: String,
    /// Fingerprint of the configuration the directives were derived from.
    pub fingerprint: String,
    /// Directives in creation order.
    pub directives: Vec<PlannedDirective>,
}

/// A single directive with its ordering constraints.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedDirective {
    /// What to create.
    pub directive: ResourceDirective,
    /// Name of the resource.
    pub resource_name: String,
    /// Why the resource is needed.
    pub reason: String,
    /// Indices of directives that must be applied first.
    pub dependencies: Vec<usize>,
}

/// A resource to construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ResourceDirective {
    /// Build the application image.
    Build {
        /// Inline Dockerfile, when one overrides the default strategy.
        dockerfile: Option<String>,
        /// Ignore existing builds.
        forced: bool,
    },
    /// Create or update the deployment config.
    DeploymentConfig {
        /// Image tag the image change trigger follows.
        image_tag: String,
        /// How arguments are passed to the container.
        entry_point_style: EntryPointStyle,
        /// Number of volume mounts.
        volume_mounts: usize,
        /// Number of environment variables.
        environment_variables: usize,
    },
    /// Create the service in front of the pods.
    Service {
        /// Exposed ports, application port first.
        ports: Vec<u16>,
        /// Service type.
        service_type: ServiceType,
    },
    /// Create a route to the service.
    Route {
        /// Route hostname; the cluster generates one when `None`.
        host: Option<String>,
    },
}

/// Kubernetes service type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServiceType {
    /// Cluster-internal service.
    ClusterIp,
    /// Service exposed on every node.
    NodePort {
        /// Requested node port; cluster-assigned when `None`.
        port: Option<u16>,
    },
}

impl DeploymentDirectives {
    /// Derives the directives for `app_id` in `namespace`.
    ///
    /// `application_port` is the port the application itself listens on; it
    /// is always the first service port.
    #[must_use]
    pub fn from_config(
        config: &ResolvedDeploymentConfig,
        app_id: &str,
        namespace: &str,
        application_port: u16,
    ) -> Self {
        let mut directives = Vec::new();

        let build_idx = config.requires_build().then(|| {
            let reason = if config.dockerfile_override.is_some() {
                "Inline Dockerfile overrides the build strategy"
            } else {
                "Build forced, existing builds ignored"
            };
            directives.push(PlannedDirective {
                directive: ResourceDirective::Build {
                    dockerfile: config.dockerfile_override.clone(),
                    forced: config.force_build,
                },
                resource_name: app_id.to_string(),
                reason: reason.to_string(),
                dependencies: vec![],
            });
            directives.len() - 1
        });

        let deployment_idx = directives.len();
        directives.push(PlannedDirective {
            directive: ResourceDirective::DeploymentConfig {
                image_tag: config
                    .image_tag
                    .clone()
                    .unwrap_or_else(|| DEFAULT_IMAGE_TAG.to_string()),
                entry_point_style: config.entry_point_style,
                volume_mounts: config.volume_mounts.len(),
                environment_variables: config.environment_variables.len(),
            },
            resource_name: app_id.to_string(),
            reason: String::from("Application deployment"),
            dependencies: build_idx.into_iter().collect(),
        });

        let mut ports = vec![application_port];
        ports.extend(config.container_ports.iter().filter(|p| **p != application_port));

        let (service_type, service_reason) = match &config.exposure {
            Exposure::NodePort { port } => (
                ServiceType::NodePort { port: *port },
                "NodePort requested",
            ),
            Exposure::Route { .. } | Exposure::None => {
                (ServiceType::ClusterIp, "Cluster-internal service")
            }
        };

        let service_idx = directives.len();
        directives.push(PlannedDirective {
            directive: ResourceDirective::Service { ports, service_type },
            resource_name: app_id.to_string(),
            reason: service_reason.to_string(),
            dependencies: vec![deployment_idx],
        });

        if config.exposure.is_route() {
            directives.push(PlannedDirective {
                directive: ResourceDirective::Route {
                    host: config.route_hostname(app_id, namespace),
                },
                resource_name: app_id.to_string(),
                reason: String::from("Route requested"),
                dependencies: vec![service_idx],
            });
        }

        Self {
            app_id: app_id.to_string(),
            fingerprint: ConfigFingerprint::compute(config).to_string(),
            directives,
        }
    }

    /// Returns the number of directives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Returns true if there are no directives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Returns true if a build directive is present.
    #[must_use]
    pub fn has_build(&self) -> bool {
        self.directives
            .iter()
            .any(|d| matches!(d.directive, ResourceDirective::Build { .. }))
    }
}

impl ResourceDirective {
    /// Short resource kind name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Build { .. } => "Build",
            Self::DeploymentConfig { .. } => "DeploymentConfig",
            Self::Service { .. } => "Service",
            Self::Route { .. } => "Route",
        }
    }
}

impl fmt::Display for PlannedDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.directive.kind(), self.resource_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::VolumeMount;
    use std::collections::{BTreeMap, BTreeSet};

    fn base_config() -> ResolvedDeploymentConfig {
        ResolvedDeploymentConfig {
            force_build: false,
            service_account: None,
            image_tag: None,
            dockerfile_override: None,
            node_selector: vec![],
            route_host: None,
            volume_mounts: vec![VolumeMount::new("data", "/data", false)],
            labels: BTreeMap::new(),
            exposure: Exposure::None,
            environment_variables: vec![],
            container_command: None,
            container_ports: BTreeSet::from([9000, 8080]),
            entry_point_style: EntryPointStyle::Exec,
            routing_subdomain: Some(String::from("apps.local")),
        }
    }

    #[test]
    fn test_minimal_directives() {
        let directives = DeploymentDirectives::from_config(&base_config(), "app", "dev", 8080);

        assert_eq!(directives.len(), 2);
        assert!(!directives.has_build());
        assert_eq!(
            directives.directives[0].directive,
            ResourceDirective::DeploymentConfig {
                image_tag: String::from("latest"),
                entry_point_style: EntryPointStyle::Exec,
                volume_mounts: 1,
                environment_variables: 0,
            }
        );
        assert_eq!(
            directives.directives[1].directive,
            ResourceDirective::Service {
                ports: vec![8080, 9000],
                service_type: ServiceType::ClusterIp
            }
        );
        assert_eq!(directives.directives[1].dependencies, vec![0]);
    }

    #[test]
    fn test_build_precedes_deployment() {
        let mut config = base_config();
        config.dockerfile_override = Some(String::from("FROM scratch"));

        let directives = DeploymentDirectives::from_config(&config, "app", "dev", 8080);

        assert!(directives.has_build());
        assert_eq!(directives.directives[0].directive.kind(), "Build");
        assert_eq!(directives.directives[1].dependencies, vec![0]);
    }

    #[test]
    fn test_route_uses_default_host() {
        let mut config = base_config();
        config.exposure = Exposure::Route { host_override: None };

        let directives = DeploymentDirectives::from_config(&config, "app", "dev", 8080);
        let route = directives.directives.last().unwrap();

        assert_eq!(
            route.directive,
            ResourceDirective::Route {
                host: Some(String::from("app-dev.apps.local"))
            }
        );
        assert_eq!(route.dependencies, vec![1]);
    }

    #[test]
    fn test_node_port_service() {
        let mut config = base_config();
        config.exposure = Exposure::NodePort { port: Some(30080) };

        let directives = DeploymentDirectives::from_config(&config, "app", "dev", 8080);

        assert_eq!(directives.len(), 2);
        assert!(matches!(
            directives.directives[1].directive,
            ResourceDirective::Service {
                service_type: ServiceType::NodePort { port: Some(30080) },
                ..
            }
        ));
    }
}
