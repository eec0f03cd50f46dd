//! The deployment property resolver.
//!
//! Resolution is a single pure pass:
//! - Look up every key (override map, raw map, default)
//! - Parse each value with its grammar, independently, collecting all errors
//! - Reconcile the exposure properties
//!
//! The result is either a complete [`ResolvedDeploymentConfig`] or a
//! [`ResolutionError`] listing every problem.

mod fingerprint;
mod model;
mod reconcile;
mod settings;

pub use fingerprint::ConfigFingerprint;
pub use model::{EntryPointStyle, Exposure, ResolvedDeploymentConfig, VolumeMount};
pub use reconcile::reconcile_exposure;
pub use settings::{DEFAULT_APPLICATION_PORT, ResolverSettings};

use tracing::{debug, info};

use crate::error::{PropertyError, ResolutionError};
use crate::grammar::{self, ParseResult};
use crate::properties::{PropertyKey, PropertyLookup, PropertySource};

/// Resolves raw property maps into a [`ResolvedDeploymentConfig`].
///
/// The resolver holds no mutable state and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct DeploymentPropertyResolver {
    settings: ResolverSettings,
}

/// Collects per-key parse errors during one pass.
struct Pass<'a, R: ?Sized, O: ?Sized> {
    lookup: PropertyLookup<'a, R, O>,
    errors: Vec<PropertyError>,
}

impl<'a, R, O> Pass<'a, R, O>
where
    R: PropertySource + ?Sized,
    O: PropertySource + ?Sized,
{
    /// Parses `key` if it has a value, recording any errors.
    fn parse<T>(
        &mut self,
        key: PropertyKey,
        parser: impl FnOnce(&str, &'a str) -> ParseResult<T>,
    ) -> Option<T> {
        let raw = self.lookup.value(key)?;
        match parser(key.name(), raw) {
            Ok(value) => Some(value),
            Err(errors) => {
                debug!("Property {key} has {} error(s)", errors.len());
                self.errors.extend(errors);
                None
            }
        }
    }

    /// Returns the trimmed value of a plain scalar key.
    fn scalar(&self, key: PropertyKey) -> Option<String> {
        self.lookup.value(key).map(|v| v.trim().to_string())
    }
}

impl DeploymentPropertyResolver {
    /// Creates a resolver with the given settings.
    #[must_use]
    pub const fn new(settings: ResolverSettings) -> Self {
        Self { settings }
    }

    /// Returns the settings this resolver uses.
    #[must_use]
    pub const fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Resolves the raw property map with per-deployment overrides.
    ///
    /// # Errors
    ///
    /// Returns every malformed, conflicting or out of range value found.
    pub fn resolve<R, O>(
        &self,
        raw: &R,
        overrides: &O,
    ) -> Result<ResolvedDeploymentConfig, ResolutionError>
    where
        R: PropertySource + ?Sized,
        O: PropertySource + ?Sized,
    {
        let mut pass = Pass {
            lookup: PropertyLookup::new(raw, overrides),
            errors: Vec::new(),
        };

        let force_build = pass.parse(PropertyKey::ForceBuild, grammar::parse_bool);
        let service_account = pass.scalar(PropertyKey::ServiceAccount);
        let image_tag = pass.scalar(PropertyKey::ImageTag);
        let dockerfile_override = pass.lookup.value(PropertyKey::Dockerfile).map(String::from);
        let node_selector = pass.parse(PropertyKey::NodeSelector, grammar::parse_node_selector);
        let route_host = pass.scalar(PropertyKey::RouteHost);
        let volume_mounts = pass.parse(PropertyKey::VolumeMounts, grammar::parse_volume_mounts);
        let labels = pass.parse(PropertyKey::Labels, grammar::parse_labels);
        let create_route = pass.parse(PropertyKey::CreateRoute, grammar::parse_bool);
        let node_port = pass.parse(PropertyKey::CreateNodePort, grammar::parse_node_port);
        let environment_variables =
            pass.parse(PropertyKey::EnvironmentVariables, grammar::parse_environment_variables);
        let container_command =
            pass.parse(PropertyKey::ContainerCommand, grammar::parse_container_command);
        let container_ports = pass.parse(PropertyKey::ContainerPorts, grammar::parse_container_ports);
        let entry_point_style =
            pass.parse(PropertyKey::EntryPointStyle, grammar::parse_entry_point_style);

        if let Some(error) = ResolutionError::from_errors(pass.errors) {
            info!("Property resolution failed with {} error(s)", error.len());
            return Err(error);
        }

        let exposure = reconcile_exposure(
            node_port,
            create_route.unwrap_or(false),
            route_host.as_deref(),
        );

        let mut container_ports = container_ports.unwrap_or_default();
        if let Some(reserved) = self.settings.reserved_application_port {
            if container_ports.remove(&reserved) {
                debug!("Dropping reserved application port {reserved} from container ports");
            }
        }

        Ok(ResolvedDeploymentConfig {
            force_build: force_build.unwrap_or(false),
            service_account,
            image_tag,
            dockerfile_override,
            node_selector: node_selector.unwrap_or_default(),
            route_host,
            volume_mounts: volume_mounts.unwrap_or_default(),
            labels: labels.unwrap_or_default(),
            exposure,
            environment_variables: environment_variables.unwrap_or_default(),
            container_command: container_command.flatten(),
            container_ports,
            entry_point_style: entry_point_style.unwrap_or_default(),
            routing_subdomain: self.settings.default_routing_subdomain.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PropertyErrorKind;
    use crate::properties::keys::*;
    use std::collections::{BTreeSet, HashMap};

    fn map(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn resolve(raw: &[(&str, &str)]) -> Result<ResolvedDeploymentConfig, ResolutionError> {
        DeploymentPropertyResolver::default().resolve(&map(raw), &map(&[]))
    }

    #[test]
    fn test_empty_map_gives_defaults() {
        let config = resolve(&[]).unwrap();

        assert!(!config.force_build);
        assert_eq!(config.service_account, None);
        assert_eq!(config.exposure, Exposure::None);
        assert_eq!(config.entry_point_style, EntryPointStyle::Exec);
        assert!(config.container_ports.is_empty());
        assert_eq!(config.container_command, None);
    }

    #[test]
    fn test_full_resolution() {
        let config = resolve(&[
            (FORCE_BUILD, "true"),
            (SERVICE_ACCOUNT, " deployer "),
            (IMAGE_TAG, "v1"),
            (NODE_SELECTOR, "region: primary,role:processor"),
            (VOLUME_MOUNTS, "data:/data,cfg:/etc/app:true"),
            (LABELS, "groupName=test"),
            (CREATE_ROUTE, "true"),
            (ROUTE_HOST, "app.example.com"),
            (ENVIRONMENT_VARIABLES, "A=1,B=2"),
            (CONTAINER_COMMAND, "java -jar 'my app.jar'"),
            (CONTAINER_PORTS, "9090,9091"),
            (ENTRY_POINT_STYLE, "boot"),
        ])
        .unwrap();

        assert!(config.force_build);
        assert_eq!(config.service_account.as_deref(), Some("deployer"));
        assert_eq!(config.image_tag.as_deref(), Some("v1"));
        assert_eq!(config.node_selector.len(), 2);
        assert_eq!(config.volume_mounts[1], VolumeMount::new("cfg", "/etc/app", true));
        assert_eq!(config.labels["groupName"], "test");
        assert_eq!(
            config.exposure,
            Exposure::Route {
                host_override: Some(String::from("app.example.com"))
            }
        );
        assert_eq!(config.env_var("B"), Some("2"));
        assert_eq!(
            config.container_command,
            Some(vec![String::from("java"), String::from("-jar"), String::from("my app.jar")])
        );
        assert_eq!(config.container_ports, BTreeSet::from([9090, 9091]));
        assert_eq!(config.entry_point_style, EntryPointStyle::Boot);
    }

    #[test]
    fn test_errors_are_collected_across_keys() {
        let error = resolve(&[
            (FORCE_BUILD, "maybe"),
            (LABELS, "a=1,a=2"),
            (CONTAINER_PORTS, "0,65536"),
            (VOLUME_MOUNTS, "data:/mnt:maybe"),
        ])
        .unwrap_err();

        assert_eq!(error.len(), 5);
        assert_eq!(error.for_key(CONTAINER_PORTS).count(), 2);
        assert!(
            error
                .for_key(LABELS)
                .all(|e| e.kind() == PropertyErrorKind::ConflictingConfiguration)
        );
    }

    #[test]
    fn test_reserved_port_dropped() {
        let config = resolve(&[(CONTAINER_PORTS, "8080,9000")]).unwrap();
        assert_eq!(config.container_ports, BTreeSet::from([9000]));

        let resolver = DeploymentPropertyResolver::new(ResolverSettings::new().with_reserved_port(None));
        let config = resolver
            .resolve(&map(&[(CONTAINER_PORTS, "8080,9000")]), &map(&[]))
            .unwrap();
        assert_eq!(config.container_ports, BTreeSet::from([8080, 9000]));
    }

    #[test]
    fn test_load_balancer_alias_creates_route() {
        let config = resolve(&[(CREATE_LOAD_BALANCER, "true")]).unwrap();
        assert!(config.exposure.is_route());
    }

    #[test]
    fn test_canonical_route_flag_beats_alias() {
        let config =
            resolve(&[(CREATE_ROUTE, "false"), (CREATE_LOAD_BALANCER, "true")]).unwrap();
        assert_eq!(config.exposure, Exposure::None);
    }

    #[test]
    fn test_routing_subdomain_carried() {
        let resolver =
            DeploymentPropertyResolver::new(ResolverSettings::new().with_routing_subdomain("apps.local"));
        let config = resolver
            .resolve(&map(&[(CREATE_ROUTE, "true")]), &map(&[]))
            .unwrap();

        assert_eq!(config.route_hostname("app", "dev").as_deref(), Some("app-dev.apps.local"));
    }

    #[test]
    fn test_dockerfile_kept_verbatim() {
        let dockerfile = "FROM java:8\nADD app.jar /app.jar\n";
        let config = resolve(&[(DOCKERFILE, dockerfile)]).unwrap();
        assert_eq!(config.dockerfile_override.as_deref(), Some(dockerfile));
        assert!(config.requires_build());
    }
}
