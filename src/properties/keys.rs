//! The recognized deployer property keys.
//!
//! Every key lives under the `spring.cloud.deployer.*` namespace and is matched
//! exactly (case-sensitive). Keys not listed here are ignored by the resolver.

use std::fmt;

/// Forces a new image build and ignores any existing build.
pub const FORCE_BUILD: &str = "spring.cloud.deployer.openshift.forceBuild";
/// Service account the containers run under.
pub const SERVICE_ACCOUNT: &str = "spring.cloud.deployer.openshift.deployment.service.account";
/// Image tag used by the image change trigger.
pub const IMAGE_TAG: &str = "spring.cloud.deployer.openshift.image.tag";
/// Inline Dockerfile overriding every other build strategy.
pub const DOCKERFILE: &str = "spring.cloud.deployer.openshift.deployment.dockerfile";
/// Node selector, `label: value` pairs separated by commas.
pub const NODE_SELECTOR: &str = "spring.cloud.deployer.openshift.deployment.nodeSelector";
/// Route hostname override.
pub const ROUTE_HOST: &str = "spring.cloud.deployer.openshift.deployment.route.host";
/// Volume mounts, `volumeName:mountPath[:readOnly]` separated by commas.
pub const VOLUME_MOUNTS: &str = "spring.cloud.deployer.openshift.deployment.volumeMounts";
/// Labels added to the deployment, `key=value` separated by commas.
pub const LABELS: &str = "spring.cloud.deployer.openshift.deployment.labels";
/// Legacy Kubernetes name for route creation.
pub const CREATE_LOAD_BALANCER: &str = "spring.cloud.deployer.kubernetes.createLoadBalancer";
/// Whether to create a route.
pub const CREATE_ROUTE: &str = "spring.cloud.deployer.openshift.createRoute";
/// Create a NodePort service, `true` for a random port or an explicit port.
pub const CREATE_NODE_PORT: &str = "spring.cloud.deployer.openshift.createNodePort";
/// Container environment variables, `NAME=value` separated by commas.
pub const ENVIRONMENT_VARIABLES: &str = "spring.cloud.deployer.openshift.environmentVariables";
/// Custom container command.
pub const CONTAINER_COMMAND: &str = "spring.cloud.deployer.openshift.containerCommand";
/// Additional container ports.
pub const CONTAINER_PORTS: &str = "spring.cloud.deployer.openshift.containerPorts";
/// How command line arguments are passed to the container.
pub const ENTRY_POINT_STYLE: &str = "spring.cloud.deployer.openshift.entryPointStyle";

/// The shape of a property's raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// A single string, possibly a boolean or enum literal.
    Scalar,
    /// Either a boolean literal or a scalar value.
    BooleanOrScalar,
    /// Comma separated entries.
    List,
    /// Comma separated `key=value` entries.
    KeyedList,
    /// Comma separated `label:value` entries.
    LabeledList,
}

/// A recognized configuration slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyKey {
    /// See [`FORCE_BUILD`].
    ForceBuild,
    /// See [`SERVICE_ACCOUNT`].
    ServiceAccount,
    /// See [`IMAGE_TAG`].
    ImageTag,
    /// See [`DOCKERFILE`].
    Dockerfile,
    /// See [`NODE_SELECTOR`].
    NodeSelector,
    /// See [`ROUTE_HOST`].
    RouteHost,
    /// See [`VOLUME_MOUNTS`].
    VolumeMounts,
    /// See [`LABELS`].
    Labels,
    /// See [`CREATE_ROUTE`], aliased by [`CREATE_LOAD_BALANCER`].
    ///
    /// The names are not combined. Within one map a non-blank
    /// [`CREATE_ROUTE`] wins over the alias, so `createRoute=false` next to
    /// `createLoadBalancer=true` means no route. A value in the override map,
    /// under either name, beats both names in the raw map.
    CreateRoute,
    /// See [`CREATE_NODE_PORT`].
    CreateNodePort,
    /// See [`ENVIRONMENT_VARIABLES`].
    EnvironmentVariables,
    /// See [`CONTAINER_COMMAND`].
    ContainerCommand,
    /// See [`CONTAINER_PORTS`].
    ContainerPorts,
    /// See [`ENTRY_POINT_STYLE`].
    EntryPointStyle,
}

/// Alternate key names mapped onto their canonical key.
const ALIASES: &[(&str, PropertyKey)] = &[(CREATE_LOAD_BALANCER, PropertyKey::CreateRoute)];

impl PropertyKey {
    const ALL: [Self; 14] = [
        Self::ForceBuild,
        Self::ServiceAccount,
        Self::ImageTag,
        Self::Dockerfile,
        Self::NodeSelector,
        Self::RouteHost,
        Self::VolumeMounts,
        Self::Labels,
        Self::CreateRoute,
        Self::CreateNodePort,
        Self::EnvironmentVariables,
        Self::ContainerCommand,
        Self::ContainerPorts,
        Self::EntryPointStyle,
    ];

    /// Returns every key in table order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &Self::ALL
    }

    /// Returns the canonical dotted key name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ForceBuild => FORCE_BUILD,
            Self::ServiceAccount => SERVICE_ACCOUNT,
            Self::ImageTag => IMAGE_TAG,
            Self::Dockerfile => DOCKERFILE,
            Self::NodeSelector => NODE_SELECTOR,
            Self::RouteHost => ROUTE_HOST,
            Self::VolumeMounts => VOLUME_MOUNTS,
            Self::Labels => LABELS,
            Self::CreateRoute => CREATE_ROUTE,
            Self::CreateNodePort => CREATE_NODE_PORT,
            Self::EnvironmentVariables => ENVIRONMENT_VARIABLES,
            Self::ContainerCommand => CONTAINER_COMMAND,
            Self::ContainerPorts => CONTAINER_PORTS,
            Self::EntryPointStyle => ENTRY_POINT_STYLE,
        }
    }

    /// Returns the shape of the raw value.
    #[must_use]
    pub const fn shape(self) -> ValueShape {
        match self {
            Self::NodeSelector => ValueShape::LabeledList,
            Self::Labels | Self::EnvironmentVariables => ValueShape::KeyedList,
            Self::VolumeMounts | Self::ContainerPorts => ValueShape::List,
            Self::CreateNodePort => ValueShape::BooleanOrScalar,
            Self::ForceBuild
            | Self::ServiceAccount
            | Self::ImageTag
            | Self::Dockerfile
            | Self::RouteHost
            | Self::CreateRoute
            | Self::ContainerCommand
            | Self::EntryPointStyle => ValueShape::Scalar,
        }
    }

    /// Returns the declared default, if any.
    #[must_use]
    pub const fn default_value(self) -> Option<&'static str> {
        match self {
            Self::ForceBuild | Self::CreateRoute => Some("false"),
            Self::EntryPointStyle => Some("exec"),
            _ => None,
        }
    }

    /// Returns the deprecated alias name, if any.
    #[must_use]
    pub fn alias(self) -> Option<&'static str> {
        ALIASES
            .iter()
            .find(|(_, canonical)| *canonical == self)
            .map(|(alias, _)| *alias)
    }

    /// Looks up a key by its canonical name or alias.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.name() == name)
            .or_else(|| {
                ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == name)
                    .map(|(_, canonical)| *canonical)
            })
    }

    /// Returns the canonical name and the alias, canonical first.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.name()).chain(self.alias())
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scalar => "scalar",
            Self::BooleanOrScalar => "booleanOrScalar",
            Self::List => "list",
            Self::KeyedList => "keyedList",
            Self::LabeledList => "labeledList",
        })
    }
}
