//! Reconciliation of the overlapping exposure properties.
//!
//! A NodePort request beats the route flags: an operator who asked for a
//! NodePort wants a fixed entry point on every node rather than a DNS route.

use tracing::{debug, warn};

use crate::grammar::NodePortRequest;

use super::model::Exposure;

/// Decides how the application is exposed.
///
/// `create_route` is the alias-resolved route/load-balancer flag and
/// `route_host` the optional hostname override.
#[must_use]
pub fn reconcile_exposure(
    node_port: Option<NodePortRequest>,
    create_route: bool,
    route_host: Option<&str>,
) -> Exposure {
    let exposure = match node_port {
        Some(request) => {
            if create_route {
                warn!("Both a NodePort and a route were requested, creating the NodePort only");
            }
            Exposure::NodePort { port: request.port() }
        }
        None if create_route => Exposure::Route {
            host_override: route_host.map(String::from),
        },
        None => Exposure::None,
    };

    if route_host.is_some() && !exposure.is_route() {
        debug!("Route host is set but no route will be created");
    }

    debug!("Resolved exposure: {exposure}");
    exposure
}
