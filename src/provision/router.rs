//! Router, external gateway and private subnet interface.

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::events::{EventSink, ProvisionEvent};
use crate::models::{NewRouter, Router};
use crate::networking::NetworkingApi;
use crate::outcome::OutcomeKind;

/// Names of the router and the two things it connects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterNames {
    pub router: String,
    pub external_network: String,
    pub private_subnet: String,
}

/// What `create_router` ended up doing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterAttachment {
    pub router: Router,
    pub outcome: OutcomeKind,
    /// Gateway set on the external network
    pub gateway_attached: bool,
    /// Interface added on the private subnet
    pub interface_attached: bool,
}

/// Find or create the router, then connect it to the external network and the
/// private subnet.
///
/// A missing external network or subnet leaves that side unconnected and is
/// reported as an event. A rejected interface (e.g. already attached) is
/// reported and ignored; a rejected gateway aborts.
pub fn create_router(
    networking: &dyn NetworkingApi,
    names: &RouterNames,
    events: &dyn EventSink,
) -> Result<RouterAttachment> {
    let existing = networking
        .list_routers(Some(&names.router))?
        .into_iter()
        .find(|r| r.name == names.router);

    let (mut router, outcome) = match existing {
        Some(router) => {
            events.emit(ProvisionEvent::RouterExists {
                router: names.router.clone(),
            });
            (router, OutcomeKind::AlreadyExists)
        }
        None => {
            debug!(router = %names.router, "creating router");
            let router = networking.create_router(&NewRouter {
                name: names.router.clone(),
                admin_state_up: true,
            })?;
            (router, OutcomeKind::Created)
        }
    };

    let external = networking
        .list_networks(Some(&names.external_network))?
        .into_iter()
        .find(|net| net.name == names.external_network);
    let gateway_attached = match external {
        Some(net) => {
            router = networking.add_gateway_router(&router.id, &net.id)?;
            debug!(router = %router.name, network = %net.name, "gateway set");
            true
        }
        None => {
            events.emit(ProvisionEvent::ExternalNetworkMissing {
                network: names.external_network.clone(),
            });
            false
        }
    };

    let subnet = networking
        .list_subnets(Some(&names.private_subnet))?
        .into_iter()
        .find(|s| s.name == names.private_subnet);
    let interface_attached = match subnet {
        Some(subnet) => match networking.add_interface_router(&router.id, &subnet.id) {
            Ok(()) => true,
            Err(e) => {
                events.emit(ProvisionEvent::InterfaceRejected {
                    router: names.router.clone(),
                    subnet: subnet.name,
                    reason: e.to_string(),
                });
                false
            }
        },
        None => {
            events.emit(ProvisionEvent::PrivateSubnetMissing {
                subnet: names.private_subnet.clone(),
            });
            false
        }
    };

    Ok(RouterAttachment {
        router,
        outcome,
        gateway_attached,
        interface_attached,
    })
}
