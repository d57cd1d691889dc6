//! Private network and subnet.

use std::net::Ipv4Addr;

use tracing::debug;

use crate::error::{ProvisionError, Result};
use crate::events::{EventSink, ProvisionEvent};
use crate::models::{NewNetwork, NewSubnet, Network, Subnet};
use crate::networking::NetworkingApi;

const SUBNET_PREFIX: &str = "sub_";

/// Name of the subnet created inside `network_name`
pub fn subnet_name(network_name: &str) -> String {
    format!("{}{}", SUBNET_PREFIX, network_name)
}

/// Check that `cidr` is an IPv4 block such as `5.1.1.0/24`
pub fn validate_cidr(cidr: &str) -> Result<()> {
    let invalid = || ProvisionError::validation(format!("invalid IPv4 CIDR '{}'", cidr));
    let (address, prefix) = cidr.split_once('/').ok_or_else(invalid)?;
    address.parse::<Ipv4Addr>().map_err(|_| invalid())?;
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match prefix.parse::<u8>() {
        Ok(len) if len <= 32 => Ok(()),
        _ => Err(invalid()),
    }
}

/// Find `name` among the tenant's networks or create it, then try to add an
/// IPv4 subnet with `cidr`.
///
/// A rejected subnet is not an error: the network is returned with `None`.
pub fn create_internal_network(
    networking: &dyn NetworkingApi,
    name: &str,
    cidr: &str,
    events: &dyn EventSink,
) -> Result<(Network, Option<Subnet>)> {
    validate_cidr(cidr)?;

    let existing = networking
        .list_networks(None)?
        .into_iter()
        .find(|net| net.name == name);

    let network = match existing {
        Some(net) => {
            events.emit(ProvisionEvent::NetworkExists {
                network: name.to_string(),
            });
            net
        }
        None => {
            debug!(network = name, "creating network");
            networking.create_network(&NewNetwork {
                name: name.to_string(),
                admin_state_up: true,
            })?
        }
    };

    let request = NewSubnet {
        name: subnet_name(name),
        network_id: network.id.clone(),
        ip_version: 4,
        cidr: cidr.to_string(),
    };
    let subnet = match networking.create_subnet(&request) {
        Ok(subnet) => Some(subnet),
        Err(e) => {
            events.emit(ProvisionEvent::SubnetRejected {
                subnet: request.name,
                cidr: request.cidr,
                reason: e.to_string(),
            });
            None
        }
    };

    Ok((network, subnet))
}
