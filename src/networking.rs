//! Networking service access.
//!
//! `NetworkingApi` covers the Neutron operations used to build a tenant's
//! private network and router. `NeutronClient` implements it over HTTP with a
//! tenant-scoped token obtained from the identity service using the operator's
//! password credentials.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::{EndpointType, Settings};
use crate::error::{ApiError, ProvisionError, Result};
use crate::http::JsonClient;
use crate::models::{NewNetwork, NewRouter, NewSubnet, Network, Router, Subnet};

/// Catalog type of the networking service
pub const NETWORK_SERVICE_TYPE: &str = "network";

const API_VERSION_SUFFIX: &str = "/v2.0";

/// Networking operations used while provisioning a tenant.
///
/// Any rejected request is reported as an `ApiError`; callers decide which
/// rejections are tolerable.
pub trait NetworkingApi {
    /// List networks, optionally filtered by name on the server
    fn list_networks(&self, name: Option<&str>) -> std::result::Result<Vec<Network>, ApiError>;

    fn create_network(&self, network: &NewNetwork) -> std::result::Result<Network, ApiError>;

    fn create_subnet(&self, subnet: &NewSubnet) -> std::result::Result<Subnet, ApiError>;

    fn list_subnets(&self, name: Option<&str>) -> std::result::Result<Vec<Subnet>, ApiError>;

    fn list_routers(&self, name: Option<&str>) -> std::result::Result<Vec<Router>, ApiError>;

    fn create_router(&self, router: &NewRouter) -> std::result::Result<Router, ApiError>;

    /// Set the router's external gateway
    fn add_gateway_router(
        &self,
        router_id: &str,
        network_id: &str,
    ) -> std::result::Result<Router, ApiError>;

    /// Attach the router to a subnet
    fn add_interface_router(
        &self,
        router_id: &str,
        subnet_id: &str,
    ) -> std::result::Result<(), ApiError>;
}

// ============================================================================
// Token session
// ============================================================================

#[derive(Debug, Deserialize)]
struct AccessEnvelope {
    access: Access,
}

#[derive(Debug, Deserialize)]
struct Access {
    token: Token,
    #[serde(default, rename = "serviceCatalog")]
    service_catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct Token {
    id: String,
}

/// One service in the token's catalog
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub endpoints: Vec<CatalogEndpoint>,
}

/// One regional endpoint of a catalog service
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEndpoint {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, rename = "publicURL")]
    pub public_url: Option<String>,
    #[serde(default, rename = "internalURL")]
    pub internal_url: Option<String>,
    #[serde(default, rename = "adminURL")]
    pub admin_url: Option<String>,
}

impl CatalogEndpoint {
    fn url(&self, endpoint_type: EndpointType) -> Option<&str> {
        match endpoint_type {
            EndpointType::Public => self.public_url.as_deref(),
            EndpointType::Internal => self.internal_url.as_deref(),
            EndpointType::Admin => self.admin_url.as_deref(),
        }
    }
}

/// Pick the URL of `service_type` from a token catalog
pub fn select_endpoint(
    catalog: &[CatalogEntry],
    service_type: &str,
    region: Option<&str>,
    endpoint_type: EndpointType,
) -> Result<String> {
    let service = catalog
        .iter()
        .find(|entry| entry.service_type == service_type)
        .ok_or_else(|| {
            ProvisionError::auth(format!("no '{}' service in catalog", service_type))
        })?;

    service
        .endpoints
        .iter()
        .filter(|ep| region.is_none() || ep.region.as_deref() == region)
        .find_map(|ep| ep.url(endpoint_type))
        .map(str::to_string)
        .ok_or_else(|| {
            ProvisionError::auth(format!(
                "no {} endpoint for '{}' service{}",
                endpoint_type,
                service_type,
                region
                    .map(|r| format!(" in region {}", r))
                    .unwrap_or_default()
            ))
        })
}

fn versioned(endpoint: &str) -> String {
    let trimmed = endpoint.trim_end_matches('/');
    if trimmed.ends_with(API_VERSION_SUFFIX) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, API_VERSION_SUFFIX)
    }
}

// ============================================================================
// Neutron client
// ============================================================================

#[derive(Deserialize)]
struct NetworksEnvelope {
    networks: Vec<Network>,
}

#[derive(Deserialize)]
struct NetworkEnvelope {
    network: Network,
}

#[derive(Deserialize)]
struct SubnetsEnvelope {
    subnets: Vec<Subnet>,
}

#[derive(Deserialize)]
struct SubnetEnvelope {
    subnet: Subnet,
}

#[derive(Deserialize)]
struct RoutersEnvelope {
    routers: Vec<Router>,
}

#[derive(Deserialize)]
struct RouterEnvelope {
    router: Router,
}

/// Neutron v2.0 client scoped to one tenant
#[derive(Debug, Clone)]
pub struct NeutronClient {
    http: JsonClient,
}

impl NeutronClient {
    /// Authenticate as the operator within `tenant_name` and bind to the
    /// networking endpoint from the returned catalog.
    pub fn connect(settings: &Settings, tenant_name: &str) -> Result<Self> {
        let identity = JsonClient::new(&settings.operator.auth_url, None, settings.timeout)?;
        let request = json!({
            "auth": {
                "tenantName": tenant_name,
                "passwordCredentials": {
                    "username": settings.operator.username,
                    "password": settings.operator.password,
                }
            }
        });
        let envelope: AccessEnvelope = identity.post("/tokens", &request).map_err(|e| match e {
            ApiError::Rejected { status: 401, message } => ProvisionError::auth(format!(
                "operator {} rejected for tenant {}: {}",
                settings.operator.username, tenant_name, message
            )),
            other => other.into(),
        })?;

        let endpoint = select_endpoint(
            &envelope.access.service_catalog,
            NETWORK_SERVICE_TYPE,
            settings.region.as_deref(),
            settings.endpoint_type,
        )?;
        let base = versioned(&endpoint);
        debug!(tenant = tenant_name, endpoint = %base, "networking session opened");

        Ok(Self {
            http: identity.rebind(&base, Some(envelope.access.token.id)),
        })
    }

    /// Bind directly to a known endpoint and token
    pub fn with_token(
        endpoint: &str,
        token: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        Ok(Self {
            http: JsonClient::new(&versioned(endpoint), Some(token.into()), timeout)?,
        })
    }

    fn name_filter(name: Option<&str>) -> Vec<(&str, &str)> {
        name.map(|n| vec![("name", n)]).unwrap_or_default()
    }
}

impl NetworkingApi for NeutronClient {
    fn list_networks(&self, name: Option<&str>) -> std::result::Result<Vec<Network>, ApiError> {
        let listed: NetworksEnvelope = self
            .http
            .get_with_query("/networks", &Self::name_filter(name))?;
        Ok(listed.networks)
    }

    fn create_network(&self, network: &NewNetwork) -> std::result::Result<Network, ApiError> {
        let created: NetworkEnvelope =
            self.http.post("/networks", &json!({ "network": network }))?;
        Ok(created.network)
    }

    fn create_subnet(&self, subnet: &NewSubnet) -> std::result::Result<Subnet, ApiError> {
        let created: SubnetEnvelope = self.http.post("/subnets", &json!({ "subnet": subnet }))?;
        Ok(created.subnet)
    }

    fn list_subnets(&self, name: Option<&str>) -> std::result::Result<Vec<Subnet>, ApiError> {
        let listed: SubnetsEnvelope = self
            .http
            .get_with_query("/subnets", &Self::name_filter(name))?;
        Ok(listed.subnets)
    }

    fn list_routers(&self, name: Option<&str>) -> std::result::Result<Vec<Router>, ApiError> {
        let listed: RoutersEnvelope = self
            .http
            .get_with_query("/routers", &Self::name_filter(name))?;
        Ok(listed.routers)
    }

    fn create_router(&self, router: &NewRouter) -> std::result::Result<Router, ApiError> {
        let created: RouterEnvelope = self.http.post("/routers", &json!({ "router": router }))?;
        Ok(created.router)
    }

    fn add_gateway_router(
        &self,
        router_id: &str,
        network_id: &str,
    ) -> std::result::Result<Router, ApiError> {
        let body = json!({ "router": { "external_gateway_info": { "network_id": network_id } } });
        let updated: RouterEnvelope = self.http.put(&format!("/routers/{}", router_id), &body)?;
        Ok(updated.router)
    }

    fn add_interface_router(
        &self,
        router_id: &str,
        subnet_id: &str,
    ) -> std::result::Result<(), ApiError> {
        let _: serde_json::Value = self.http.put(
            &format!("/routers/{}/add_router_interface", router_id),
            &json!({ "subnet_id": subnet_id }),
        )?;
        Ok(())
    }
}
