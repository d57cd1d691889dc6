//! Remote resource records
//!
//! These mirror the JSON documents returned by the Keystone v2.0 admin API and
//! the Neutron v2.0 API. Only the fields this tool reads are modelled; unknown
//! fields are ignored on decode.

use serde::{Deserialize, Serialize};

/// Identity-service tenant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Identity-service user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Default tenant of the user
    #[serde(default, rename = "tenantId")]
    pub tenant_id: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Identity-service role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
}

/// Neutron network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub id: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub admin_state_up: bool,
    #[serde(default)]
    pub status: Option<String>,
    /// IDs of subnets bound to this network
    #[serde(default)]
    pub subnets: Vec<String>,
}

/// Neutron subnet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    pub id: String,
    pub name: String,
    pub network_id: String,
    pub ip_version: u8,
    pub cidr: String,
}

/// Router attachment point on an external network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayInfo {
    pub network_id: String,
}

/// Neutron router
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Router {
    pub id: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub admin_state_up: bool,
    #[serde(default)]
    pub external_gateway_info: Option<GatewayInfo>,
}

fn default_true() -> bool {
    true
}

/// Tenant creation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTenant {
    pub name: String,
    pub description: String,
    pub enabled: bool,
}

/// User creation payload
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub name: String,
    pub password: String,
    pub email: String,
    #[serde(rename = "tenantId")]
    pub tenant_id: String,
    pub enabled: bool,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("tenant_id", &self.tenant_id)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Network creation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNetwork {
    pub name: String,
    pub admin_state_up: bool,
}

/// Subnet creation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSubnet {
    pub name: String,
    pub network_id: String,
    pub ip_version: u8,
    pub cidr: String,
}

/// Router creation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRouter {
    pub name: String,
    pub admin_state_up: bool,
}
