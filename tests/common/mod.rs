//! In-memory identity + networking service used by the integration tests.
//!
//! Behaves like Keystone/Neutron where it matters here: tenant and user names
//! are unique (409 on duplicates), role assignments conflict when repeated and
//! are not found when absent, overlapping subnets and duplicate router
//! interfaces are rejected with 400.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use create_test_tenant::models::{
    GatewayInfo, NewNetwork, NewRouter, NewSubnet, NewTenant, NewUser,
};
use create_test_tenant::{
    ApiError, IdentityApi, Network, NetworkingApi, Role, Router, Subnet, Tenant, User,
};

pub const EXTERNAL_NETWORK: &str = "external_network";

#[derive(Debug, Default)]
pub struct CloudState {
    next_id: u64,
    pub tenants: Vec<Tenant>,
    pub users: Vec<User>,
    pub passwords: Vec<(String, String)>,
    pub roles: Vec<Role>,
    /// (user_id, role_id, tenant_id)
    pub assignments: BTreeSet<(String, String, String)>,
    pub networks: Vec<Network>,
    pub subnets: Vec<Subnet>,
    pub routers: Vec<Router>,
    /// (router_id, subnet_id)
    pub interfaces: Vec<(String, String)>,
    /// Tenants networking sessions were opened for
    pub sessions: Vec<String>,
    /// Operations that fail with a 500
    pub failing: HashSet<&'static str>,
}

impl CloudState {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn check(&self, op: &'static str) -> Result<(), ApiError> {
        if self.failing.contains(op) {
            Err(ApiError::rejected(500, format!("{} unavailable", op)))
        } else {
            Ok(())
        }
    }
}

/// Shared handle; clones see the same cloud
#[derive(Debug, Clone, Default)]
pub struct FakeCloud {
    state: Arc<Mutex<CloudState>>,
}

impl FakeCloud {
    /// A cloud with the admin account, the `_member_`/`admin` roles and an
    /// external network.
    pub fn new() -> Self {
        let cloud = Self::default();
        {
            let mut s = cloud.state();
            for name in ["_member_", "admin"] {
                let id = s.id("role");
                s.roles.push(Role {
                    id,
                    name: name.to_string(),
                });
            }
            let id = s.id("user");
            s.users.push(User {
                id,
                name: "admin".to_string(),
                email: None,
                tenant_id: None,
                enabled: true,
            });
            let id = s.id("net");
            s.networks.push(Network {
                id,
                name: EXTERNAL_NETWORK.to_string(),
                admin_state_up: true,
                status: Some("ACTIVE".to_string()),
                subnets: Vec::new(),
            });
        }
        cloud
    }

    pub fn without_external_network(self) -> Self {
        self.state().networks.retain(|n| n.name != EXTERNAL_NETWORK);
        self
    }

    pub fn failing(self, op: &'static str) -> Self {
        self.state().failing.insert(op);
        self
    }

    pub fn heal(&self, op: &'static str) {
        self.state().failing.remove(op);
    }

    pub fn state(&self) -> MutexGuard<'_, CloudState> {
        self.state.lock().expect("fake cloud mutex poisoned")
    }

    /// Session factory for `provision`
    pub fn connect(&self, tenant: &Tenant) -> create_test_tenant::Result<FakeCloud> {
        self.state().sessions.push(tenant.name.clone());
        Ok(self.clone())
    }

    pub fn tenant_named(&self, name: &str) -> Option<Tenant> {
        self.state().tenants.iter().find(|t| t.name == name).cloned()
    }

    pub fn user_named(&self, name: &str) -> Option<User> {
        self.state().users.iter().find(|u| u.name == name).cloned()
    }

    pub fn role_named(&self, name: &str) -> Role {
        self.state()
            .roles
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .expect("seeded role")
    }

    pub fn has_assignment(&self, user: &str, role: &str, tenant: &str) -> bool {
        let (Some(user), Some(tenant)) = (self.user_named(user), self.tenant_named(tenant)) else {
            return false;
        };
        let role = self.role_named(role);
        self.state()
            .assignments
            .contains(&(user.id, role.id, tenant.id))
    }

    pub fn count_networks(&self, name: &str) -> usize {
        self.state().networks.iter().filter(|n| n.name == name).count()
    }

    pub fn count_routers(&self, name: &str) -> usize {
        self.state().routers.iter().filter(|r| r.name == name).count()
    }

    pub fn subnets_named(&self, name: &str) -> Vec<Subnet> {
        self.state()
            .subnets
            .iter()
            .filter(|s| s.name == name)
            .cloned()
            .collect()
    }

    pub fn router_named(&self, name: &str) -> Option<Router> {
        self.state().routers.iter().find(|r| r.name == name).cloned()
    }

    pub fn network_named(&self, name: &str) -> Option<Network> {
        self.state().networks.iter().find(|n| n.name == name).cloned()
    }

    pub fn interfaces_of(&self, router_id: &str) -> Vec<String> {
        self.state()
            .interfaces
            .iter()
            .filter(|(r, _)| r == router_id)
            .map(|(_, s)| s.clone())
            .collect()
    }

    /// Add a subnet directly, bypassing the API
    pub fn seed_subnet(&self, name: &str, network_id: &str, cidr: &str) -> Subnet {
        let mut s = self.state();
        let id = s.id("subnet");
        let subnet = Subnet {
            id,
            name: name.to_string(),
            network_id: network_id.to_string(),
            ip_version: 4,
            cidr: cidr.to_string(),
        };
        s.subnets.push(subnet.clone());
        subnet
    }
}

impl IdentityApi for FakeCloud {
    fn create_tenant(&self, tenant: &NewTenant) -> Result<Tenant, ApiError> {
        let mut s = self.state();
        s.check("create_tenant")?;
        if s.tenants.iter().any(|t| t.name == tenant.name) {
            return Err(ApiError::conflict(format!(
                "Conflict occurred attempting to store tenant - Duplicate entry {}",
                tenant.name
            )));
        }
        let id = s.id("tenant");
        let created = Tenant {
            id,
            name: tenant.name.clone(),
            description: Some(tenant.description.clone()),
            enabled: tenant.enabled,
        };
        s.tenants.push(created.clone());
        Ok(created)
    }

    fn find_tenant_by_name(&self, name: &str) -> Result<Tenant, ApiError> {
        self.tenant_named(name)
            .ok_or_else(|| ApiError::not_found(format!("Could not find tenant, {}.", name)))
    }

    fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        let mut s = self.state();
        s.check("create_user")?;
        if s.users.iter().any(|u| u.name == user.name) {
            return Err(ApiError::conflict(format!("Duplicate entry {}", user.name)));
        }
        let id = s.id("user");
        let created = User {
            id,
            name: user.name.clone(),
            email: Some(user.email.clone()),
            tenant_id: Some(user.tenant_id.clone()),
            enabled: user.enabled,
        };
        s.passwords.push((user.name.clone(), user.password.clone()));
        s.users.push(created.clone());
        Ok(created)
    }

    fn find_user_by_name(&self, name: &str) -> Result<User, ApiError> {
        self.user_named(name)
            .ok_or_else(|| ApiError::not_found(format!("Could not find user, {}.", name)))
    }

    fn find_role_by_name(&self, name: &str) -> Result<Role, ApiError> {
        self.state()
            .roles
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("role {}", name)))
    }

    fn add_user_role(&self, user: &User, role: &Role, tenant: &Tenant) -> Result<(), ApiError> {
        let mut s = self.state();
        s.check("add_user_role")?;
        let key = (user.id.clone(), role.id.clone(), tenant.id.clone());
        if !s.assignments.insert(key) {
            return Err(ApiError::conflict("User already has role in tenant"));
        }
        Ok(())
    }

    fn remove_user_role(
        &self,
        user: &User,
        role: &Role,
        tenant: &Tenant,
    ) -> Result<(), ApiError> {
        let mut s = self.state();
        s.check("remove_user_role")?;
        let key = (user.id.clone(), role.id.clone(), tenant.id.clone());
        if !s.assignments.remove(&key) {
            return Err(ApiError::not_found(format!(
                "User {} has no role {} in tenant {}",
                user.name, role.name, tenant.name
            )));
        }
        Ok(())
    }
}

impl NetworkingApi for FakeCloud {
    fn list_networks(&self, name: Option<&str>) -> Result<Vec<Network>, ApiError> {
        let s = self.state();
        s.check("list_networks")?;
        Ok(s.networks
            .iter()
            .filter(|n| name.is_none_or(|wanted| n.name == wanted))
            .cloned()
            .collect())
    }

    fn create_network(&self, network: &NewNetwork) -> Result<Network, ApiError> {
        let mut s = self.state();
        s.check("create_network")?;
        let id = s.id("net");
        let created = Network {
            id,
            name: network.name.clone(),
            admin_state_up: network.admin_state_up,
            status: Some("ACTIVE".to_string()),
            subnets: Vec::new(),
        };
        s.networks.push(created.clone());
        Ok(created)
    }

    fn create_subnet(&self, subnet: &NewSubnet) -> Result<Subnet, ApiError> {
        let mut s = self.state();
        s.check("create_subnet")?;
        if !s.networks.iter().any(|n| n.id == subnet.network_id) {
            return Err(ApiError::not_found(format!(
                "Network {} could not be found",
                subnet.network_id
            )));
        }
        if s
            .subnets
            .iter()
            .any(|x| x.network_id == subnet.network_id && x.cidr == subnet.cidr)
        {
            return Err(ApiError::rejected(
                400,
                format!(
                    "Invalid input for operation: Requested subnet with cidr: {} overlaps with another subnet",
                    subnet.cidr
                ),
            ));
        }
        let id = s.id("subnet");
        let created = Subnet {
            id: id.clone(),
            name: subnet.name.clone(),
            network_id: subnet.network_id.clone(),
            ip_version: subnet.ip_version,
            cidr: subnet.cidr.clone(),
        };
        if let Some(net) = s.networks.iter_mut().find(|n| n.id == subnet.network_id) {
            net.subnets.push(id);
        }
        s.subnets.push(created.clone());
        Ok(created)
    }

    fn list_subnets(&self, name: Option<&str>) -> Result<Vec<Subnet>, ApiError> {
        let s = self.state();
        s.check("list_subnets")?;
        Ok(s.subnets
            .iter()
            .filter(|x| name.is_none_or(|wanted| x.name == wanted))
            .cloned()
            .collect())
    }

    fn list_routers(&self, name: Option<&str>) -> Result<Vec<Router>, ApiError> {
        let s = self.state();
        s.check("list_routers")?;
        Ok(s.routers
            .iter()
            .filter(|r| name.is_none_or(|wanted| r.name == wanted))
            .cloned()
            .collect())
    }

    fn create_router(&self, router: &NewRouter) -> Result<Router, ApiError> {
        let mut s = self.state();
        s.check("create_router")?;
        let id = s.id("router");
        let created = Router {
            id,
            name: router.name.clone(),
            admin_state_up: router.admin_state_up,
            external_gateway_info: None,
        };
        s.routers.push(created.clone());
        Ok(created)
    }

    fn add_gateway_router(&self, router_id: &str, network_id: &str) -> Result<Router, ApiError> {
        let mut s = self.state();
        s.check("add_gateway_router")?;
        let router = s
            .routers
            .iter_mut()
            .find(|r| r.id == router_id)
            .ok_or_else(|| ApiError::not_found(format!("Router {} could not be found", router_id)))?;
        router.external_gateway_info = Some(GatewayInfo {
            network_id: network_id.to_string(),
        });
        Ok(router.clone())
    }

    fn add_interface_router(&self, router_id: &str, subnet_id: &str) -> Result<(), ApiError> {
        let mut s = self.state();
        s.check("add_interface_router")?;
        let pair = (router_id.to_string(), subnet_id.to_string());
        if s.interfaces.contains(&pair) {
            return Err(ApiError::rejected(
                400,
                format!("Router already has a port on subnet {}", subnet_id),
            ));
        }
        s.interfaces.push(pair);
        Ok(())
    }
}
