//! Identity service access.
//!
//! `IdentityApi` is the set of identity operations the provisioning steps
//! consume. `KeystoneClient` implements it against the Keystone v2.0 admin API
//! using the bootstrap service token.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::config::ServiceCredentials;
use crate::error::ApiError;
use crate::http::JsonClient;
use crate::models::{NewTenant, NewUser, Role, Tenant, User};

/// Identity operations used while provisioning a tenant.
///
/// Implementations report "entity exists" as `ApiError::Conflict` and
/// "entity or assignment missing" as `ApiError::NotFound`.
pub trait IdentityApi {
    fn create_tenant(&self, tenant: &NewTenant) -> Result<Tenant, ApiError>;

    fn find_tenant_by_name(&self, name: &str) -> Result<Tenant, ApiError>;

    fn create_user(&self, user: &NewUser) -> Result<User, ApiError>;

    fn find_user_by_name(&self, name: &str) -> Result<User, ApiError>;

    fn find_role_by_name(&self, name: &str) -> Result<Role, ApiError>;

    /// Grant `role` to `user` on `tenant`
    fn add_user_role(&self, user: &User, role: &Role, tenant: &Tenant) -> Result<(), ApiError>;

    /// Revoke `role` from `user` on `tenant`
    fn remove_user_role(&self, user: &User, role: &Role, tenant: &Tenant)
    -> Result<(), ApiError>;
}

#[derive(Deserialize)]
struct TenantEnvelope {
    tenant: Tenant,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Deserialize)]
struct RolesEnvelope {
    roles: Vec<Role>,
}

/// Keystone v2.0 admin API client
#[derive(Debug, Clone)]
pub struct KeystoneClient {
    http: JsonClient,
}

impl KeystoneClient {
    /// Connect to the admin endpoint with the service token
    pub fn new(service: &ServiceCredentials, timeout: Duration) -> Result<Self, ApiError> {
        let http = JsonClient::new(&service.endpoint, Some(service.token.clone()), timeout)?;
        Ok(Self { http })
    }

    fn role_path(user: &User, role: &Role, tenant: &Tenant) -> String {
        format!(
            "/tenants/{}/users/{}/roles/OS-KSADM/{}",
            tenant.id, user.id, role.id
        )
    }
}

impl IdentityApi for KeystoneClient {
    fn create_tenant(&self, tenant: &NewTenant) -> Result<Tenant, ApiError> {
        let created: TenantEnvelope = self.http.post("/tenants", &json!({ "tenant": tenant }))?;
        Ok(created.tenant)
    }

    fn find_tenant_by_name(&self, name: &str) -> Result<Tenant, ApiError> {
        let found: TenantEnvelope = self.http.get_with_query("/tenants", &[("name", name)])?;
        Ok(found.tenant)
    }

    fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        let created: UserEnvelope = self.http.post("/users", &json!({ "user": user }))?;
        Ok(created.user)
    }

    fn find_user_by_name(&self, name: &str) -> Result<User, ApiError> {
        let found: UserEnvelope = self.http.get_with_query("/users", &[("name", name)])?;
        Ok(found.user)
    }

    fn find_role_by_name(&self, name: &str) -> Result<Role, ApiError> {
        let listed: RolesEnvelope = self.http.get("/OS-KSADM/roles")?;
        listed
            .roles
            .into_iter()
            .find(|role| role.name == name)
            .ok_or_else(|| ApiError::not_found(format!("role {}", name)))
    }

    fn add_user_role(&self, user: &User, role: &Role, tenant: &Tenant) -> Result<(), ApiError> {
        self.http.put_empty(&Self::role_path(user, role, tenant))
    }

    fn remove_user_role(
        &self,
        user: &User,
        role: &Role,
        tenant: &Tenant,
    ) -> Result<(), ApiError> {
        self.http.delete(&Self::role_path(user, role, tenant))
    }
}
