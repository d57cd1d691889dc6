//! End user, membership role and the temporary admin grant.

use std::fmt;

use tracing::debug;

use crate::error::{ApiError, Result};
use crate::events::{EventSink, ProvisionEvent};
use crate::identity::IdentityApi;
use crate::models::{NewUser, Role, Tenant, User};
use crate::outcome::{OutcomeKind, Provisioned};

/// Role giving ordinary access to a tenant
pub const DEFAULT_MEMBER_ROLE: &str = "_member_";
/// Cloud administrator account granted temporary access to new tenants
pub const ADMIN_USER: &str = "admin";
pub const ADMIN_ROLE: &str = "admin";

/// Who to create and what to grant
#[derive(Clone, PartialEq, Eq)]
pub struct UserRequest {
    pub email: String,
    pub password: String,
    pub role_name: String,
    /// Login name; the email when unset
    pub username: Option<String>,
    /// Also grant the admin user the admin role on the tenant
    pub assign_admin: bool,
}

impl UserRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role_name: DEFAULT_MEMBER_ROLE.to_string(),
            username: None,
            assign_admin: false,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_role(mut self, role_name: impl Into<String>) -> Self {
        self.role_name = role_name.into();
        self
    }

    pub fn with_admin(mut self, assign_admin: bool) -> Self {
        self.assign_admin = assign_admin;
        self
    }

    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.email)
    }
}

impl fmt::Debug for UserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role_name", &self.role_name)
            .field("username", &self.username)
            .field("assign_admin", &self.assign_admin)
            .finish()
    }
}

/// Create (or find) the user inside `tenant`, give it the membership role and,
/// when requested, grant the admin user the admin role on the tenant.
///
/// Existing users and existing role assignments are reported as events and
/// otherwise treated as success.
pub fn create_and_assign_users(
    identity: &dyn IdentityApi,
    request: &UserRequest,
    tenant: &Tenant,
    events: &dyn EventSink,
) -> Provisioned<User> {
    let username = request.username();
    let new_user = NewUser {
        name: username.to_string(),
        password: request.password.clone(),
        email: request.email.clone(),
        tenant_id: tenant.id.clone(),
        enabled: true,
    };
    debug!(user = username, tenant = %tenant.name, "creating user");

    let outcome = Provisioned::from_create(identity.create_user(&new_user), || {
        identity.find_user_by_name(username)
    });
    let (user, kind) = match outcome.into_parts() {
        Ok(parts) => parts,
        Err(e) => return Provisioned::Failed(e),
    };
    if kind == OutcomeKind::AlreadyExists {
        events.emit(ProvisionEvent::UserExists {
            user: username.to_string(),
        });
    }

    if let Err(e) = assign_roles(identity, request, &user, tenant, events) {
        return Provisioned::Failed(e);
    }

    match kind {
        OutcomeKind::Created => Provisioned::Created(user),
        _ => Provisioned::AlreadyExists(user),
    }
}

fn assign_roles(
    identity: &dyn IdentityApi,
    request: &UserRequest,
    user: &User,
    tenant: &Tenant,
    events: &dyn EventSink,
) -> Result<()> {
    let member_role = identity.find_role_by_name(&request.role_name)?;
    grant(identity, user, &member_role, tenant, events)?;

    if request.assign_admin {
        let admin_user = identity.find_user_by_name(ADMIN_USER)?;
        let admin_role = identity.find_role_by_name(ADMIN_ROLE)?;
        grant(identity, &admin_user, &admin_role, tenant, events)?;
    }
    Ok(())
}

fn grant(
    identity: &dyn IdentityApi,
    user: &User,
    role: &Role,
    tenant: &Tenant,
    events: &dyn EventSink,
) -> Result<()> {
    match identity.add_user_role(user, role, tenant) {
        Ok(()) => {
            debug!(user = %user.name, role = %role.name, tenant = %tenant.name, "role granted");
            Ok(())
        }
        Err(ApiError::Conflict { .. }) => {
            events.emit(ProvisionEvent::RoleAlreadyAssigned {
                user: user.name.clone(),
                role: role.name.clone(),
                tenant: tenant.name.clone(),
            });
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Revoke the admin user's admin role on `tenant`.
///
/// Returns `Ok(false)` when the identity service reports the assignment as not
/// found, `Ok(true)` when it was removed.
pub fn unassign_admin_from_tenant(
    identity: &dyn IdentityApi,
    tenant: &Tenant,
    events: &dyn EventSink,
) -> Result<bool> {
    let admin_user = identity.find_user_by_name(ADMIN_USER)?;
    let admin_role = identity.find_role_by_name(ADMIN_ROLE)?;

    match identity.remove_user_role(&admin_user, &admin_role, tenant) {
        Ok(()) => {
            debug!(tenant = %tenant.name, "admin role revoked");
            Ok(true)
        }
        Err(ApiError::NotFound { message }) => {
            events.emit(ProvisionEvent::AdminUnassignFailed {
                tenant: tenant.name.clone(),
                reason: message,
            });
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_defaults_to_email() {
        let request = UserRequest::new("alice@example.com", "pw");
        assert_eq!(request.username(), "alice@example.com");
        assert_eq!(request.role_name, DEFAULT_MEMBER_ROLE);
        assert!(!request.assign_admin);

        let request = request.with_username("alice").with_admin(true);
        assert_eq!(request.username(), "alice");
        assert!(request.assign_admin);
    }

    #[test]
    fn test_debug_hides_password() {
        let request = UserRequest::new("alice@example.com", "pw123");
        assert!(!format!("{:?}", request).contains("pw123"));
    }
}
