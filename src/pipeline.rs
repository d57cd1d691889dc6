//! Provisioning pipeline
//!
//! Runs the steps strictly in order, each feeding the next:
//!
//! ```text
//! Tenant -> User (+ temporary admin) -> NetworkSession -> Network -> Router -> RevokeAdmin
//! ```
//!
//! There is no rollback: a failing stage aborts the run and leaves whatever the
//! earlier stages created in place. Every stage is a create-or-find, so running
//! the pipeline again after fixing the cause is safe.

use serde::Serialize;
use strum::Display;
use tracing::{error, info};

use crate::error::Result;
use crate::events::EventSink;
use crate::identity::IdentityApi;
use crate::models::{Network, Subnet, Tenant, User};
use crate::networking::NetworkingApi;
use crate::outcome::OutcomeKind;
use crate::provision::{
    RouterAttachment, RouterNames, UserRequest, create_and_assign_users,
    create_internal_network, create_router, create_tenant, unassign_admin_from_tenant,
};

pub const DEFAULT_EXTERNAL_NETWORK: &str = "external_network";
pub const DEFAULT_PRIVATE_CIDR: &str = "5.1.1.0/24";

const NETWORK_PREFIX: &str = "private_network_";
const ROUTER_PREFIX: &str = "external_router_";

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Tenant,
    User,
    NetworkSession,
    Network,
    Router,
    RevokeAdmin,
}

/// Operator input for one tenant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub user: UserRequest,
    /// Tenant name (and user name) override; the email when unset
    pub tenant_name: Option<String>,
    pub external_network: String,
    pub cidr: String,
}

impl ProvisionRequest {
    pub fn new(user_email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: UserRequest::new(user_email, password),
            tenant_name: None,
            external_network: DEFAULT_EXTERNAL_NETWORK.to_string(),
            cidr: DEFAULT_PRIVATE_CIDR.to_string(),
        }
    }

    /// Use `name` for both the tenant and the user instead of the email
    pub fn with_tenant_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.user = self.user.with_username(name.clone());
        self.tenant_name = Some(name);
        self
    }

    pub fn with_external_network(mut self, name: impl Into<String>) -> Self {
        self.external_network = name.into();
        self
    }

    pub fn with_cidr(mut self, cidr: impl Into<String>) -> Self {
        self.cidr = cidr.into();
        self
    }

    pub fn with_member_role(mut self, role: impl Into<String>) -> Self {
        self.user = self.user.with_role(role);
        self
    }

    pub fn tenant_name(&self) -> &str {
        self.tenant_name.as_deref().unwrap_or(&self.user.email)
    }

    pub fn network_name(&self) -> String {
        format!("{}{}", NETWORK_PREFIX, self.tenant_name())
    }

    pub fn router_names(&self) -> RouterNames {
        RouterNames {
            router: format!("{}{}", ROUTER_PREFIX, self.tenant_name()),
            external_network: self.external_network.clone(),
            private_subnet: crate::provision::network::subnet_name(&self.network_name()),
        }
    }
}

/// Everything a successful run created or found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub tenant: Tenant,
    pub tenant_outcome: OutcomeKind,
    pub user: User,
    pub user_outcome: OutcomeKind,
    pub network: Network,
    /// `None` when the networking service rejected the subnet
    pub subnet: Option<Subnet>,
    pub router: RouterAttachment,
    pub admin_revoked: bool,
}

impl ProvisionReport {
    /// Pretty-printed JSON for `--json` output
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run every stage for `request`.
///
/// `connect` opens a networking session scoped to the (new) tenant.
pub fn provision<N, C>(
    identity: &dyn IdentityApi,
    connect: C,
    request: &ProvisionRequest,
    events: &dyn EventSink,
) -> Result<ProvisionReport>
where
    N: NetworkingApi,
    C: FnOnce(&Tenant) -> Result<N>,
{
    let tenant_name = request.tenant_name();

    let (tenant, tenant_outcome) = run_stage(Stage::Tenant, || {
        create_tenant(identity, tenant_name, events).into_parts()
    })?;

    let user_request = request.user.clone().with_admin(true);
    let (user, user_outcome) = run_stage(Stage::User, || {
        create_and_assign_users(identity, &user_request, &tenant, events).into_parts()
    })?;

    let networking = run_stage(Stage::NetworkSession, || connect(&tenant))?;

    let network_name = request.network_name();
    let (network, subnet) = run_stage(Stage::Network, || {
        create_internal_network(&networking, &network_name, &request.cidr, events)
    })?;

    let router = run_stage(Stage::Router, || {
        create_router(&networking, &request.router_names(), events)
    })?;

    let admin_revoked = run_stage(Stage::RevokeAdmin, || {
        unassign_admin_from_tenant(identity, &tenant, events)
    })?;

    info!(tenant = %tenant.name, "tenant provisioned");
    Ok(ProvisionReport {
        tenant,
        tenant_outcome,
        user,
        user_outcome,
        network,
        subnet,
        router,
        admin_revoked,
    })
}

fn run_stage<T>(stage: Stage, f: impl FnOnce() -> Result<T>) -> Result<T> {
    info!(%stage, "stage started");
    f().inspect_err(|e| error!(%stage, error = %e, "stage failed"))
}
