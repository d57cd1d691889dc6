//! Tenant create-or-find.

use tracing::debug;

use crate::events::{EventSink, ProvisionEvent};
use crate::identity::IdentityApi;
use crate::models::{NewTenant, Tenant};
use crate::outcome::Provisioned;

/// Description given to every tenant this tool creates
pub const TENANT_DESCRIPTION: &str = "Closed Beta Test";

/// Create an enabled tenant named `name`, or return the existing one.
pub fn create_tenant(
    identity: &dyn IdentityApi,
    name: &str,
    events: &dyn EventSink,
) -> Provisioned<Tenant> {
    let request = NewTenant {
        name: name.to_string(),
        description: TENANT_DESCRIPTION.to_string(),
        enabled: true,
    };
    debug!(tenant = name, "creating tenant");

    let outcome = Provisioned::from_create(identity.create_tenant(&request), || {
        identity.find_tenant_by_name(name)
    });
    if let Provisioned::AlreadyExists(_) = outcome {
        events.emit(ProvisionEvent::TenantExists {
            tenant: name.to_string(),
        });
    }
    outcome
}
