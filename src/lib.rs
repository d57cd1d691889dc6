//! Closed-beta tenant provisioning library
//!
//! This library provides the steps for bootstrapping a self-service tenant on an
//! OpenStack cloud: identity tenant, user and roles, private network, and the
//! router connecting it to the external network.

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod identity;
pub mod models;
pub mod networking;
pub mod outcome;
pub mod pipeline;
pub mod provision;

// Re-export main types for convenience
pub use config::{EndpointType, OperatorCredentials, ServiceCredentials, Settings};
pub use error::{ApiError, ProvisionError, Result};
pub use events::{EventSink, ProvisionEvent, RecordingSink, TracingSink};
pub use identity::{IdentityApi, KeystoneClient};
pub use models::{Network, Role, Router, Subnet, Tenant, User};
pub use networking::{NetworkingApi, NeutronClient};
pub use outcome::{OutcomeKind, Provisioned};
pub use pipeline::{ProvisionReport, ProvisionRequest, Stage, provision};
pub use provision::{
    RouterAttachment, RouterNames, UserRequest, create_and_assign_users, create_internal_network,
    create_router, create_tenant, unassign_admin_from_tenant,
};
