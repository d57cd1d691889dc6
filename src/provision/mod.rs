//! Provisioning steps, one module per remote resource family.
//!
//! Each step is a create-or-find operation against an `IdentityApi` or
//! `NetworkingApi` that reports notable outcomes through an `EventSink`.
//!
//! # Modules
//!
//! - `tenant`: tenant create-or-find
//! - `users`: end user, membership role, temporary admin grant
//! - `network`: private network and its subnet
//! - `router`: router, external gateway, subnet interface

pub mod network;
pub mod router;
pub mod tenant;
pub mod users;

pub use network::{create_internal_network, validate_cidr};
pub use router::{RouterAttachment, RouterNames, create_router};
pub use tenant::{TENANT_DESCRIPTION, create_tenant};
pub use users::{
    ADMIN_ROLE, ADMIN_USER, DEFAULT_MEMBER_ROLE, UserRequest, create_and_assign_users,
    unassign_admin_from_tenant,
};
