//! Provisioning events
//!
//! Provisioning functions report notable outcomes (reuse of an existing
//! resource, ignored rejections, missing attachments) as `ProvisionEvent`s
//! through an injected `EventSink`. The binary forwards them to `tracing`;
//! tests record them and assert on the exact sequence.

use std::fmt;
use std::sync::Mutex;

use strum::IntoStaticStr;
use tracing::{error, info, warn};

/// Something worth telling the operator about
#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ProvisionEvent {
    TenantExists {
        tenant: String,
    },
    UserExists {
        user: String,
    },
    RoleAlreadyAssigned {
        user: String,
        role: String,
        tenant: String,
    },
    AdminUnassignFailed {
        tenant: String,
        reason: String,
    },
    NetworkExists {
        network: String,
    },
    SubnetRejected {
        subnet: String,
        cidr: String,
        reason: String,
    },
    RouterExists {
        router: String,
    },
    ExternalNetworkMissing {
        network: String,
    },
    PrivateSubnetMissing {
        subnet: String,
    },
    InterfaceRejected {
        router: String,
        subnet: String,
        reason: String,
    },
}

/// How loudly an event should be reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Notice,
    Warning,
    Error,
}

impl ProvisionEvent {
    /// Stable snake_case name of the event
    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::TenantExists { .. }
            | Self::UserExists { .. }
            | Self::RoleAlreadyAssigned { .. }
            | Self::NetworkExists { .. }
            | Self::RouterExists { .. } => Severity::Notice,
            Self::AdminUnassignFailed { .. }
            | Self::SubnetRejected { .. }
            | Self::InterfaceRejected { .. } => Severity::Warning,
            Self::ExternalNetworkMissing { .. } | Self::PrivateSubnetMissing { .. } => {
                Severity::Error
            }
        }
    }
}

impl fmt::Display for ProvisionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TenantExists { tenant } => write!(f, "Tenant {} already exists", tenant),
            Self::UserExists { user } => write!(f, "User {} already exists", user),
            Self::RoleAlreadyAssigned { user, role, tenant } => write!(
                f,
                "User {} already has role {} in tenant {}",
                user, role, tenant
            ),
            Self::AdminUnassignFailed { tenant, reason } => write!(
                f,
                "Unassignment of admin from tenant {} unsuccessful: {}",
                tenant, reason
            ),
            Self::NetworkExists { network } => write!(f, "Network {} already exists", network),
            Self::SubnetRejected { subnet, cidr, reason } => write!(
                f,
                "Subnet {} ({}) not created: {}",
                subnet, cidr, reason
            ),
            Self::RouterExists { router } => write!(f, "Router {} already exists", router),
            Self::ExternalNetworkMissing { network } => write!(
                f,
                "External network {} not found. Router not connected!",
                network
            ),
            Self::PrivateSubnetMissing { subnet } => write!(
                f,
                "Private subnet {} not found. Router not connected!",
                subnet
            ),
            Self::InterfaceRejected {
                router,
                subnet,
                reason,
            } => write!(
                f,
                "Router {} interface on subnet {} rejected: {}",
                router, subnet, reason
            ),
        }
    }
}

/// Receiver for provisioning events
pub trait EventSink {
    fn emit(&self, event: ProvisionEvent);
}

/// Forwards events to `tracing` at a level matching their severity
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: ProvisionEvent) {
        let name = event.name();
        match event.severity() {
            Severity::Notice => info!(event = name, "{}", event),
            Severity::Warning => warn!(event = name, "{}", event),
            Severity::Error => error!(event = name, "{}", event),
        }
    }
}

/// Keeps every event in memory, in emission order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ProvisionEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far
    pub fn events(&self) -> Vec<ProvisionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(ProvisionEvent::name).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: ProvisionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
