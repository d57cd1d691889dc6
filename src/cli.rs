use clap::Parser;

use crate::pipeline::{DEFAULT_EXTERNAL_NETWORK, DEFAULT_PRIVATE_CIDR, ProvisionRequest};
use crate::provision::DEFAULT_MEMBER_ROLE;

/// Script for creating testing tenant
///
/// Creates a tenant named after the user's email, the user itself with the
/// membership role, a private network with a subnet, and a router connecting
/// that subnet to the external network. The cloud admin is granted admin on
/// the tenant while the network is built, then revoked.
#[derive(Parser, Debug)]
#[command(name = "create-test-tenant")]
#[command(about = "Provision a closed-beta tenant with its own user, network and router")]
#[command(version)]
pub struct Cli {
    /// User email; also the tenant name unless --tenusername is given
    pub user_email: String,

    /// Password for the user
    pub password: String,

    /// Name of external network
    #[arg(short = 'e', long, default_value = DEFAULT_EXTERNAL_NETWORK)]
    pub extnet: String,

    /// Tenant and user name (defaults to the email address)
    #[arg(short = 't', long)]
    pub tenusername: Option<String>,

    /// CIDR of the private subnet
    #[arg(short, long, default_value = DEFAULT_PRIVATE_CIDR)]
    pub cidr: String,

    /// Membership role given to the user
    #[arg(short = 'r', long, default_value = DEFAULT_MEMBER_ROLE)]
    pub member_role: String,

    /// Print the provisioning report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// Pipeline input described by these arguments
    pub fn to_request(&self) -> ProvisionRequest {
        let request = ProvisionRequest::new(&self.user_email, &self.password)
            .with_external_network(&self.extnet)
            .with_cidr(&self.cidr)
            .with_member_role(&self.member_role);
        // blank -t falls back to the email, like an absent one
        match self.tenusername.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => request.with_tenant_name(name),
            _ => request,
        }
    }
}
