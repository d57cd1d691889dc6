//! create-test-tenant - Main entry point
//!
//! Provisions one closed-beta tenant and exits non-zero on the first
//! unrecoverable failure.

use anyhow::Context;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use create_test_tenant::cli::Cli;
use create_test_tenant::{KeystoneClient, NeutronClient, Settings, TracingSink, provision};

/// Initialize the logger with appropriate settings
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    // Allows RUST_LOG env var to override
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    debug!("CLI arguments parsed");

    let settings = Settings::from_env().context("Failed to load credentials from environment")?;
    debug!(?settings, "settings loaded");

    let request = cli.to_request();
    info!(
        tenant = request.tenant_name(),
        email = %request.user.email,
        "provisioning tenant"
    );

    let identity = KeystoneClient::new(&settings.service, settings.timeout)
        .context("Failed to create identity client")?;
    let events = TracingSink;

    let report = provision(
        &identity,
        |tenant| NeutronClient::connect(&settings, &tenant.name),
        &request,
        &events,
    )
    .with_context(|| format!("Provisioning of tenant {} failed", request.tenant_name()))?;

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        info!(
            tenant_id = %report.tenant.id,
            user_id = %report.user.id,
            network_id = %report.network.id,
            subnet = report.subnet.as_ref().map(|s| s.cidr.as_str()).unwrap_or("none"),
            router_id = %report.router.router.id,
            gateway = report.router.gateway_attached,
            interface = report.router.interface_attached,
            admin_revoked = report.admin_revoked,
            "tenant {} ready",
            report.tenant.name
        );
    }

    Ok(())
}
