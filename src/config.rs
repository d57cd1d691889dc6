//! Configuration management module
//!
//! Loads operator and service credentials from the environment once at startup.
//! The resulting `Settings` value is passed explicitly to everything that needs
//! it; nothing else in the crate reads the environment.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{ProvisionError, Result};

pub const ENV_USERNAME: &str = "OS_USERNAME";
pub const ENV_PASSWORD: &str = "OS_PASSWORD";
pub const ENV_AUTH_URL: &str = "OS_AUTH_URL";
pub const ENV_SERVICE_TOKEN: &str = "OS_SERVICE_TOKEN";
pub const ENV_SERVICE_ENDPOINT: &str = "OS_SERVICE_ENDPOINT";
pub const ENV_REGION_NAME: &str = "OS_REGION_NAME";
pub const ENV_ENDPOINT_TYPE: &str = "OS_ENDPOINT_TYPE";
pub const ENV_HTTP_TIMEOUT: &str = "PROVISION_HTTP_TIMEOUT_SECS";

/// Default per-request timeout for both service clients
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Operator account used to obtain tenant-scoped tokens
#[derive(Clone, PartialEq, Eq)]
pub struct OperatorCredentials {
    pub username: String,
    pub password: String,
    /// Identity endpoint used for token requests (e.g. `http://keystone:5000/v2.0`)
    pub auth_url: String,
}

impl fmt::Debug for OperatorCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("auth_url", &self.auth_url)
            .finish()
    }
}

/// Bootstrap token for the identity admin API
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceCredentials {
    pub token: String,
    /// Identity admin endpoint (e.g. `http://keystone:35357/v2.0`)
    pub endpoint: String,
}

impl fmt::Debug for ServiceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCredentials")
            .field("token", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Which catalog URL to use for the networking service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString)]
pub enum EndpointType {
    #[default]
    #[strum(serialize = "publicURL")]
    #[serde(rename = "publicURL")]
    Public,
    #[strum(serialize = "internalURL")]
    #[serde(rename = "internalURL")]
    Internal,
    #[strum(serialize = "adminURL")]
    #[serde(rename = "adminURL")]
    Admin,
}

/// Everything the pipeline needs from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub operator: OperatorCredentials,
    pub service: ServiceCredentials,
    /// Region used to pick the networking endpoint from the catalog
    pub region: Option<String>,
    pub endpoint_type: EndpointType,
    pub timeout: Duration,
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::from_env_map(&env)
    }

    /// Read settings from an explicit variable map
    pub fn from_env_map(env: &HashMap<String, String>) -> Result<Self> {
        let service = ServiceCredentials {
            token: required(env, ENV_SERVICE_TOKEN)?,
            endpoint: required(env, ENV_SERVICE_ENDPOINT)?,
        };
        let operator = OperatorCredentials {
            username: required(env, ENV_USERNAME)?,
            password: required(env, ENV_PASSWORD)?,
            auth_url: required(env, ENV_AUTH_URL)?,
        };

        let endpoint_type = match optional(env, ENV_ENDPOINT_TYPE) {
            Some(raw) => raw.parse().map_err(|_| {
                ProvisionError::config(format!(
                    "{} must be publicURL, internalURL or adminURL (got '{}')",
                    ENV_ENDPOINT_TYPE, raw
                ))
            })?,
            None => EndpointType::default(),
        };

        let timeout_secs = match optional(env, ENV_HTTP_TIMEOUT) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                ProvisionError::config(format!(
                    "{} must be a whole number of seconds (got '{}')",
                    ENV_HTTP_TIMEOUT, raw
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            operator,
            service,
            region: optional(env, ENV_REGION_NAME).map(str::to_string),
            endpoint_type,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn required(env: &HashMap<String, String>, name: &str) -> Result<String> {
    optional(env, name)
        .map(str::to_string)
        .ok_or_else(|| ProvisionError::missing_env(name))
}

/// Empty values count as unset
fn optional<'a>(env: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    env.get(name).map(String::as_str).filter(|v| !v.is_empty())
}
