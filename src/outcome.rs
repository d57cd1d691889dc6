//! Outcome of a create-or-find call
//!
//! Every creation path treats "already exists" as success. Instead of catching
//! error categories at each call site, provisioning functions return a
//! `Provisioned<T>` so callers branch on an enumerated outcome.

use crate::error::{ApiError, ProvisionError, Result};
use serde::Serialize;
use strum::Display;

/// Which branch a create-or-find call took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OutcomeKind {
    Created,
    AlreadyExists,
    Failed,
}

/// Result of a create-or-find operation
#[derive(Debug)]
pub enum Provisioned<T> {
    /// The resource did not exist and was created
    Created(T),
    /// Creation conflicted; the existing resource was looked up instead
    AlreadyExists(T),
    /// Creation (or the fallback lookup) failed
    Failed(ProvisionError),
}

impl<T> Provisioned<T> {
    /// Turn a creation attempt into an outcome, falling back to `lookup`
    /// when the service reports a conflict.
    pub fn from_create<F>(created: std::result::Result<T, ApiError>, lookup: F) -> Self
    where
        F: FnOnce() -> std::result::Result<T, ApiError>,
    {
        match created {
            Ok(resource) => Self::Created(resource),
            Err(ApiError::Conflict { .. }) => match lookup() {
                Ok(existing) => Self::AlreadyExists(existing),
                Err(e) => Self::Failed(e.into()),
            },
            Err(e) => Self::Failed(e.into()),
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Created(_) => OutcomeKind::Created,
            Self::AlreadyExists(_) => OutcomeKind::AlreadyExists,
            Self::Failed(_) => OutcomeKind::Failed,
        }
    }

    /// The resource, whether new or pre-existing
    pub fn resource(&self) -> Option<&T> {
        match self {
            Self::Created(r) | Self::AlreadyExists(r) => Some(r),
            Self::Failed(_) => None,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    /// Collapse into a plain result, discarding the created/existing distinction
    pub fn into_result(self) -> Result<T> {
        match self {
            Self::Created(r) | Self::AlreadyExists(r) => Ok(r),
            Self::Failed(e) => Err(e),
        }
    }

    /// Like `into_result`, but keep the outcome kind alongside the resource
    pub fn into_parts(self) -> Result<(T, OutcomeKind)> {
        let kind = self.kind();
        self.into_result().map(|r| (r, kind))
    }
}
