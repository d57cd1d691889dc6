//! Error handling module for tenant provisioning
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Remote call failures are `ApiError`s, categorised so callers can branch on
//! "already exists" and "not found" without inspecting messages.

use thiserror::Error;

/// Failure of a single call against the identity or networking service
#[derive(Error, Debug)]
pub enum ApiError {
    /// The entity already exists (HTTP 409)
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// The entity or relation does not exist (HTTP 404)
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Any other rejected request (auth failure, bad request, server error)
    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Connection, TLS or timeout failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not the expected JSON document
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict {
            message: msg.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound {
            message: msg.into(),
        }
    }

    /// Create a rejection error for an arbitrary status
    pub fn rejected(status: u16, msg: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: msg.into(),
        }
    }

    /// Classify a non-success HTTP status and its error message
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            409 => Self::conflict(message),
            404 => Self::not_found(message),
            _ => Self::rejected(status, message),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Main error type for the provisioning pipeline
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// A required environment variable is absent or empty
    #[error("Missing environment variable: {name}")]
    MissingEnvVar { name: String },

    /// Configuration errors (unparsable optional settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors (operator input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Token request or service catalog problems
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Remote service call failed
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// JSON serialization errors (report output)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for provisioning operations
pub type Result<T> = std::result::Result<T, ProvisionError>;

impl ProvisionError {
    /// Create a missing environment variable error
    pub fn missing_env(name: impl Into<String>) -> Self {
        Self::MissingEnvVar { name: name.into() }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// The underlying remote error, if this failure came from a service call
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProvisionError::missing_env("OS_PASSWORD");
        assert_eq!(err.to_string(), "Missing environment variable: OS_PASSWORD");

        let err = ProvisionError::validation("bad cidr");
        assert_eq!(err.to_string(), "Validation error: bad cidr");
    }

    #[test]
    fn test_status_classification() {
        assert!(ApiError::from_status(409, "dup").is_conflict());
        assert!(ApiError::from_status(404, "gone").is_not_found());
        assert!(matches!(
            ApiError::from_status(401, "denied"),
            ApiError::Rejected { status: 401, .. }
        ));
    }

    #[test]
    fn test_api_error_conversion() {
        let err: ProvisionError = ApiError::conflict("tenant exists").into();
        assert!(err.api().is_some_and(ApiError::is_conflict));
        assert!(ProvisionError::config("x").api().is_none());
    }
}
