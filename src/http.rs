//! Blocking JSON transport shared by the identity and networking clients.
//!
//! Handles token headers, URL joining, and classification of non-success
//! responses into `ApiError` categories.

use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;

pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// JSON-over-HTTP client bound to one base URL and (optionally) one token
#[derive(Debug, Clone)]
pub struct JsonClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl JsonClient {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            http,
        })
    }

    /// Same transport, different endpoint or token
    pub fn rebind(&self, base_url: &str, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            http: self.http.clone(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_with_query(path, &[])
    }

    pub fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let body = self.send(self.request(Method::GET, path).query(query))?;
        Ok(serde_json::from_str(&body)?)
    }

    pub fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &B,
    ) -> Result<T, ApiError> {
        let body = self.send(self.request(Method::POST, path).json(payload))?;
        Ok(serde_json::from_str(&body)?)
    }

    pub fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &B,
    ) -> Result<T, ApiError> {
        let body = self.send(self.request(Method::PUT, path).json(payload))?;
        Ok(serde_json::from_str(&body)?)
    }

    /// PUT without a request body; the response body is ignored
    pub fn put_empty(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::PUT, path)).map(|_| ())
    }

    pub fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path)).map(|_| ())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, %url, "service request");
        let builder = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");
        match &self.token {
            Some(token) => builder.header(AUTH_TOKEN_HEADER, token),
            None => builder,
        }
    }

    fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;
        debug!(status = status.as_u16(), "service response");
        if status.is_success() {
            Ok(body)
        } else {
            Err(ApiError::from_status(status.as_u16(), error_message(&body)))
        }
    }
}

/// Pull the human-readable message out of a Keystone or Neutron error body
pub fn error_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return trimmed.to_string();
    };
    let candidates = [
        value.pointer("/error/message"),
        value.pointer("/NeutronError/message"),
        value.get("NeutronError"),
        value.get("message"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| trimmed.to_string())
}
