//! Credentials, API revision and retry policy shared by every call.

use log::debug;
use std::fmt;

use crate::config::{ClientConfig, RetryConfig};
use crate::error::{Error, Result};
use crate::http::HttpRequest;

/// Authorization scheme prefix for private API keys.
pub const API_KEY_SCHEME: &str = "Klaviyo-API-Key";

/// Supported authentication strategies.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A private API key sent as `Authorization: Klaviyo-API-Key <key>`.
    ApiKey(String),
}

impl Credentials {
    /// The `Authorization` header value, or `None` when the credential is blank.
    fn authorization(&self) -> Option<String> {
        match self {
            Credentials::ApiKey(key) if !key.trim().is_empty() => {
                Some(format!("{} {}", API_KEY_SCHEME, key))
            }
            Credentials::ApiKey(_) => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ApiKey(key) => f.debug_tuple("ApiKey").field(&mask_key(key)).finish(),
        }
    }
}

/// Immutable per-client state. Shared read-only across concurrent calls.
#[derive(Debug, Clone)]
pub struct Session {
    credentials: Option<Credentials>,
    revision: String,
    retry: RetryConfig,
}

impl Session {
    pub fn new(
        credentials: Option<Credentials>,
        revision: impl Into<String>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            credentials,
            revision: revision.into(),
            retry,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        if let Some(key) = &config.api_key {
            debug!("Using API key for authentication: {}", mask_key(key));
        }
        Self::new(
            config.api_key.clone().map(Credentials::ApiKey),
            config.revision.clone(),
            config.retry,
        )
    }

    /// Adds the `Authorization` header.
    ///
    /// Fails with [`Error::MissingCredential`] and leaves `request` untouched
    /// when no usable key is configured.
    pub fn apply_auth(&self, request: &mut HttpRequest) -> Result<()> {
        let value = self
            .credentials
            .as_ref()
            .and_then(Credentials::authorization)
            .ok_or(Error::MissingCredential)?;
        request.set_header("Authorization", value);
        Ok(())
    }

    pub fn retry_config(&self) -> RetryConfig {
        self.retry
    }

    pub fn api_revision(&self) -> &str {
        &self.revision
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials
            .as_ref()
            .and_then(Credentials::authorization)
            .is_some()
    }
}

/// Keeps only enough of a key to recognise it in logs.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*********".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
