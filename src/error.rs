//! Error taxonomy for API calls.
//!
//! Every call made through the client fails with exactly one [`Error`] kind.
//! Non-2xx responses carry the decoded upstream error envelope in
//! [`ResponseError`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for API calls.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by the request pipeline and the resource APIs.
#[derive(Debug, Error)]
pub enum Error {
    /// The session has no API key configured.
    #[error("Missing credential: no API key configured. Set KLAVIYO_API_KEY or pass one explicitly.")]
    MissingCredential,

    /// The request never produced an HTTP response (connection, DNS, timeout).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A JSON body could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The API answered with a well-formed non-2xx response.
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// The caller cancelled the call while an attempt or a retry delay was pending.
    #[error("Request cancelled")]
    Cancelled,
}

impl Error {
    /// HTTP status of the final response, when the error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Response(e) => Some(e.status),
            _ => None,
        }
    }
}

/// Failure of the underlying transport before any response was received.
#[derive(Debug, Error)]
#[error("Transport error: {source}")]
pub struct TransportError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl TransportError {
    pub fn new<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self {
            source: error.into(),
        }
    }

    /// Returns the wrapped error, e.g. for downcasting to `reqwest::Error`.
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }
}

/// A non-2xx response whose body decoded as an [`ApiErrorResponse`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseError {
    pub status: u16,
    pub body: ApiErrorResponse,
}

impl ResponseError {
    pub fn new(status: u16, body: ApiErrorResponse) -> Self {
        Self { status, body }
    }

    pub fn errors(&self) -> &[ApiError] {
        &self.body.errors
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error (HTTP {})", self.status)?;
        match self.body.errors.as_slice() {
            [] => Ok(()),
            [first, rest @ ..] => {
                write!(f, ": {}", first)?;
                if !rest.is_empty() {
                    write!(f, " (and {} more)", rest.len())?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ResponseError {}

/// The upstream error envelope: `{"errors": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ApiErrorResponse {
    pub errors: Vec<ApiError>,
}

/// One entry of the upstream error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub id: String,
    pub code: String,
    pub title: String,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.title, self.detail)?;
        if let Some(source) = &self.source {
            if let Some(pointer) = &source.pointer {
                write!(f, " (at {})", pointer)?;
            } else if let Some(parameter) = &source.parameter {
                write!(f, " (parameter {})", parameter)?;
            }
        }
        Ok(())
    }
}

/// Where in the request an error originated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ErrorSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}
