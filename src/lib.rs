//! Typed client for the Klaviyo REST API.
//!
//! Every resource API funnels through one pipeline: the [`Session`] attaches
//! credentials and the pinned revision, the retry executor re-sends on
//! transient statuses, and the dispatcher maps the final response to raw
//! bytes or a typed [`Error`].

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod session;

pub use client::Client;
pub use config::{ClientConfig, RetryConfig};
pub use error::{ApiError, ApiErrorResponse, Error, ErrorSource, ResponseError, Result, TransportError};
pub use session::{Credentials, Session};
pub use tokio_util::sync::CancellationToken;

/// Test utilities shared by the unit tests.
#[cfg(test)]
pub mod test_utils {
    use crate::{Client, ClientConfig, RetryConfig};

    /// A client with a test key and a single-attempt retry policy.
    pub fn test_client(base_url: &str) -> Client {
        let config = ClientConfig::new("pk_test")
            .with_base_url(base_url)
            .with_retry(RetryConfig::no_retry());
        Client::new(config).unwrap()
    }
}
