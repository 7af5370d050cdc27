//! reqwest-backed [`Transport`].

use anyhow::Context;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method};
use std::time::Duration;

use super::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::error::TransportError;

const USER_AGENT: &str = concat!("klaviyo-api-rust/", env!("KLAVIYO_CLIENT_VERSION"));

/// Sends requests through a shared reqwest connection pool.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Wraps an existing reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a Client with this crate's user agent and an optional
    /// per-request timeout.
    pub fn with_timeout(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self::new(client))
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!("{} {}...", request.method, request.url);

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(TransportError::new)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        // Drain the whole body so the connection goes back to the pool.
        let body = response.bytes().await.map_err(TransportError::new)?;

        debug!("{} {} -> HTTP {} ({} bytes)", request.method, request.url, status, body.len());

        Ok(HttpResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}
