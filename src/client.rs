//! Client facade: URL building, JSON encoding and the resource API entry points.

use anyhow::{Context, bail};
use log::debug;
use reqwest::Url;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::api::{Accounts, Campaigns, Catalog, Flows, Images, Tags, Templates};
use crate::config::{ClientConfig, Environment, SystemEnvironment};
use crate::error::Result;
use crate::http::{Dispatcher, HttpMethod, HttpRequest, ReqwestTransport, Transport};
use crate::session::Session;

/// Entry point for all API calls.
///
/// Cheap to clone; clones share the session and the connection pool.
#[derive(Clone)]
pub struct Client {
    base_url: Url,
    dispatcher: Dispatcher,
    cancel: CancellationToken,
}

impl Client {
    /// Creates a client that talks to the API over reqwest.
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::with_timeout(config.timeout)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a client configured from `KLAVIYO_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_environment(&SystemEnvironment)
    }

    pub fn from_environment(env: &impl Environment) -> anyhow::Result<Self> {
        let config = ClientConfig::from_env(env)?;
        Self::new(config)
    }

    /// Creates a client on top of a custom transport.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid API base URL: {}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("Invalid API base URL: {}", config.base_url);
        }

        debug!(
            "Creating client for {} (revision {})",
            base_url, config.revision
        );

        let session = Arc::new(Session::from_config(&config));
        Ok(Self {
            base_url,
            dispatcher: Dispatcher::new(session, transport),
            cancel: CancellationToken::new(),
        })
    }

    /// Returns a clone whose calls abort with [`crate::Error::Cancelled`]
    /// once `cancel` fires.
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self {
            cancel,
            ..self.clone()
        }
    }

    pub fn session(&self) -> &Session {
        self.dispatcher.session()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Joins `path` onto the base URL (with a trailing slash) and appends `query`.
    pub fn url(&self, path: &str, query: &[(&str, &str)]) -> String {
        let mut url = self.base_url.clone();
        // Base URLs that cannot be a base are rejected in `with_transport`.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
            segments.push("");
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url.into()
    }

    pub fn request(&self, method: HttpMethod, path: &str, query: &[(&str, &str)]) -> HttpRequest {
        HttpRequest::new(method, self.url(path, query))
    }

    /// Sends a prepared request and returns the raw success body.
    pub async fn execute(&self, request: HttpRequest) -> Result<Vec<u8>> {
        self.dispatcher
            .execute_with_cancellation(request, &self.cancel)
            .await
    }

    /// Sends a prepared request and decodes the success body as JSON.
    pub async fn execute_json<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T> {
        let bytes = self.execute(request).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    #[tracing::instrument(skip(self, query))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        debug!("GET {} with query {:?}...", path, query);
        self.execute_json(self.request(HttpMethod::Get, path, query))
            .await
    }

    #[tracing::instrument(skip(self, body))]
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(HttpMethod::Post, path, &[])
            .with_json_body(body)?;
        self.execute_json(request).await
    }

    #[tracing::instrument(skip(self, body))]
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(HttpMethod::Patch, path, &[])
            .with_json_body(body)?;
        self.execute_json(request).await
    }

    /// Sends a DELETE; the (usually empty) success body is discarded.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute(self.request(HttpMethod::Delete, path, &[]))
            .await?;
        Ok(())
    }

    pub fn accounts(&self) -> Accounts<'_> {
        Accounts::new(self)
    }

    pub fn campaigns(&self) -> Campaigns<'_> {
        Campaigns::new(self)
    }

    pub fn catalog(&self) -> Catalog<'_> {
        Catalog::new(self)
    }

    pub fn flows(&self) -> Flows<'_> {
        Flows::new(self)
    }

    pub fn images(&self) -> Images<'_> {
        Images::new(self)
    }

    pub fn tags(&self) -> Tags<'_> {
        Tags::new(self)
    }

    pub fn templates(&self) -> Templates<'_> {
        Templates::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::config::{MockEnvironment, RetryConfig};
    use crate::test_utils::test_client;
    use std::time::Duration;

    #[test]
    fn test_url_joins_path_with_trailing_slash() {
        let client = test_client("http://localhost:1234/api");
        assert_eq!(
            client.url("campaigns", &[]),
            "http://localhost:1234/api/campaigns/"
        );
        assert_eq!(
            client.url("/campaigns/01ABC/", &[]),
            "http://localhost:1234/api/campaigns/01ABC/"
        );
    }

    #[test]
    fn test_url_base_with_trailing_slash() {
        let client = test_client("http://localhost:1234/api/");
        assert_eq!(client.url("tags", &[]), "http://localhost:1234/api/tags/");
    }

    #[test]
    fn test_url_encodes_query() {
        let client = test_client("http://localhost:1234/api");
        let url = client.url(
            "campaigns",
            &[("filter", "equals(messages.channel,'email')"), ("page[cursor]", "abc")],
        );
        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("filter".to_string(), "equals(messages.channel,'email')".to_string()),
                ("page[cursor]".to_string(), "abc".to_string()),
            ]
        );
    }

    #[test]
    fn test_url_encodes_path_segments() {
        let client = test_client("http://localhost:1234/api");
        assert_eq!(
            client.url("catalog-items/SKU 1", &[]),
            "http://localhost:1234/api/catalog-items/SKU%201/"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = ClientConfig::new("pk").with_base_url("not a url");
        assert!(Client::new(config).is_err());

        let config = ClientConfig::new("pk").with_base_url("mailto:someone@example.com");
        assert!(Client::new(config).is_err());
    }

    #[test]
    fn test_from_environment() {
        let mut env = MockEnvironment::new();
        env.expect_env_var().returning(|key| match key {
            "KLAVIYO_API_KEY" => Ok("pk_env".to_string()),
            "KLAVIYO_MAX_RETRIES" => Ok("2".to_string()),
            _ => Err(std::env::VarError::NotPresent),
        });

        let client = Client::from_environment(&env).unwrap();
        assert!(client.session().has_credentials());
        assert_eq!(client.session().retry_config().max_attempts(), 2);
    }

    #[tokio::test]
    async fn test_get_decodes_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/accounts/")
            .match_header("authorization", "Klaviyo-API-Key pk_test")
            .match_header("revision", "2024-10-15")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "test", "value": 42}"#)
            .create_async()
            .await;

        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct TestResponse {
            name: String,
            value: i32,
        }

        let client = test_client(&format!("{}/api", server.url()));
        let result: TestResponse = client.get("accounts", &[]).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.name, "test");
        assert_eq!(result.value, 42);
    }

    #[tokio::test]
    async fn test_get_invalid_success_body_is_serialization_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/accounts/")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = test_client(&format!("{}/api", server.url()));
        let err = client
            .get::<serde_json::Value>("accounts", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/tags/t1/")
            .with_status(204)
            .create_async()
            .await;

        let client = test_client(&format!("{}/api", server.url()));
        client.delete("tags/t1").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_retries_server_errors_end_to_end() {
        let mut server = mockito::Server::new_async().await;
        let failing = server
            .mock("GET", "/api/flows/")
            .with_status(503)
            .expect(2)
            .create_async()
            .await;

        let config = ClientConfig::new("pk_test")
            .with_base_url(format!("{}/api", server.url()))
            .with_retry(RetryConfig::new(2, Duration::from_millis(5)));
        let client = Client::new(config).unwrap();

        let err = client
            .get::<serde_json::Value>("flows", &[])
            .await
            .unwrap_err();

        failing.assert_async().await;
        // An empty 503 body is not an error envelope.
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[tokio::test]
    async fn test_with_cancellation() {
        let client = test_client("http://127.0.0.1:9/api");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = client
            .with_cancellation(cancel)
            .get::<serde_json::Value>("accounts", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let config = ClientConfig::default().with_base_url(format!("{}/api", server.url()));
        let client = Client::new(config).unwrap();
        let err = client
            .get::<serde_json::Value>("accounts", &[])
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, Error::MissingCredential));
    }
}
