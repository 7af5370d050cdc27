//! The single call path shared by every resource API.

use log::debug;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::{HttpRequest, RetryExecutor, StatusClass, Transport};
use crate::error::{ApiErrorResponse, Error, ResponseError, Result};
use crate::session::Session;

/// Authenticates, retries and maps the outcome of a request.
#[derive(Clone)]
pub struct Dispatcher {
    session: Arc<Session>,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(session: Arc<Session>, transport: Arc<dyn Transport>) -> Self {
        Self { session, transport }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Executes `request` and returns the raw success body.
    pub async fn execute(&self, request: HttpRequest) -> Result<Vec<u8>> {
        self.execute_with_cancellation(request, &CancellationToken::new())
            .await
    }

    /// Like [`Dispatcher::execute`], aborting with [`Error::Cancelled`] once
    /// `cancel` fires.
    ///
    /// 2xx responses yield the body bytes unchanged. Any other final status
    /// yields [`Error::Response`], or [`Error::Serialization`] when the body
    /// is not a valid error envelope.
    #[tracing::instrument(skip(self, request, cancel), fields(method = %request.method, url = %request.url))]
    pub async fn execute_with_cancellation(
        &self,
        mut request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>> {
        self.session.apply_auth(&mut request)?;
        request.set_header("revision", self.session.api_revision());
        request.set_header("accept", "application/json");

        let operation_name = format!("{} {}", request.method, request.url);
        let executor = RetryExecutor::new(self.session.retry_config());
        let transport = &self.transport;
        let request = &request;

        let response = executor
            .execute(&operation_name, cancel, || transport.send(request))
            .await?;

        if StatusClass::is_success(response.status) {
            return Ok(response.body);
        }

        debug!(
            "{}: HTTP {} with {} byte error body",
            operation_name,
            response.status,
            response.body.len()
        );
        let body: ApiErrorResponse = serde_json::from_slice(&response.body)?;
        Err(Error::Response(ResponseError::new(response.status, body)))
    }
}
