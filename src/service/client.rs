//! Coverage service client
//!
//! HTTP transport for posting query text and plain service requests.

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::service::failure::TransportFailure;
use crate::service::request::{ServiceParams, ServiceRequest};

/// Executes requests against a coverage service
#[async_trait]
pub trait Transport: Send + Sync {
    /// Post query text as a `ProcessCoverages` request
    async fn post_query(&self, params: &ServiceParams, query: &str)
        -> Result<Vec<u8>, TransportFailure>;

    /// Send a plain service request
    async fn send_request(
        &self,
        params: &ServiceParams,
        request: &ServiceRequest,
    ) -> Result<Vec<u8>, TransportFailure>;
}

/// Outcome of a request that was built correctly
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResponse {
    /// Raw response payload
    Success(Vec<u8>),
    /// Classified failure
    Failure(TransportFailure),
}

impl ServiceResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Payload bytes of a successful response
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Success(bytes) => Some(bytes),
            Self::Failure(_) => None,
        }
    }

    pub fn into_result(self) -> Result<Vec<u8>, TransportFailure> {
        match self {
            Self::Success(bytes) => Ok(bytes),
            Self::Failure(failure) => Err(failure),
        }
    }
}

impl From<Result<Vec<u8>, TransportFailure>> for ServiceResponse {
    fn from(result: Result<Vec<u8>, TransportFailure>) -> Self {
        match result {
            Ok(bytes) => Self::Success(bytes),
            Err(failure) => Self::Failure(failure),
        }
    }
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self, TransportFailure> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportFailure::Connection(e.to_string()))?;

        Ok(Self { client })
    }

    /// Create a transport from service configuration
    pub fn from_config(config: &ServiceConfig) -> Result<Self, TransportFailure> {
        Self::new(config.request_timeout())
    }

    async fn read_body(&self, request_id: Uuid, response: Response) -> Result<Vec<u8>, TransportFailure> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await.map_err(classify_error)?;
            info!(%request_id, status = status.as_u16(), bytes = bytes.len(), "Request succeeded");
            return Ok(bytes.to_vec());
        }

        let extra = response
            .error_for_status_ref()
            .err()
            .map(|e| e.to_string())
            .unwrap_or_else(|| status.to_string());
        let body = response.text().await.unwrap_or_default();
        let failure = TransportFailure::from_status(status.as_u16(), &body, extra);

        warn!(%request_id, status = status.as_u16(), "Request failed: {}", failure);
        Err(failure)
    }
}

/// Map a reqwest error to a classified failure
fn classify_error(e: reqwest::Error) -> TransportFailure {
    if e.is_timeout() {
        TransportFailure::Timeout {
            code: e.status().map(|s| s.as_u16()),
        }
    } else if let Some(status) = e.status() {
        TransportFailure::from_status(status.as_u16(), "", e.to_string())
    } else {
        TransportFailure::Connection(e.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_query(
        &self,
        params: &ServiceParams,
        query: &str,
    ) -> Result<Vec<u8>, TransportFailure> {
        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            endpoint = %params.endpoint,
            query_len = query.len(),
            "Posting query"
        );

        let response = self
            .client
            .post(&params.endpoint)
            .query(&[
                ("service", params.service.as_str()),
                ("version", params.version.as_str()),
                ("request", ServiceRequest::ProcessCoverages.name()),
            ])
            .form(&[("query", query)])
            .send()
            .await
            .map_err(|e| {
                let failure = classify_error(e);
                warn!(%request_id, "Query not delivered: {}", failure);
                failure
            })?;

        self.read_body(request_id, response).await
    }

    async fn send_request(
        &self,
        params: &ServiceParams,
        request: &ServiceRequest,
    ) -> Result<Vec<u8>, TransportFailure> {
        let request_id = Uuid::new_v4();
        let pairs = request
            .query_pairs(params)
            .map_err(|e| TransportFailure::Connection(e.to_string()))?;
        info!(%request_id, endpoint = %params.endpoint, request = request.name(), "Sending request");

        let response = self
            .client
            .get(&params.endpoint)
            .query(&pairs)
            .send()
            .await
            .map_err(|e| {
                let failure = classify_error(e);
                warn!(%request_id, "Request not delivered: {}", failure);
                failure
            })?;

        self.read_body(request_id, response).await
    }
}
