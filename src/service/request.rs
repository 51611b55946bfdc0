//! Service requests
//!
//! The endpoint binding ([`ServiceParams`]) and the discriminated parameter
//! sets of the plain WCS requests ([`ServiceRequest`]).

use crate::config::ServiceConfig;
use crate::query::{AxisRange, AxisSubset, QueryError, QueryResult};
use crate::service::{formats, ServiceResponse, Transport};

/// Endpoint, service name and protocol version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceParams {
    /// Service endpoint URL
    pub endpoint: String,
    /// Service name (e.g., "WCS")
    pub service: String,
    /// Protocol version (e.g., "2.0.1")
    pub version: String,
}

impl Default for ServiceParams {
    fn default() -> Self {
        Self::from(&ServiceConfig::default())
    }
}

impl From<&ServiceConfig> for ServiceParams {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            service: config.service.clone(),
            version: config.version.clone(),
        }
    }
}

/// A request to the coverage service with its required parameters
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceRequest {
    /// Service metadata
    GetCapabilities,
    /// Description of one coverage
    DescribeCoverage { coverage_id: String },
    /// Raw coverage data, optionally subset and encoded
    GetCoverage {
        coverage_id: String,
        subsets: Vec<AxisSubset>,
        format: Option<String>,
    },
    /// Processing query (the query text travels in the request body)
    ProcessCoverages,
}

impl ServiceRequest {
    /// Value of the `request` parameter
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetCapabilities => "GetCapabilities",
            Self::DescribeCoverage { .. } => "DescribeCoverage",
            Self::GetCoverage { .. } => "GetCoverage",
            Self::ProcessCoverages => "ProcessCoverages",
        }
    }

    /// Check required parameters
    pub fn validate(&self) -> QueryResult<()> {
        match self {
            Self::DescribeCoverage { coverage_id } | Self::GetCoverage { coverage_id, .. }
                if coverage_id.trim().is_empty() =>
            {
                Err(QueryError::InvalidRequest(format!(
                    "Missing coverageId parameter for {}",
                    self.name()
                )))
            }
            Self::GetCoverage {
                format: Some(format),
                ..
            } => formats::ensure_known(format).map(|_| ()),
            _ => Ok(()),
        }
    }

    /// URL parameters for this request, in order
    pub fn query_pairs(&self, params: &ServiceParams) -> QueryResult<Vec<(String, String)>> {
        self.validate()?;

        let mut pairs = vec![
            ("service".to_string(), params.service.clone()),
            ("version".to_string(), params.version.clone()),
            ("request".to_string(), self.name().to_string()),
        ];

        match self {
            Self::GetCapabilities | Self::ProcessCoverages => {}
            Self::DescribeCoverage { coverage_id } => {
                pairs.push(("coverageId".to_string(), coverage_id.clone()));
            }
            Self::GetCoverage {
                coverage_id,
                subsets,
                format,
            } => {
                pairs.push(("coverageId".to_string(), coverage_id.clone()));
                for subset in subsets {
                    pairs.push(("subset".to_string(), subset_param(subset)));
                }
                if let Some(format) = format {
                    // Known formats are checked in validate()
                    let mime = formats::mime_type(format).unwrap_or_default();
                    pairs.push(("format".to_string(), mime.to_string()));
                }
            }
        }

        Ok(pairs)
    }

    /// Full GET URL for this request
    pub fn url(&self, params: &ServiceParams) -> QueryResult<String> {
        let query = self
            .query_pairs(params)?
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        Ok(format!("{}?{}", params.endpoint, query))
    }

    /// Validate and send this request
    ///
    /// Missing parameters are an `Err` and nothing is sent; a rejection by
    /// the service is a [`ServiceResponse::Failure`].
    pub async fn execute(
        &self,
        transport: &dyn Transport,
        params: &ServiceParams,
    ) -> QueryResult<ServiceResponse> {
        self.validate()?;
        Ok(transport.send_request(params, self).await.into())
    }
}

/// KVP subset syntax: `axis(point)` or `axis(lo,hi)`
fn subset_param(subset: &AxisSubset) -> String {
    match subset.range() {
        AxisRange::Point(at) => format!("{}({})", subset.name(), at),
        AxisRange::Interval(lo, hi) => format!("{}({},{})", subset.name(), lo, hi),
    }
}
