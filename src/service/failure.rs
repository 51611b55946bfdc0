//! Transport failure classification
//!
//! Failures from the service come back as data, not as [`QueryError`]s:
//! a query that was built correctly can still be rejected by the server or
//! lost on the network. Every failure renders to the same JSON envelope:
//!
//! ```json
//! {"success": false, "error": {"code": 400, "message": "Request Failed",
//!   "exceptionDetail": {"exceptionText": "...", "exceptionCode": "..."},
//!   "extra": "..."}}
//! ```
//!
//! [`QueryError`]: crate::query::QueryError

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

const REQUEST_FAILED: &str = "Request Failed";

/// Fault details parsed from an OWS `ExceptionReport`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_code: Option<String>,
}

/// A classified transport failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportFailure {
    #[error("Request timeout")]
    Timeout { code: Option<u16> },

    #[error("HTTP {code}: {}", exception_text(.exception))]
    HttpFault {
        code: u16,
        exception: Option<ExceptionDetail>,
        extra: String,
    },

    #[error("Connection failed: {0}")]
    Connection(String),
}

fn exception_text(exception: &Option<ExceptionDetail>) -> &str {
    exception
        .as_ref()
        .and_then(|e| e.exception_text.as_deref())
        .unwrap_or("no exception report")
}

impl TransportFailure {
    /// Classify an HTTP error status and its body
    pub fn from_status(code: u16, body: &str, extra: impl Into<String>) -> Self {
        Self::HttpFault {
            code,
            exception: parse_exception_report(body),
            extra: extra.into(),
        }
    }

    /// HTTP status code, if one was received
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Timeout { code } => *code,
            Self::HttpFault { code, .. } => Some(*code),
            Self::Connection(_) => None,
        }
    }

    /// Structured JSON envelope
    pub fn to_json(&self) -> Value {
        let error = match self {
            Self::Timeout { code } => json!({
                "code": code,
                "message": REQUEST_FAILED,
                "exceptionDetail": "Request Timeout Error",
            }),
            Self::HttpFault {
                code,
                exception,
                extra,
            } => json!({
                "code": code,
                "message": REQUEST_FAILED,
                "exceptionDetail": exception.clone().unwrap_or_default(),
                "extra": extra,
            }),
            Self::Connection(message) => json!({
                "code": Value::Null,
                "message": REQUEST_FAILED,
                "exceptionDetail": message,
            }),
        };
        json!({ "success": false, "error": error })
    }
}

/// Parse an OWS `ExceptionReport` body
///
/// Namespace prefixes are ignored. The code comes from the `exceptionCode`
/// attribute of `Exception`; when several `ExceptionText` elements are
/// present the last one wins. Returns `None` when the body holds no
/// `Exception` element.
pub fn parse_exception_report(body: &str) -> Option<ExceptionDetail> {
    let mut reader = Reader::from_str(body);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut detail = ExceptionDetail::default();
    let mut found = false;
    let mut in_text = false;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"Exception" => {
                    found = true;
                    for attr in e.attributes().flatten() {
                        if attr.key.local_name().as_ref() == b"exceptionCode" {
                            detail.exception_code = attr
                                .unescape_value()
                                .ok()
                                .map(|v| v.into_owned());
                        }
                    }
                }
                b"ExceptionText" => {
                    in_text = true;
                    text.clear();
                }
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                if let Ok(t) = t.unescape() {
                    text.push_str(&t);
                }
            }
            Ok(Event::CData(t)) if in_text => {
                text.push_str(&String::from_utf8_lossy(&t));
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"ExceptionText" && in_text {
                    in_text = false;
                    detail.exception_text = Some(text.clone());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!(
                    "Unparseable exception report at position {}: {:?}",
                    reader.buffer_position(),
                    e
                );
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    found.then_some(detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ows:ExceptionReport version="2.0.0" xmlns:ows="http://www.opengis.net/ows/2.0">
  <ows:Exception exceptionCode="NoSuchCoverage" locator="AvgLandTmp">
    <ows:ExceptionText>Coverage 'AvgLandTmp' does not exist.</ows:ExceptionText>
  </ows:Exception>
</ows:ExceptionReport>"#;

    #[test]
    fn test_parse_exception_report() {
        let detail = parse_exception_report(REPORT).unwrap();
        assert_eq!(detail.exception_code.as_deref(), Some("NoSuchCoverage"));
        assert_eq!(
            detail.exception_text.as_deref(),
            Some("Coverage 'AvgLandTmp' does not exist.")
        );
    }

    #[test]
    fn test_last_exception_text_wins() {
        let body = "<ExceptionReport><Exception exceptionCode=\"E\">\
                    <ExceptionText>first</ExceptionText>\
                    <ExceptionText>second &amp; last</ExceptionText>\
                    </Exception></ExceptionReport>";
        let detail = parse_exception_report(body).unwrap();
        assert_eq!(detail.exception_text.as_deref(), Some("second & last"));
    }

    #[test]
    fn test_non_report_body() {
        assert_eq!(parse_exception_report("Internal Server Error"), None);
        assert_eq!(parse_exception_report("<html><body>502</body></html>"), None);
        assert_eq!(parse_exception_report(""), None);
    }

    #[test]
    fn test_timeout_envelope() {
        let failure = TransportFailure::Timeout { code: None };
        assert_eq!(
            failure.to_json(),
            json!({
                "success": false,
                "error": {
                    "code": null,
                    "message": "Request Failed",
                    "exceptionDetail": "Request Timeout Error"
                }
            })
        );
    }

    #[test]
    fn test_http_fault_envelope() {
        let failure = TransportFailure::from_status(404, REPORT, "HTTP status client error (404 Not Found)");
        assert_eq!(failure.code(), Some(404));
        assert_eq!(
            failure.to_json(),
            json!({
                "success": false,
                "error": {
                    "code": 404,
                    "message": "Request Failed",
                    "exceptionDetail": {
                        "exceptionText": "Coverage 'AvgLandTmp' does not exist.",
                        "exceptionCode": "NoSuchCoverage"
                    },
                    "extra": "HTTP status client error (404 Not Found)"
                }
            })
        );
        assert_eq!(
            failure.to_string(),
            "HTTP 404: Coverage 'AvgLandTmp' does not exist."
        );
    }

    #[test]
    fn test_http_fault_without_report() {
        let failure = TransportFailure::from_status(500, "oops", "server error");
        assert_eq!(failure.to_json()["error"]["exceptionDetail"], json!({}));
        assert_eq!(failure.to_string(), "HTTP 500: no exception report");
    }
}
