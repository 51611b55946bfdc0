//! Coverage Service
//!
//! The collaborators a query needs to reach a server:
//!
//! - **Formats**: output format names and their MIME types
//! - **Requests**: endpoint binding and the plain WCS request forms
//! - **Failures**: timeout and HTTP fault classification
//! - **Client**: the [`Transport`] trait and its reqwest implementation

mod client;
mod failure;
pub mod formats;
mod request;

pub use client::{HttpTransport, ServiceResponse, Transport};
pub use failure::{parse_exception_report, ExceptionDetail, TransportFailure};
pub use request::{ServiceParams, ServiceRequest};
