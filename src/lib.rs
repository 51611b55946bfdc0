//! # Datacube
//!
//! Typed builder for coverage processing queries: compose expressions over
//! remote coverages in Rust and render them to the exact query text a
//! WCS/WCPS service expects.
//!
//! ## Features
//!
//! - **Checked expression trees**: operands are validated when a node is built
//! - **Deterministic rendering**: every node has one canonical text form
//! - **Query templates**: direct return, switch, grid construct, polygon clip
//! - **Service client**: HTTP transport with structured failure reporting
//!
//! ## Modules
//!
//! - [`query`]: Expression model, serializer and query assembler
//! - [`service`]: Format table, service requests and HTTP transport
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use datacube::query::{Aggregate, AxisSubset, Coverage, Query};
//! use datacube::service::{HttpTransport, ServiceParams, ServiceResponse};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let temp = Coverage::named("AvgLandTemp")?
//!         .with_subset(vec![AxisSubset::interval("Lat", 35, 75)?])?;
//!
//!     let mut query = Query::over(temp.clone());
//!     query.return_expression(Aggregate::avg(&temp)?)?;
//!
//!     let transport = HttpTransport::new(Duration::from_secs(60))?;
//!     match query.execute(&transport, &ServiceParams::default(), Some("csv")).await? {
//!         ServiceResponse::Success(bytes) => println!("{}", String::from_utf8_lossy(&bytes)),
//!         ServiceResponse::Failure(failure) => eprintln!("{}", failure.to_json()),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod query;
pub mod service;

// Re-export top-level types for convenience
pub use query::{
    Aggregate, Arithmetic, AxisSubset, Case, Comparison, Coverage, DateLabel, Expr, MathFn, Query,
    QueryError, QueryResult, Rgb, Switch, VariableAllocator,
};

pub use service::{HttpTransport, ServiceParams, ServiceRequest, ServiceResponse, Transport, TransportFailure};

pub use config::{Config, ConfigError, LoggingConfig, ServiceConfig};
