//! Query error types
//!
//! Defines every error that can occur while building or assembling a query.
//! All of them are raised at the point of misuse; network and server
//! failures are not errors here, they come back as data from
//! [`crate::service::ServiceResponse`].

use thiserror::Error;

/// Errors that can occur while constructing query expressions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// An operand is not one of the allowed expression kinds
    #[error("Invalid operand kind: {found} is not allowed in an expression")]
    InvalidOperandKind {
        /// Kind of the rejected value
        found: &'static str,
    },

    /// A case condition is not a comparison
    #[error("Invalid condition: expected a comparison, got {found}")]
    InvalidCondition { found: &'static str },

    /// Wrong number of tuples passed to a construct template
    #[error("Arity error: expected {expected} tuples, got {found}")]
    Arity { expected: usize, found: usize },

    /// Malformed tuple passed to a construct or clip template
    #[error("Element type error: {0}")]
    ElementType(String),

    /// Switch built without any cases
    #[error("Switch requires at least one case")]
    EmptyCases,

    /// Output format missing from the format table
    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    /// Query or coverage built without any coverage names
    #[error("No coverage specified")]
    NoCoverage,

    /// Subset set with no axes
    #[error("No axes provided for subset")]
    EmptySubset,

    /// Axis name is empty or otherwise unusable
    #[error("Invalid axis: {0}")]
    InvalidAxis(String),

    /// Interval bounds of different kinds (number and date)
    #[error("Interval bounds must both be numbers or both be dates")]
    MismatchedBounds,

    /// Date label component out of range
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Color channel outside 0-255
    #[error("Color channel {channel} out of range: {value}")]
    ColorOutOfRange { channel: &'static str, value: i64 },

    /// Subset or date text could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Service request is missing required parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
