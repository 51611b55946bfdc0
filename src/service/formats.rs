//! Output format table
//!
//! Maps the format names accepted by `encode(...)` to MIME types. Only
//! existence is checked before a query is sent.

use crate::query::{QueryError, QueryResult};

const FORMATS: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("tiff", "image/tiff"),
    ("gtiff", "image/tiff"),
    ("jp2", "image/jp2"),
    ("netcdf", "application/netcdf"),
    ("csv", "text/csv"),
    ("json", "application/json"),
    ("gml", "application/gml+xml"),
];

/// Look up the MIME type of a format name
pub fn mime_type(format: &str) -> Option<&'static str> {
    FORMATS
        .iter()
        .find(|(name, _)| *name == format)
        .map(|(_, mime)| *mime)
}

/// Look up the MIME type, failing for unknown formats
pub fn ensure_known(format: &str) -> QueryResult<&'static str> {
    mime_type(format).ok_or_else(|| QueryError::UnknownFormat(format.to_string()))
}

/// All known format names
pub fn known_formats() -> impl Iterator<Item = &'static str> {
    FORMATS.iter().map(|(name, _)| *name)
}
