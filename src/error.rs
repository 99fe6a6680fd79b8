use std::path::PathBuf;

use thiserror::Error;

/// Domain failures raised by the estimation pipeline.
///
/// Pipeline and I/O functions return `anyhow::Result`; these variants are
/// wrapped into it and can be recovered with `downcast_ref::<Error>()`.
#[derive(Debug, Error)]
pub enum Error {
    /// A coordinate reference system identifier was not recognized.
    #[error("invalid projection: unrecognized CRS {crs:?}")]
    InvalidProjection { crs: String },

    /// A polygon ring has fewer than three distinct vertices.
    #[error("degenerate geometry: ring has {points} point(s), need at least 3")]
    DegenerateGeometry { points: usize },

    /// An input file is missing a required column or field.
    #[error("malformed input {}: missing or invalid field {field:?}", path.display())]
    MalformedInput { path: PathBuf, field: String },

    /// A configuration value is missing or out of range.
    #[error("invalid config at {field}: {reason}")]
    InvalidConfig { field: String, reason: String },
}

impl Error {
    pub(crate) fn malformed(path: impl Into<PathBuf>, field: impl Into<String>) -> Self {
        Self::MalformedInput { path: path.into(), field: field.into() }
    }

    pub(crate) fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig { field: field.into(), reason: reason.into() }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
