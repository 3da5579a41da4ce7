//! Error taxonomy for the filter retrieval pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while retrieving, validating, parsing or applying a filter
///
/// Every pipeline stage surfaces one of these kinds unchanged, so callers can
/// tell a bad configuration apart from a catalog outage or a malformed file.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timeout, connection failure or bad HTTP status while talking to the catalog
    #[error("Network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// Filesystem read, write or delete failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed markup, non-numeric cells or inconsistent tabular data
    #[error("Parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// An expected document element is absent
    #[error("Element <{element}> not found in {}", path.display())]
    NotFound { path: PathBuf, element: String },

    /// The catalog reported the requested filter identity as unknown
    #[error("Invalid filter '{key}': the catalog does not know this ID, downloaded file removed")]
    InvalidFilter { key: String },

    /// A numeric precondition was violated
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl FilterError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FilterError>;
