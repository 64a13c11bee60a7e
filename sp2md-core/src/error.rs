//! Error classes for an export run.
//!
//! [`ExportError`] is fatal: the run stops before the next post.
//! [`FetchError`] is scoped to one asset and never leaves the asset loop.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    /// The site could not be reached, or the list query failed.
    #[error("Error with connection! Is your site URL correct? {message}")]
    Connection { message: String },

    /// The export directory, or a file inside it, could not be written.
    #[error("Directory error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub fn connection(message: impl Into<String>) -> Self {
        ExportError::Connection {
            message: message.into(),
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for ExportError {
    fn from(e: reqwest::Error) -> Self {
        ExportError::connection(e.to_string())
    }
}

/// Failure to download a single asset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} did not respond within {secs}s")]
    Timeout { url: String, secs: u64 },
}
