//! Error types for document fetching and resolution

use thiserror::Error;

use crate::http::REQUEST_TIMEOUT_SECS;

/// Document source and resolution errors
#[derive(Debug, Error)]
pub enum RepoError {
    // ============ Resolution Errors ============
    #[error("Invalid resource name: {name}")]
    InvalidResourceName { name: String },

    #[error("Resource name {name} is ambiguous: declared {count} times in the catalog")]
    AmbiguousResource { name: String, count: usize },

    #[error("Invalid version for the resource name: {name}/{version}")]
    InvalidVersion { name: String, version: String },

    #[error("Error fetching resource {name}/{version} (tried {})", .attempts.join(", "))]
    DocumentFetchFailure {
        name: String,
        version: String,
        attempts: Vec<String>,
    },

    // ============ Source Errors ============
    #[error("Invalid document source: {location} - {reason}")]
    InvalidSource { location: String, reason: String },

    #[error("Document not found: {path}")]
    DocumentNotFound { path: String },

    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Request timeout after {seconds}s")]
    Timeout { seconds: u64 },

    // ============ Parse Errors ============
    #[error("Document parse error: {0}")]
    Core(#[from] crdoc_core::CoreError),

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RepoError {
    /// Whether this error should be reported to the reader as "not found"
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RepoError::InvalidResourceName { .. }
                | RepoError::AmbiguousResource { .. }
                | RepoError::InvalidVersion { .. }
                | RepoError::DocumentFetchFailure { .. }
        )
    }
}

/// Result type for repository operations
pub type Result<T> = std::result::Result<T, RepoError>;

impl From<reqwest::Error> for RepoError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RepoError::Timeout {
                seconds: REQUEST_TIMEOUT_SECS,
            }
        } else if e.is_connect() {
            RepoError::NetworkError {
                message: format!("Connection failed: {}", e),
            }
        } else if let Some(status) = e.status() {
            RepoError::HttpError {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            RepoError::NetworkError {
                message: e.to_string(),
            }
        }
    }
}

impl From<url::ParseError> for RepoError {
    fn from(e: url::ParseError) -> Self {
        RepoError::InvalidSource {
            location: String::new(),
            reason: e.to_string(),
        }
    }
}
