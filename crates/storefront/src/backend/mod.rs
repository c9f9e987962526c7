//! Commerce backend (store API) client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`; every call is a single request/response
//! - The backend is source of truth - NO local sync, direct API calls
//! - Caching lives one layer up (regions, catalog), never in this client
//!
//! # Authentication
//!
//! - Every request carries the publishable key (`x-publishable-api-key`)
//! - Customer requests additionally carry the bearer token from the auth cookie
//!
//! # Example
//!
//! ```rust,ignore
//! use harbor_storefront::backend::{BackendClient, Query};
//!
//! let client = BackendClient::new(&config.backend);
//!
//! let query = Query::new().param("limit", 100).param("offset", 0);
//! let regions: RegionList = client.get(&["store", "regions"], &query, None).await?;
//! ```

mod client;
mod query;
pub mod types;

pub use client::{AuthToken, BackendClient};
pub use query::Query;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the commerce backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message from the backend body, or a truncated body.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// An ID cannot be used as a path segment.
    #[error("Invalid path segment: {0:?}")]
    InvalidSegment(String),
}

impl BackendError {
    /// Whether this error means the requested resource does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::NotFound("region for country xx".to_string());
        assert_eq!(err.to_string(), "Not found: region for country xx");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_status_error_display() {
        let err = BackendError::Status {
            status: 500,
            message: "An unknown error occurred.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Backend returned 500: An unknown error occurred."
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_rate_limited_error() {
        let err = BackendError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
