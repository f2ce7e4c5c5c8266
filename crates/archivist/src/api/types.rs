//! API request and response types.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::mcp::McpRouter;

/// Request body size limit.
///
/// Defaults to 100 MB. Override with `ARCHIVIST_MAX_REQUEST_BODY_BYTES`.
#[derive(Debug, Clone, Copy)]
pub struct ApiSizeLimits {
    /// Maximum size of the entire request body in bytes.
    pub max_request_body_bytes: usize,
}

impl Default for ApiSizeLimits {
    fn default() -> Self {
        Self::from_mb(100)
    }
}

impl ApiSizeLimits {
    pub fn new(max_request_body_bytes: usize) -> Self {
        Self { max_request_body_bytes }
    }

    /// # Examples
    ///
    /// ```
    /// use archivist::api::ApiSizeLimits;
    ///
    /// let limits = ApiSizeLimits::from_mb(50);
    /// assert_eq!(limits.max_request_body_bytes, 50 * 1024 * 1024);
    /// ```
    pub fn from_mb(max_request_body_mb: usize) -> Self {
        Self {
            max_request_body_bytes: max_request_body_mb * 1024 * 1024,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// Server version
    pub version: String,
    /// Number of catalog records
    pub catalog_records: usize,
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type name
    pub error_type: String,
    /// Error message
    pub message: String,
    /// HTTP status code
    pub status_code: u16,
}

/// `?query=` parameter of the search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

/// `?limit=` parameter of `GET /recent`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_recent_limit")]
    pub limit: usize,
}

fn default_recent_limit() -> usize {
    10
}

/// API server state.
///
/// The HTTP endpoints and `POST /mcp` share one router, so both see the same
/// store and catalog.
#[derive(Debug, Clone)]
pub struct ApiState {
    pub router: Arc<McpRouter>,
}
