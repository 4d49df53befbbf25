//! Dashboard error types with HTTP status code mapping.
//!
//! [`DashboardError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::subgraph::SourceError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "unknown metric tile: market_value",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`DashboardError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                |
/// |-----------|-----------------|----------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request            |
/// | 2000–2999 | Not Found       | 404 Not Found              |
/// | 3000–3999 | Server/Upstream | 500 / 502                  |
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The `subgraph_url` override was supplied but overrides are disabled.
    #[error("subgraph endpoint override is disabled")]
    OverrideDisabled,

    /// No metric tile with the given identifier.
    #[error("unknown metric tile: {0}")]
    TileNotFound(String),

    /// No chart with the given identifier.
    #[error("unknown chart: {0}")]
    ChartNotFound(String),

    /// The upstream metrics source failed.
    #[error("metrics source error: {0}")]
    Source(#[from] SourceError),

    /// Component keys and category labels were not paired one to one.
    #[error("{keys} component keys but {categories} category labels")]
    SeriesMismatch {
        /// Number of component keys supplied.
        keys: usize,
        /// Number of category labels supplied.
        categories: usize,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DashboardError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::OverrideDisabled => 1002,
            Self::TileNotFound(_) => 2001,
            Self::ChartNotFound(_) => 2002,
            Self::Internal(_) => 3000,
            Self::Source(_) => 3001,
            Self::SeriesMismatch { .. } => 3002,
            Self::Config(_) => 3003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::OverrideDisabled => StatusCode::BAD_REQUEST,
            Self::TileNotFound(_) | Self::ChartNotFound(_) => StatusCode::NOT_FOUND,
            Self::Source(_) => StatusCode::BAD_GATEWAY,
            Self::SeriesMismatch { .. } | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
