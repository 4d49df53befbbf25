//! Errors raised while fetching from a metrics source.

use crate::domain::ScalarMetric;

/// Failure to obtain data from a [`super::MetricsSource`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-success HTTP status.
    #[error("subgraph returned HTTP {status}: {body}")]
    BadResponse {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The GraphQL response carried errors.
    #[error("subgraph query failed: {0}")]
    GraphQl(String),

    /// The response body could not be decoded.
    #[error("malformed subgraph response: {0}")]
    Parse(String),

    /// The source cannot provide this metric.
    #[error("{0} is not available from this source")]
    Unsupported(ScalarMetric),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
