//! Metrics sources: the seam between the dashboard and the indexer.
//!
//! [`MetricsSource`] is the only way the service obtains data.
//! [`SubgraphClient`] talks GraphQL to a subgraph over HTTP;
//! [`InMemorySource`] serves fixed data for tests and local runs.

pub mod client;
pub mod error;
pub mod in_memory;
pub mod queries;

use async_trait::async_trait;

use crate::domain::{ProtocolMetric, ScalarMetric, protocol_metric::latest};

pub use client::SubgraphClient;
pub use error::SourceError;
pub use in_memory::InMemorySource;
pub use queries::{MetricsQuery, query_explorer_url};

/// A provider of protocol metrics.
///
/// `endpoint` overrides the source's default location for one call. Sources
/// without a notion of endpoint ignore it.
#[async_trait]
pub trait MetricsSource: Send + Sync + std::fmt::Debug {
    /// Default endpoint, used to build query explorer links.
    fn endpoint(&self) -> &str;

    /// Fetches up to `count` periods, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the request or its decoding fails.
    async fn fetch_protocol_metrics(
        &self,
        query: MetricsQuery,
        count: u32,
        endpoint: Option<&str>,
    ) -> Result<Vec<ProtocolMetric>, SourceError>;

    /// Fetches the latest value of a scalar metric.
    ///
    /// `Ok(None)` means the source has no value yet. The default
    /// implementation reads the most recent key metrics period and does not
    /// support oracle prices.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Unsupported`] for oracle prices, or the error
    /// of the underlying fetch.
    async fn fetch_scalar(
        &self,
        metric: ScalarMetric,
        endpoint: Option<&str>,
    ) -> Result<Option<f64>, SourceError> {
        if metric.is_oracle() {
            return Err(SourceError::Unsupported(metric));
        }
        let periods = self
            .fetch_protocol_metrics(MetricsQuery::KeyMetrics, 1, endpoint)
            .await?;
        Ok(latest(&periods).and_then(|period| period.scalar(metric)))
    }
}
