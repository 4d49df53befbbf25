//! Fixed-data metrics source.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{MetricsQuery, MetricsSource, SourceError};
use crate::domain::protocol_metric::latest;
use crate::domain::{ProtocolMetric, ScalarMetric};

/// Serves a fixed newest-first series and fixed oracle prices.
///
/// Every query returns the first `count` periods regardless of which fields
/// the query would select. A configured failure makes every call fail.
#[derive(Debug, Default)]
pub struct InMemorySource {
    endpoint: String,
    metrics: RwLock<Vec<ProtocolMetric>>,
    oracle_prices: RwLock<HashMap<ScalarMetric, f64>>,
    failure: RwLock<Option<SourceError>>,
}

impl InMemorySource {
    /// Creates a source serving `metrics`.
    #[must_use]
    pub fn new(metrics: Vec<ProtocolMetric>) -> Self {
        Self {
            endpoint: "memory://protocol-metrics".to_string(),
            metrics: RwLock::new(metrics),
            ..Self::default()
        }
    }

    /// Replaces the served series.
    pub async fn set_metrics(&self, metrics: Vec<ProtocolMetric>) {
        *self.metrics.write().await = metrics;
    }

    /// Sets the price returned for an oracle metric.
    pub async fn set_oracle_price(&self, metric: ScalarMetric, price: f64) {
        self.oracle_prices.write().await.insert(metric, price);
    }

    /// Makes every subsequent call fail with `error`, or succeed again with
    /// `None`.
    pub async fn set_failure(&self, error: Option<SourceError>) {
        *self.failure.write().await = error;
    }

    async fn check_failure(&self) -> Result<(), SourceError> {
        match self.failure.read().await.as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MetricsSource for InMemorySource {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_protocol_metrics(
        &self,
        _query: MetricsQuery,
        count: u32,
        _endpoint: Option<&str>,
    ) -> Result<Vec<ProtocolMetric>, SourceError> {
        self.check_failure().await?;
        let limit = usize::try_from(count).unwrap_or(usize::MAX);
        Ok(self.metrics.read().await.iter().take(limit).cloned().collect())
    }

    async fn fetch_scalar(
        &self,
        metric: ScalarMetric,
        _endpoint: Option<&str>,
    ) -> Result<Option<f64>, SourceError> {
        self.check_failure().await?;
        if metric.is_oracle() {
            return Ok(self.oracle_prices.read().await.get(&metric).copied());
        }
        let metrics = self.metrics.read().await;
        Ok(latest(&metrics).and_then(|m| m.scalar(metric)))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn period(timestamp: i64, price: f64) -> ProtocolMetric {
        ProtocolMetric {
            timestamp,
            ohm_price: Some(price),
            ..ProtocolMetric::default()
        }
    }

    #[tokio::test]
    async fn scalar_reads_most_recent_period() {
        let source = InMemorySource::new(vec![period(2, 20.0), period(1, 10.0)]);
        let price = source.fetch_scalar(ScalarMetric::TokenPrice, None).await;
        assert_eq!(price, Ok(Some(20.0)));
    }

    #[tokio::test]
    async fn oracle_prices_come_from_the_price_table() {
        let source = InMemorySource::new(Vec::new());
        let before = source.fetch_scalar(ScalarMetric::OracleTokenPrice, None).await;
        assert_eq!(before, Ok(None));

        source.set_oracle_price(ScalarMetric::OracleTokenPrice, 11.5).await;
        let after = source.fetch_scalar(ScalarMetric::OracleTokenPrice, None).await;
        assert_eq!(after, Ok(Some(11.5)));
    }

    #[tokio::test]
    async fn count_limits_periods() {
        let source = InMemorySource::new(vec![period(3, 1.0), period(2, 1.0), period(1, 1.0)]);
        let Ok(metrics) = source
            .fetch_protocol_metrics(MetricsQuery::MarketValueMetrics, 2, None)
            .await
        else {
            panic!("fetch succeeds");
        };
        let timestamps: Vec<i64> = metrics.iter().map(|m| m.timestamp).collect();
        assert_eq!(timestamps, vec![3, 2]);
    }

    #[tokio::test]
    async fn configured_failure_fails_every_call() {
        let source = InMemorySource::new(vec![period(1, 1.0)]);
        source
            .set_failure(Some(SourceError::Network("down".to_string())))
            .await;
        assert!(source.fetch_scalar(ScalarMetric::TokenPrice, None).await.is_err());
        source.set_failure(None).await;
        assert!(source.fetch_scalar(ScalarMetric::TokenPrice, None).await.is_ok());
    }
}
