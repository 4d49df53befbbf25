//! Dashboard service: fetches from the metrics source and renders.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::{join, join_all};

use crate::config::DashboardConfig;
use crate::domain::{
    AssetsTable, ChartKind, ChartPayload, LoadingPolicy, MetricDisplayRecord, MetricState,
    MetricTile, ProtocolMetric, RenderContext, ScalarMetric, ValueFormatter,
};
use crate::domain::protocol_metric::latest;
use crate::error::DashboardError;
use crate::subgraph::{MetricsQuery, MetricsSource, SourceError, query_explorer_url};

/// Per-request fetch options.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Number of periods to fetch; the configured default when absent.
    pub count: Option<u32>,
    /// Subgraph endpoint override.
    pub subgraph_url: Option<String>,
}

/// A tile and its rendered record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRecord {
    /// Tile identifier.
    pub tile: MetricTile,
    /// Rendered record.
    pub record: MetricDisplayRecord,
}

/// The asset table for the latest period, or `None` while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetsSnapshot {
    /// Table rows sorted by value descending.
    pub table: Option<AssetsTable>,
    /// Link to the query in the subgraph explorer.
    pub subgraph_query_url: String,
}

/// Orchestration layer between the metrics source and the renderers.
///
/// Stateless: every call fetches what it needs, renders it with the
/// configured [`crate::domain::DisplayConfig`] and returns. Nothing is cached
/// across calls; within one tile render the key metrics are fetched once.
#[derive(Debug)]
pub struct DashboardService {
    source: Arc<dyn MetricsSource>,
    formatter: Arc<dyn ValueFormatter>,
    config: DashboardConfig,
}

impl DashboardService {
    /// Creates a new `DashboardService`.
    #[must_use]
    pub fn new(
        source: Arc<dyn MetricsSource>,
        formatter: Arc<dyn ValueFormatter>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            source,
            formatter,
            config,
        }
    }

    /// Returns the service configuration.
    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    fn render_context(&self) -> RenderContext<'_> {
        RenderContext {
            config: &self.config.display,
            formatter: self.formatter.as_ref(),
            policy: self.config.loading_policy,
        }
    }

    /// Renders one tile.
    ///
    /// # Errors
    ///
    /// Returns a [`DashboardError`] if the endpoint override is rejected.
    pub async fn tile(
        &self,
        tile: MetricTile,
        options: &FetchOptions,
    ) -> Result<MetricDisplayRecord, DashboardError> {
        let mut records = self.render_tiles(&[tile], options).await?;
        records
            .pop()
            .map(|r| r.record)
            .ok_or_else(|| DashboardError::Internal(format!("tile {tile} was not rendered")))
    }

    /// Renders every tile, in dashboard order.
    ///
    /// # Errors
    ///
    /// Returns a [`DashboardError`] if the endpoint override is rejected.
    pub async fn tiles(&self, options: &FetchOptions) -> Result<Vec<TileRecord>, DashboardError> {
        self.render_tiles(&MetricTile::ALL, options).await
    }

    /// Fetches the inputs of `tiles`, then renders them.
    ///
    /// Every subgraph input is read from one key metrics response, so a ratio
    /// never mixes two periods. Oracle inputs are fetched individually and
    /// concurrently with it.
    async fn render_tiles(
        &self,
        tiles: &[MetricTile],
        options: &FetchOptions,
    ) -> Result<Vec<TileRecord>, DashboardError> {
        let endpoint = self
            .config
            .endpoint_override(options.subgraph_url.as_deref())?;

        let mut inputs: Vec<ScalarMetric> = Vec::new();
        for tile in tiles {
            let wanted = tile.inputs();
            for metric in [wanted.primary, wanted.secondary].into_iter().flatten() {
                if !inputs.contains(&metric) {
                    inputs.push(metric);
                }
            }
        }

        let (oracle, subgraph): (Vec<ScalarMetric>, Vec<ScalarMetric>) =
            inputs.into_iter().partition(|m| m.is_oracle());

        let key_metrics = async {
            if subgraph.is_empty() {
                return None;
            }
            let result = self
                .source
                .fetch_protocol_metrics(MetricsQuery::KeyMetrics, 1, endpoint)
                .await;
            if let Err(err) = &result {
                tracing::warn!(error = %err, "key metrics fetch failed");
            }
            Some(result)
        };
        let oracle_states = join_all(oracle.iter().map(|m| self.fetch_state(*m, endpoint)));
        let (periods, oracle_states) = join(key_metrics, oracle_states).await;

        let mut resolved: HashMap<ScalarMetric, MetricState<f64>> =
            oracle.into_iter().zip(oracle_states).collect();
        if let Some(periods) = periods {
            for metric in subgraph {
                let value = periods
                    .as_ref()
                    .map(|p| latest(p).and_then(|period| period.scalar(metric)))
                    .map_err(Clone::clone);
                resolved.insert(metric, value.into());
            }
        }
        let state_of = |metric: Option<ScalarMetric>| {
            metric
                .and_then(|m| resolved.get(&m).cloned())
                .unwrap_or(MetricState::Pending)
        };

        let ctx = self.render_context();
        Ok(tiles
            .iter()
            .map(|tile| {
                let wanted = tile.inputs();
                TileRecord {
                    tile: *tile,
                    record: tile.render(&ctx, state_of(wanted.primary), state_of(wanted.secondary)),
                }
            })
            .collect())
    }

    async fn fetch_state(&self, metric: ScalarMetric, endpoint: Option<&str>) -> MetricState<f64> {
        let result = self.source.fetch_scalar(metric, endpoint).await;
        if let Err(err) = &result {
            tracing::warn!(metric = %metric, error = %err, "metric fetch failed");
        }
        result.into()
    }

    /// Builds a chart payload.
    ///
    /// # Errors
    ///
    /// Returns a [`DashboardError`] if the endpoint override is rejected, or
    /// [`DashboardError::Source`] when the fetch fails under
    /// [`LoadingPolicy::SurfaceFailures`].
    pub async fn chart(
        &self,
        kind: ChartKind,
        options: &FetchOptions,
    ) -> Result<ChartPayload, DashboardError> {
        let endpoint = self
            .config
            .endpoint_override(options.subgraph_url.as_deref())?;
        let count = self.config.records_count(options.count);
        let query = chart_query(kind);

        let metrics = self.fetch_series(query, count, endpoint).await?;
        let url = query_explorer_url(endpoint.unwrap_or(self.source.endpoint()), query.document());
        kind.build(
            metrics.as_deref(),
            &self.config.display,
            self.formatter.as_ref(),
            url,
        )
    }

    /// Builds the asset table for the most recent period.
    ///
    /// # Errors
    ///
    /// Returns a [`DashboardError`] if the endpoint override is rejected, or
    /// [`DashboardError::Source`] when the fetch fails under
    /// [`LoadingPolicy::SurfaceFailures`].
    pub async fn assets(&self, options: &FetchOptions) -> Result<AssetsSnapshot, DashboardError> {
        let endpoint = self
            .config
            .endpoint_override(options.subgraph_url.as_deref())?;
        let query = MetricsQuery::MarketValueMetricsComponents;

        let metrics = self.fetch_series(query, 1, endpoint).await?;
        let table = AssetsTable::build(metrics.as_deref(), self.formatter.as_ref())?;
        Ok(AssetsSnapshot {
            table,
            subgraph_query_url: query_explorer_url(
                endpoint.unwrap_or(self.source.endpoint()),
                query.document(),
            ),
        })
    }

    /// Fetches a series. A failure is `Ok(None)` (still loading) unless
    /// failures are surfaced.
    async fn fetch_series(
        &self,
        query: MetricsQuery,
        count: u32,
        endpoint: Option<&str>,
    ) -> Result<Option<Vec<ProtocolMetric>>, SourceError> {
        match self.source.fetch_protocol_metrics(query, count, endpoint).await {
            Ok(metrics) => Ok(Some(metrics)),
            Err(err) => {
                tracing::warn!(query = query.name(), error = %err, "series fetch failed");
                match self.config.loading_policy {
                    LoadingPolicy::CollapseFailures => Ok(None),
                    LoadingPolicy::SurfaceFailures => Err(err),
                }
            }
        }
    }
}

const fn chart_query(kind: ChartKind) -> MetricsQuery {
    match kind {
        ChartKind::LiquidBackingComparison => MetricsQuery::KeyMetrics,
        ChartKind::MarketValue => MetricsQuery::MarketValueMetrics,
        ChartKind::ProtocolOwnedLiquidity => MetricsQuery::ProtocolOwnedLiquidityComponents,
    }
}
