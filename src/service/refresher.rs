//! Background polling of tiles with change notifications.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::dashboard_service::{DashboardService, FetchOptions};
use crate::domain::{DashboardEvent, EventBus, MetricDisplayRecord, MetricTile};

/// Re-renders every tile on a fixed interval and publishes a
/// [`DashboardEvent::TileUpdated`] for each record that changed.
///
/// The first poll publishes every tile, so subscribers connected before it
/// receive a full snapshot.
#[derive(Debug)]
pub struct MetricsRefresher {
    service: Arc<DashboardService>,
    event_bus: EventBus,
    interval: Duration,
    last: HashMap<MetricTile, MetricDisplayRecord>,
}

impl MetricsRefresher {
    /// Creates a refresher polling every `interval`.
    #[must_use]
    pub fn new(service: Arc<DashboardService>, event_bus: EventBus, interval: Duration) -> Self {
        Self {
            service,
            event_bus,
            interval,
            last: HashMap::new(),
        }
    }

    /// Renders all tiles once and publishes the changed ones.
    ///
    /// Returns the number of events published.
    pub async fn refresh_once(&mut self) -> usize {
        let records = match self.service.tiles(&FetchOptions::default()).await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(error = %err, "tile refresh failed");
                return 0;
            }
        };

        let mut published = 0;
        for entry in records {
            if self.last.get(&entry.tile) == Some(&entry.record) {
                continue;
            }
            self.last.insert(entry.tile, entry.record.clone());
            let _ = self.event_bus.publish(DashboardEvent::TileUpdated {
                tile: entry.tile,
                record: entry.record,
                timestamp: Utc::now(),
            });
            published += 1;
        }
        if published > 0 {
            tracing::debug!(changed = published, "tiles refreshed");
        }
        published
    }

    /// Spawns the polling loop on the current runtime.
    pub fn spawn(mut self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tracing::info!(interval_secs = self.interval.as_secs(), "metrics refresher started");
            loop {
                ticker.tick().await;
                self.refresh_once().await;
            }
        })
    }
}
