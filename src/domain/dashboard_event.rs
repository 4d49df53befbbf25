//! Events published when a tile's rendered record changes.
//!
//! The [`crate::service::MetricsRefresher`] emits a [`DashboardEvent`] through
//! the [`super::EventBus`] whenever a poll produces a record that differs from
//! the previous one. WebSocket connections forward them to subscribers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::display_record::MetricDisplayRecord;
use super::metric_tile::MetricTile;

/// Domain event broadcast to WebSocket subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum DashboardEvent {
    /// A tile rendered a different record than on the previous poll.
    TileUpdated {
        /// Tile identifier.
        tile: MetricTile,
        /// The new display record.
        record: MetricDisplayRecord,
        /// When the record was rendered.
        timestamp: DateTime<Utc>,
    },
}

impl DashboardEvent {
    /// Returns the tile this event concerns.
    #[must_use]
    pub const fn tile(&self) -> MetricTile {
        match self {
            Self::TileUpdated { tile, .. } => *tile,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::TileUpdated { .. } => "tile_updated",
        }
    }
}
