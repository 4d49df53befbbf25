//! Tile DTOs for the metrics and catalogue endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{MetricDisplayRecord, MetricTile};
use crate::service::TileRecord;

/// A tile and its display record.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TileRecordDto {
    /// Tile identifier.
    pub tile: MetricTile,
    /// Rendered record.
    #[serde(flatten)]
    pub record: MetricDisplayRecord,
}

impl From<TileRecord> for TileRecordDto {
    fn from(entry: TileRecord) -> Self {
        Self {
            tile: entry.tile,
            record: entry.record,
        }
    }
}

/// Response body for `GET /api/v1/metrics`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MetricsResponse {
    /// Every tile, in dashboard order.
    pub data: Vec<TileRecordDto>,
}

/// Catalogue entry for `GET /config/tiles`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TileInfoDto {
    /// Tile identifier.
    pub tile: MetricTile,
    /// Display label.
    pub label: String,
    /// Decimal places used for the metric, absent for the placeholder tile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<usize>,
}
