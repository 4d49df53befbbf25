//! Metric tile handlers: all tiles, one tile.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{MetricsResponse, SourceParams, TileRecordDto};
use crate::app_state::AppState;
use crate::domain::{MetricDisplayRecord, MetricTile};
use crate::error::{DashboardError, ErrorResponse};

/// `GET /metrics`: Render every tile.
///
/// # Errors
///
/// Returns [`DashboardError`] if the endpoint override is rejected.
#[utoipa::path(
    get,
    path = "/api/v1/metrics",
    tag = "Metrics",
    summary = "Render all tiles",
    description = "Fetches the inputs of every dashboard tile concurrently and returns their display records in dashboard order.",
    params(SourceParams),
    responses(
        (status = 200, description = "Display record per tile", body = MetricsResponse),
        (status = 400, description = "Endpoint override rejected", body = ErrorResponse),
    )
)]
pub async fn list_metrics(
    State(state): State<AppState>,
    Query(params): Query<SourceParams>,
) -> Result<impl IntoResponse, DashboardError> {
    let records = state
        .dashboard_service
        .tiles(&params.into_options())
        .await?;
    Ok(Json(MetricsResponse {
        data: records.into_iter().map(TileRecordDto::from).collect(),
    }))
}

/// `GET /metrics/{tile}`: Render one tile.
///
/// # Errors
///
/// Returns [`DashboardError::TileNotFound`] for an unknown tile id.
#[utoipa::path(
    get,
    path = "/api/v1/metrics/{tile}",
    tag = "Metrics",
    summary = "Render one tile",
    description = "Returns the display record of a single tile. Exactly one of `metric`, `is_loading` and `error` is set.",
    params(
        ("tile" = String, Path, description = "Tile id, e.g. `market_cap`"),
        SourceParams,
    ),
    responses(
        (status = 200, description = "Display record", body = MetricDisplayRecord),
        (status = 404, description = "Unknown tile", body = ErrorResponse),
    )
)]
pub async fn get_metric(
    State(state): State<AppState>,
    Path(tile): Path<String>,
    Query(params): Query<SourceParams>,
) -> Result<impl IntoResponse, DashboardError> {
    let tile: MetricTile = tile.parse()?;
    let record = state
        .dashboard_service
        .tile(tile, &params.into_options())
        .await?;
    Ok(Json(record))
}

/// Metric routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/metrics", get(list_metrics))
        .route("/metrics/{tile}", get(get_metric))
}
