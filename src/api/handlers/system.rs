//! System endpoints: health check, tile catalogue, display settings.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::TileInfoDto;
use crate::app_state::AppState;
use crate::domain::{LoadingPolicy, MetricTile};

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /config/tiles`: List dashboard tiles.
#[utoipa::path(
    get,
    path = "/config/tiles",
    tag = "System",
    summary = "List dashboard tiles",
    description = "Returns every tile id with its label and the decimal places its metric is shown with.",
    responses(
        (status = 200, description = "Tile catalogue", body = Vec<TileInfoDto>),
    )
)]
pub async fn tiles_handler(State(state): State<AppState>) -> impl IntoResponse {
    let display = &state.dashboard_service.config().display;
    let tiles: Vec<TileInfoDto> = MetricTile::ALL
        .into_iter()
        .map(|tile| TileInfoDto {
            tile,
            label: tile.label(display),
            decimals: (tile != MetricTile::WrappedCirculatingSupply)
                .then(|| display.decimals_for(tile)),
        })
        .collect();
    (StatusCode::OK, Json(tiles))
}

/// Display settings response.
#[derive(Debug, Serialize, ToSchema)]
pub struct DisplayResponse {
    token_symbol: String,
    staked_symbol: String,
    wrapped_symbol: String,
    palette: Vec<String>,
    compounding_periods: u32,
    #[schema(value_type = String)]
    loading_policy: LoadingPolicy,
}

/// `GET /config/display`: Presentation settings.
#[utoipa::path(
    get,
    path = "/config/display",
    tag = "System",
    summary = "Presentation settings",
    description = "Returns the token symbols, chart palette, compounding periods and failure display policy in effect.",
    responses(
        (status = 200, description = "Display settings", body = DisplayResponse),
    )
)]
pub async fn display_handler(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.dashboard_service.config();
    let display = &config.display;
    (
        StatusCode::OK,
        Json(DisplayResponse {
            token_symbol: display.token_symbol.clone(),
            staked_symbol: display.staked_symbol(),
            wrapped_symbol: display.wrapped_symbol(),
            palette: display.palette.clone(),
            compounding_periods: display.compounding_periods,
            loading_policy: config.loading_policy,
        }),
    )
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/tiles", get(tiles_handler))
        .route("/config/display", get(display_handler))
}
