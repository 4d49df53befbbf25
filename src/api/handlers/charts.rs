//! Chart handler.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::ChartParams;
use crate::app_state::AppState;
use crate::domain::{ChartKind, ChartPayload};
use crate::error::{DashboardError, ErrorResponse};

/// `GET /charts/{chart}`: Build a chart payload.
///
/// # Errors
///
/// Returns [`DashboardError::ChartNotFound`] for an unknown chart id, or
/// a source error when fetch failures are surfaced.
#[utoipa::path(
    get,
    path = "/api/v1/charts/{chart}",
    tag = "Charts",
    summary = "Build a chart payload",
    description = "Returns series points (newest first), series keys, labels, colours and header texts for one treasury chart. Missing source data yields an empty series.",
    params(
        ("chart" = String, Path, description = "Chart id, e.g. `market_value`"),
        ChartParams,
    ),
    responses(
        (status = 200, description = "Chart payload", body = ChartPayload),
        (status = 404, description = "Unknown chart", body = ErrorResponse),
        (status = 502, description = "Source failure (when surfaced)", body = ErrorResponse),
    )
)]
pub async fn get_chart(
    State(state): State<AppState>,
    Path(chart): Path<String>,
    Query(params): Query<ChartParams>,
) -> Result<impl IntoResponse, DashboardError> {
    let kind: ChartKind = chart.parse()?;
    let payload = state
        .dashboard_service
        .chart(kind, &params.into_options())
        .await?;
    Ok(Json(payload))
}

/// Chart routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/charts/{chart}", get(get_chart))
}
