//! Asset table handler.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{AssetsParams, AssetsResponse};
use crate::app_state::AppState;
use crate::error::{DashboardError, ErrorResponse};

/// `GET /assets`: Treasury holdings of the latest period.
///
/// # Errors
///
/// Returns [`DashboardError`] if the endpoint override is rejected, or a
/// source error when fetch failures are surfaced.
#[utoipa::path(
    get,
    path = "/api/v1/assets",
    tag = "Assets",
    summary = "Treasury holdings",
    description = "Returns one row per token of the most recent period, sorted (default: value descending) and paginated.",
    params(AssetsParams),
    responses(
        (status = 200, description = "Holdings page", body = AssetsResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 502, description = "Source failure (when surfaced)", body = ErrorResponse),
    )
)]
pub async fn get_assets(
    State(state): State<AppState>,
    Query(params): Query<AssetsParams>,
) -> Result<impl IntoResponse, DashboardError> {
    let snapshot = state
        .dashboard_service
        .assets(&params.fetch_options())
        .await?;
    Ok(Json(AssetsResponse::from_snapshot(snapshot, &params)))
}

/// Asset routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/assets", get(get_assets))
}
