//! REST endpoint handlers organized by resource.

pub mod assets;
pub mod charts;
pub mod metrics;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(metrics::routes())
        .merge(charts::routes())
        .merge(assets::routes())
}
