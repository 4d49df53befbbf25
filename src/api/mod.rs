//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Resource endpoints are mounted under `/api/v1`; system endpoints and the
//! WebSocket upgrade live at the root.

pub mod dto;
pub mod handlers;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// OpenAPI description of the REST endpoints.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "treasury-dashboard",
        description = "Pre-rendered treasury metric tiles, charts and holdings."
    ),
    paths(
        handlers::system::health_handler,
        handlers::system::tiles_handler,
        handlers::system::display_handler,
        handlers::metrics::list_metrics,
        handlers::metrics::get_metric,
        handlers::charts::get_chart,
        handlers::assets::get_assets,
    ),
    tags(
        (name = "System", description = "Health and configuration"),
        (name = "Metrics", description = "Metric tiles"),
        (name = "Charts", description = "Treasury charts"),
        (name = "Assets", description = "Treasury holdings table"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

/// Builds the full application: REST routes, `/ws`, tracing and CORS
/// layers, and the Swagger UI when the `swagger-ui` feature is enabled.
pub fn build_app(state: AppState) -> Router {
    let router = Router::new()
        .merge(build_router())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/config/tiles",
            "/config/display",
            "/api/v1/metrics",
            "/api/v1/metrics/{tile}",
            "/api/v1/charts/{chart}",
            "/api/v1/assets",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
    }
}
