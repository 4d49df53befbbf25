//! treasury-dashboard server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints and the
//! background tile refresher.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use treasury_dashboard::api;
use treasury_dashboard::app_state::AppState;
use treasury_dashboard::config::DashboardConfig;
use treasury_dashboard::domain::{EventBus, UsdFormatter};
use treasury_dashboard::service::{DashboardService, MetricsRefresher};
use treasury_dashboard::subgraph::SubgraphClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Load configuration
    let config = DashboardConfig::from_env()?;
    tracing::info!(
        addr = %config.listen_addr,
        subgraph = %config.subgraph_url,
        policy = ?config.loading_policy,
        "starting treasury-dashboard"
    );

    // Build source and service layer
    let source = Arc::new(SubgraphClient::new(
        config.subgraph_url.clone(),
        config.subgraph_timeout(),
    )?);
    let event_bus = EventBus::new(config.event_bus_capacity);
    let refresh_interval = config.refresh_interval();
    let listen_addr = config.listen_addr;
    let dashboard_service = Arc::new(DashboardService::new(
        source,
        Arc::new(UsdFormatter),
        config,
    ));

    // Start background refresher
    match refresh_interval {
        Some(interval) => {
            MetricsRefresher::new(Arc::clone(&dashboard_service), event_bus.clone(), interval)
                .spawn();
        }
        None => tracing::info!("metrics refresher disabled"),
    }

    // Build application state
    let app_state = AppState {
        dashboard_service,
        event_bus,
    };

    // Build router
    let app = api::build_app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(addr = %listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
