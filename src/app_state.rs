//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::DashboardService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Dashboard service for fetching and rendering.
    pub dashboard_service: Arc<DashboardService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}
