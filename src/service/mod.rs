//! Service layer: fetch orchestration and background refresh.
//!
//! [`DashboardService`] fetches from a [`crate::subgraph::MetricsSource`]
//! and renders through the domain layer. [`MetricsRefresher`] polls it and
//! emits events through the [`super::domain::EventBus`].

pub mod dashboard_service;
pub mod refresher;

pub use dashboard_service::{AssetsSnapshot, DashboardService, FetchOptions, TileRecord};
pub use refresher::MetricsRefresher;
