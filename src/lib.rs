//! # treasury-dashboard
//!
//! REST API and WebSocket service serving pre-rendered treasury dashboard
//! data: metric tiles, line/stack chart payloads and a sortable holdings
//! table.
//!
//! All figures come from a protocol metrics subgraph. This service fetches
//! them, applies the per-tile derivation (currency, ratio, compounding,
//! placeholder) and hands widgets display-ready records.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── DashboardService (service/)
//!     ├── MetricsRefresher (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── Tiles, charts, asset table (domain/)
//!     │
//!     └── MetricsSource (subgraph/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod subgraph;
pub mod ws;
