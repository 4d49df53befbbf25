//! Domain layer: tiles, derivations, charts, the asset table and events.
//!
//! Everything here is synchronous and free of I/O. Values arrive as
//! [`MetricState`]s or [`ProtocolMetric`] series and leave as display
//! records, chart payloads or table rows. The [`EventBus`] carries
//! [`DashboardEvent`]s from the refresher to WebSocket connections.

pub mod assets_table;
pub mod chart;
pub mod dashboard_event;
pub mod derivation;
pub mod display_config;
pub mod display_record;
pub mod event_bus;
pub mod format;
pub mod metric_state;
pub mod metric_tile;
pub mod protocol_metric;
pub mod scalar_metric;
pub mod token_summary;

pub use assets_table::{AssetRow, AssetsTable, SortDirection, SortField};
pub use chart::{ChartKind, ChartPayload, ChartSeriesPoint};
pub use dashboard_event::DashboardEvent;
pub use display_config::DisplayConfig;
pub use display_record::{MetricBase, MetricDisplayRecord};
pub use event_bus::EventBus;
pub use format::{UsdFormatter, ValueFormatter};
pub use metric_state::{LoadingPolicy, MetricState};
pub use metric_tile::{MetricTile, RenderContext};
pub use protocol_metric::{MOST_RECENT_INDEX, ProtocolMetric};
pub use scalar_metric::ScalarMetric;
