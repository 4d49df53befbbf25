//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::time::Duration;

use crate::domain::display_config::{DEFAULT_COMPOUNDING_PERIODS, DEFAULT_PALETTE};
use crate::domain::{DisplayConfig, LoadingPolicy};
use crate::error::DashboardError;

/// Protocol metrics subgraph queried when `SUBGRAPH_URL` is not set.
pub const DEFAULT_SUBGRAPH_URL: &str =
    "https://api.thegraph.com/subgraphs/name/olympusdao/protocol-metrics";

/// Top-level service configuration.
///
/// Loaded once at startup via [`DashboardConfig::from_env`].
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Default subgraph endpoint.
    pub subgraph_url: String,

    /// Per-request subgraph timeout in seconds.
    pub subgraph_timeout_secs: u64,

    /// Whether requests may point the service at another subgraph.
    pub allow_subgraph_override: bool,

    /// Periods fetched for charts when the request gives no `count`.
    pub default_records_count: u32,

    /// Upper bound for a requested `count`.
    pub max_records_count: u32,

    /// Seconds between tile refreshes (0 = refresher disabled).
    pub refresh_interval_secs: u64,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// How fetch failures are displayed.
    pub loading_policy: LoadingPolicy,

    /// Token symbol, palette and precision settings.
    pub display: DisplayConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            subgraph_url: DEFAULT_SUBGRAPH_URL.to_string(),
            subgraph_timeout_secs: 10,
            allow_subgraph_override: false,
            default_records_count: 90,
            max_records_count: 1000,
            refresh_interval_secs: 60,
            event_bus_capacity: 1024,
            loading_policy: LoadingPolicy::CollapseFailures,
            display: DisplayConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to the [`Default`] values when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as a
    /// [`SocketAddr`], or if the display settings are inconsistent.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr: SocketAddr = match std::env::var("LISTEN_ADDR") {
            Ok(addr) => addr.parse()?,
            Err(_) => defaults.listen_addr,
        };

        let subgraph_url = std::env::var("SUBGRAPH_URL").unwrap_or(defaults.subgraph_url);
        let subgraph_timeout_secs =
            parse_env("SUBGRAPH_TIMEOUT_SECS", defaults.subgraph_timeout_secs);
        let allow_subgraph_override =
            parse_env_bool("ALLOW_SUBGRAPH_OVERRIDE", defaults.allow_subgraph_override);

        let max_records_count = parse_env("MAX_RECORDS_COUNT", defaults.max_records_count).max(1);
        let default_records_count = parse_env("DEFAULT_RECORDS_COUNT", defaults.default_records_count)
            .clamp(1, max_records_count);

        let refresh_interval_secs =
            parse_env("REFRESH_INTERVAL_SECS", defaults.refresh_interval_secs);
        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", defaults.event_bus_capacity);

        let loading_policy = if parse_env_bool("SURFACE_FETCH_FAILURES", false) {
            LoadingPolicy::SurfaceFailures
        } else {
            LoadingPolicy::CollapseFailures
        };

        let token_symbol = std::env::var("TOKEN_SYMBOL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.display.token_symbol);
        let palette = std::env::var("CHART_PALETTE")
            .ok()
            .map(|raw| parse_palette(&raw))
            .unwrap_or_else(|| DEFAULT_PALETTE.iter().map(ToString::to_string).collect());
        let compounding_periods = parse_env("COMPOUNDING_PERIODS", DEFAULT_COMPOUNDING_PERIODS);
        let display = DisplayConfig::new(token_symbol, palette, compounding_periods)?;

        Ok(Self {
            listen_addr,
            subgraph_url,
            subgraph_timeout_secs,
            allow_subgraph_override,
            default_records_count,
            max_records_count,
            refresh_interval_secs,
            event_bus_capacity,
            loading_policy,
            display,
        })
    }

    /// Subgraph request timeout.
    #[must_use]
    pub const fn subgraph_timeout(&self) -> Duration {
        Duration::from_secs(self.subgraph_timeout_secs)
    }

    /// Refresh period, or `None` when the refresher is disabled.
    #[must_use]
    pub const fn refresh_interval(&self) -> Option<Duration> {
        if self.refresh_interval_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.refresh_interval_secs))
        }
    }

    /// Resolves a requested period count: the default when absent, clamped
    /// to `1..=max_records_count`.
    #[must_use]
    pub fn records_count(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_records_count)
            .clamp(1, self.max_records_count.max(1))
    }

    /// Validates a requested subgraph endpoint override.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::OverrideDisabled`] when an override is given
    /// but not allowed, and [`DashboardError::InvalidRequest`] when it is
    /// blank.
    pub fn endpoint_override<'a>(
        &self,
        requested: Option<&'a str>,
    ) -> Result<Option<&'a str>, DashboardError> {
        match requested {
            None => Ok(None),
            Some(_) if !self.allow_subgraph_override => Err(DashboardError::OverrideDisabled),
            Some(url) if url.trim().is_empty() => Err(DashboardError::InvalidRequest(
                "subgraph_url must not be empty".to_string(),
            )),
            Some(url) => Ok(Some(url.trim())),
        }
    }
}

/// Splits a comma-separated colour list, dropping blank entries.
fn parse_palette(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key)
        .ok()
        .map(|v| v.trim().to_ascii_lowercase())
        .as_deref()
    {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
