//! Presentation settings passed explicitly into every renderer.
//!
//! Colours, token symbols, compounding periods and per-tile precision live
//! here instead of in module constants so a caller (or a test) can swap them.

use std::collections::HashMap;

use serde::Serialize;

use super::MetricTile;
use crate::error::DashboardError;

/// Default chart palette, applied positionally to series.
pub const DEFAULT_PALETTE: [&str; 7] = [
    "#FFBF00", "#FF7F50", "#DE3163", "#9FE2BF", "#40E0D0", "#6495ED", "#CCCCFF",
];

/// Rebase periods per year (three rebases a day).
pub const DEFAULT_COMPOUNDING_PERIODS: u32 = 365 * 3;

/// Presentation settings for tiles, charts and the asset table.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayConfig {
    /// Base token symbol, e.g. `OHM`.
    pub token_symbol: String,
    /// Chart colours. Never empty.
    pub palette: Vec<String>,
    /// Number of compounding periods used for the APY tile.
    pub compounding_periods: u32,
    /// Per-tile decimal overrides.
    #[serde(skip)]
    pub precision_overrides: HashMap<MetricTile, usize>,
}

impl DisplayConfig {
    /// Builds a config, rejecting an empty palette.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if `palette` is empty or
    /// `compounding_periods` is zero or above `i32::MAX`.
    pub fn new(
        token_symbol: impl Into<String>,
        palette: Vec<String>,
        compounding_periods: u32,
    ) -> Result<Self, DashboardError> {
        if palette.is_empty() {
            return Err(DashboardError::Config("chart palette is empty".to_string()));
        }
        if compounding_periods == 0 {
            return Err(DashboardError::Config(
                "compounding periods must be positive".to_string(),
            ));
        }
        if i32::try_from(compounding_periods).is_err() {
            return Err(DashboardError::Config(format!(
                "compounding periods {compounding_periods} exceeds {}",
                i32::MAX
            )));
        }
        Ok(Self {
            token_symbol: token_symbol.into(),
            palette,
            compounding_periods,
            precision_overrides: HashMap::new(),
        })
    }

    /// Returns a copy with `decimals` used for `tile`.
    #[must_use]
    pub fn with_precision(mut self, tile: MetricTile, decimals: usize) -> Self {
        self.precision_overrides.insert(tile, decimals);
        self
    }

    /// Decimal places used for `tile`.
    #[must_use]
    pub fn decimals_for(&self, tile: MetricTile) -> usize {
        self.precision_overrides
            .get(&tile)
            .copied()
            .unwrap_or_else(|| tile.default_decimals())
    }

    /// Symbol of the staked token (`sOHM`).
    #[must_use]
    pub fn staked_symbol(&self) -> String {
        format!("s{}", self.token_symbol)
    }

    /// Symbol of the wrapped token (`gOHM`).
    #[must_use]
    pub fn wrapped_symbol(&self) -> String {
        format!("g{}", self.token_symbol)
    }

    /// Colour for the series at `index`, cycling through the palette.
    #[must_use]
    pub fn color_at(&self, index: usize) -> &str {
        self.palette
            .get(index % self.palette.len().max(1))
            .map_or("", String::as_str)
    }

    /// Colours for `count` series in positional order.
    ///
    /// Logs a warning when there are more series than palette entries, since
    /// colours then repeat.
    #[must_use]
    pub fn series_colors(&self, count: usize) -> Vec<String> {
        if count > self.palette.len() {
            tracing::warn!(
                series = count,
                palette = self.palette.len(),
                "more chart series than palette colours; colours repeat"
            );
        }
        (0..count).map(|i| self.color_at(i).to_string()).collect()
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            token_symbol: "OHM".to_string(),
            palette: DEFAULT_PALETTE.iter().map(ToString::to_string).collect(),
            compounding_periods: DEFAULT_COMPOUNDING_PERIODS,
            precision_overrides: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_palette_is_rejected() {
        let result = DisplayConfig::new("OHM", Vec::new(), 1095);
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[test]
    fn zero_periods_rejected() {
        let result = DisplayConfig::new("OHM", vec!["#000".to_string()], 0);
        assert!(result.is_err());
    }

    #[test]
    fn periods_above_i32_rejected() {
        let palette = vec!["#000".to_string()];
        let result = DisplayConfig::new("OHM", palette.clone(), u32::MAX);
        assert!(matches!(result, Err(DashboardError::Config(_))));
        let max = u32::try_from(i32::MAX).unwrap_or_default();
        assert!(DisplayConfig::new("OHM", palette, max).is_ok());
    }

    #[test]
    fn precision_override_wins() {
        let config = DisplayConfig::default().with_precision(MetricTile::MarketCap, 2);
        assert_eq!(config.decimals_for(MetricTile::MarketCap), 2);
        assert_eq!(config.decimals_for(MetricTile::TreasuryBalance), 0);
    }

    #[test]
    fn colors_are_positional() {
        let config = DisplayConfig::default();
        let colors = config.series_colors(3);
        assert_eq!(colors, vec!["#FFBF00", "#FF7F50", "#DE3163"]);
    }

    #[test]
    fn colors_cycle_past_palette() {
        let config = DisplayConfig::default();
        let colors = config.series_colors(9);
        assert_eq!(colors.len(), 9);
        assert_eq!(colors.get(7).map(String::as_str), Some("#FFBF00"));
        assert_eq!(colors.get(8).map(String::as_str), Some("#FF7F50"));
    }

    #[test]
    fn derived_symbols() {
        let config = DisplayConfig::default();
        assert_eq!(config.staked_symbol(), "sOHM");
        assert_eq!(config.wrapped_symbol(), "gOHM");
    }
}
