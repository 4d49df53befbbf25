//! Treasury chart catalogue and payload assembly.
//!
//! A chart payload is everything a generic line/stack widget needs: series
//! points in source order, series keys with their labels and colours, and
//! the header texts.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::display_config::DisplayConfig;
use super::format::ValueFormatter;
use super::protocol_metric::{ComponentKey, ProtocolMetric, SeriesField, latest};
use super::token_summary::{
    data_keys_from_tokens, get_keys_token_summary, token_series, tokens_from_key,
};
use crate::error::DashboardError;

/// Component buckets that make up the treasury market value, in display order.
pub const MARKET_VALUE_KEYS: [ComponentKey; 3] = [
    ComponentKey::StableValue,
    ComponentKey::VolatileValue,
    ComponentKey::LpValue,
];

/// Category labels paired positionally with [`MARKET_VALUE_KEYS`].
pub const MARKET_VALUE_CATEGORIES: [&str; 3] =
    ["Stablecoins", "Volatile", "Protocol-Owned Liquidity"];

/// Item type shown next to chart values.
pub const ITEM_TYPE_DOLLAR: &str = "$";

const MARKET_VALUE_TOOLTIP: &str = "Market Value of Treasury Assets is the sum of the value (in dollars) of all assets held by the treasury.";

/// One period of a chart: its timestamp and a value per series key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeriesPoint {
    /// Period start as Unix seconds.
    pub timestamp: i64,
    /// Series key → value. Series missing in the period are omitted.
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl ChartSeriesPoint {
    /// Creates a point.
    #[must_use]
    pub const fn new(timestamp: i64, values: BTreeMap<String, f64>) -> Self {
        Self { timestamp, values }
    }

    /// Selects `fields` from one period.
    #[must_use]
    pub fn from_fields(metric: &ProtocolMetric, fields: &[SeriesField]) -> Self {
        let values = fields
            .iter()
            .filter_map(|field| field.value(metric).map(|v| (field.key().to_string(), v)))
            .collect();
        Self::new(metric.timestamp, values)
    }
}

/// Widget a chart is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    /// Overlaid lines.
    Composed,
    /// Stacked areas.
    Stack,
}

/// How chart values are formatted by the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DataFormat {
    /// US dollar amounts.
    Currency,
}

/// Treasury charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Token price against liquid backing per floating token.
    LiquidBackingComparison,
    /// Treasury market value split by asset category.
    MarketValue,
    /// Protocol-owned liquidity split by pool.
    ProtocolOwnedLiquidity,
}

impl ChartKind {
    /// Every chart.
    pub const ALL: [Self; 3] = [
        Self::LiquidBackingComparison,
        Self::MarketValue,
        Self::ProtocolOwnedLiquidity,
    ];

    /// Stable identifier used in URLs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LiquidBackingComparison => "liquid_backing_comparison",
            Self::MarketValue => "market_value",
            Self::ProtocolOwnedLiquidity => "protocol_owned_liquidity",
        }
    }

    /// Widget used to draw the chart.
    #[must_use]
    pub const fn chart_type(self) -> ChartType {
        match self {
            Self::LiquidBackingComparison => ChartType::Composed,
            Self::MarketValue | Self::ProtocolOwnedLiquidity => ChartType::Stack,
        }
    }

    /// Decimal places for values and the header sub-text.
    #[must_use]
    pub const fn item_decimals(self) -> usize {
        match self {
            Self::LiquidBackingComparison => 2,
            Self::MarketValue | Self::ProtocolOwnedLiquidity => 0,
        }
    }

    /// Builds the payload from newest-first `metrics`.
    ///
    /// Absent `metrics` produce an empty series and no header sub-text.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::SeriesMismatch`] if a token breakdown is
    /// built from mismatched keys and categories.
    pub fn build(
        self,
        metrics: Option<&[ProtocolMetric]>,
        config: &DisplayConfig,
        formatter: &dyn ValueFormatter,
        subgraph_query_url: String,
    ) -> Result<ChartPayload, DashboardError> {
        let decimals = self.item_decimals();
        let newest = metrics.and_then(latest);
        let symbol = &config.token_symbol;

        let (data, data_keys, item_names, header_text, header_value, info_tooltip) = match self {
            Self::LiquidBackingComparison => {
                let fields = [SeriesField::TokenPrice, SeriesField::LiquidBackingPerFloating];
                (
                    multi_series(metrics, &fields),
                    fields.iter().map(|f| f.key().to_string()).collect(),
                    vec![
                        format!("{symbol} Price"),
                        format!("Liquid Backing per Floating {symbol}"),
                    ],
                    format!("{symbol} Backing"),
                    newest.and_then(|m| m.treasury_liquid_backing_per_ohm_floating),
                    format!(
                        "Liquid backing per floating {symbol} is the value of the treasury's liquid assets divided by the {symbol} supply outside the treasury and protocol-owned liquidity."
                    ),
                )
            }
            Self::MarketValue => {
                let fields = [
                    SeriesField::StableValue,
                    SeriesField::VolatileValue,
                    SeriesField::LpValue,
                ];
                (
                    multi_series(metrics, &fields),
                    fields.iter().map(|f| f.key().to_string()).collect(),
                    MARKET_VALUE_CATEGORIES.iter().map(ToString::to_string).collect(),
                    "Market Value of Treasury Assets".to_string(),
                    newest.and_then(|m| m.treasury_market_value),
                    MARKET_VALUE_TOOLTIP.to_string(),
                )
            }
            Self::ProtocolOwnedLiquidity => {
                let key = ComponentKey::LpValue;
                let summaries =
                    get_keys_token_summary(metrics, &[key], &["Protocol-Owned Liquidity"])?;
                let tokens = tokens_from_key(&summaries, key);
                (
                    token_series(&summaries, key),
                    data_keys_from_tokens(&tokens, key),
                    tokens,
                    "Protocol-Owned Liquidity".to_string(),
                    newest.and_then(|m| m.components(key)).and_then(|c| c.value),
                    MARKET_VALUE_TOOLTIP.to_string(),
                )
            }
        };

        Ok(ChartPayload {
            chart: self,
            chart_type: self.chart_type(),
            colors: config.series_colors(data_keys.len()),
            data,
            data_keys,
            item_names,
            header_text,
            header_sub_text: header_value.map(|v| formatter.currency(v, decimals)),
            info_tooltip,
            data_format: DataFormat::Currency,
            item_type: ITEM_TYPE_DOLLAR.to_string(),
            item_decimals: decimals,
            subgraph_query_url,
        })
    }
}

fn multi_series(metrics: Option<&[ProtocolMetric]>, fields: &[SeriesField]) -> Vec<ChartSeriesPoint> {
    metrics
        .unwrap_or_default()
        .iter()
        .map(|metric| ChartSeriesPoint::from_fields(metric, fields))
        .collect()
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|chart| chart.as_str() == normalized)
            .ok_or_else(|| DashboardError::ChartNotFound(s.to_string()))
    }
}

/// Chart-ready data with its display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartPayload {
    /// Chart identifier.
    pub chart: ChartKind,
    /// Widget used to draw the chart.
    pub chart_type: ChartType,
    /// One point per period, newest first.
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<ChartSeriesPoint>,
    /// Series keys, in drawing order.
    pub data_keys: Vec<String>,
    /// Legend label per series key.
    pub item_names: Vec<String>,
    /// Colour per series key.
    pub colors: Vec<String>,
    /// Chart title.
    pub header_text: String,
    /// Latest headline value, absent while loading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_sub_text: Option<String>,
    /// Explanatory tooltip text.
    pub info_tooltip: String,
    /// Value format.
    pub data_format: DataFormat,
    /// Unit shown next to values.
    pub item_type: String,
    /// Decimal places for values.
    pub item_decimals: usize,
    /// Link to the query in the subgraph explorer.
    pub subgraph_query_url: String,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::format::UsdFormatter;
    use crate::domain::protocol_metric::{SourceTokenRecord, TokenRecords};

    fn lp(value: f64, entries: &[(&str, &str)]) -> Option<TokenRecords> {
        Some(TokenRecords {
            value: Some(value),
            records: entries
                .iter()
                .map(|(token, value)| SourceTokenRecord {
                    token: (*token).to_string(),
                    value: (*value).to_string(),
                })
                .collect(),
        })
    }

    fn metrics() -> Vec<ProtocolMetric> {
        vec![
            ProtocolMetric {
                timestamp: 200,
                ohm_price: Some(12.5),
                treasury_liquid_backing_per_ohm_floating: Some(10.25),
                treasury_stable_value: Some(100.0),
                treasury_volatile_value: Some(50.0),
                treasury_lp_value: Some(25.0),
                treasury_market_value: Some(175.0),
                treasury_lp_value_components: lp(25.0, &[("OHM-DAI", "20"), ("OHM-ETH", "5")]),
                ..ProtocolMetric::default()
            },
            ProtocolMetric {
                timestamp: 100,
                ohm_price: Some(11.0),
                treasury_stable_value: Some(90.0),
                treasury_lp_value_components: lp(7.0, &[("OHM-FRAX", "7")]),
                ..ProtocolMetric::default()
            },
        ]
    }

    fn build(kind: ChartKind, metrics: Option<&[ProtocolMetric]>) -> ChartPayload {
        let Ok(payload) = kind.build(
            metrics,
            &DisplayConfig::default(),
            &UsdFormatter,
            "https://example.test/graphql?query=x".to_string(),
        ) else {
            panic!("chart builds");
        };
        payload
    }

    #[test]
    fn empty_data_yields_empty_series() {
        for kind in ChartKind::ALL {
            let payload = build(kind, None);
            assert!(payload.data.is_empty(), "{kind}");
            assert!(payload.header_sub_text.is_none(), "{kind}");
        }
        let payload = build(ChartKind::MarketValue, Some(&[]));
        assert!(payload.data.is_empty());
    }

    #[test]
    fn liquid_backing_comparison() {
        let metrics = metrics();
        let payload = build(ChartKind::LiquidBackingComparison, Some(&metrics));
        assert_eq!(payload.chart_type, ChartType::Composed);
        assert_eq!(
            payload.data_keys,
            vec!["ohmPrice", "treasuryLiquidBackingPerOhmFloating"]
        );
        assert_eq!(
            payload.item_names,
            vec!["OHM Price", "Liquid Backing per Floating OHM"]
        );
        assert_eq!(payload.header_text, "OHM Backing");
        assert_eq!(payload.header_sub_text.as_deref(), Some("$10.25"));
        assert_eq!(payload.item_decimals, 2);
        let Some(oldest) = payload.data.get(1) else {
            panic!("two points");
        };
        assert_eq!(oldest.timestamp, 100);
        assert_eq!(oldest.values.get("ohmPrice"), Some(&11.0));
        assert!(!oldest.values.contains_key("treasuryLiquidBackingPerOhmFloating"));
    }

    #[test]
    fn market_value_colors_follow_series_order() {
        let metrics = metrics();
        let payload = build(ChartKind::MarketValue, Some(&metrics));
        assert_eq!(payload.chart_type, ChartType::Stack);
        assert_eq!(payload.item_names, MARKET_VALUE_CATEGORIES.to_vec());
        assert_eq!(payload.colors, vec!["#FFBF00", "#FF7F50", "#DE3163"]);
        assert_eq!(payload.header_sub_text.as_deref(), Some("$175"));
    }

    #[test]
    fn protocol_owned_liquidity_series_per_token() {
        let metrics = metrics();
        let payload = build(ChartKind::ProtocolOwnedLiquidity, Some(&metrics));
        assert_eq!(payload.item_names, vec!["OHM-DAI", "OHM-ETH", "OHM-FRAX"]);
        assert_eq!(
            payload.data_keys,
            vec![
                "treasuryLPValueComponents.OHM-DAI",
                "treasuryLPValueComponents.OHM-ETH",
                "treasuryLPValueComponents.OHM-FRAX",
            ]
        );
        assert_eq!(payload.header_sub_text.as_deref(), Some("$25"));
        assert_eq!(payload.data.len(), 2);
    }

    #[test]
    fn points_serialize_flat() {
        let point = ChartSeriesPoint::new(5, BTreeMap::from([("ohmPrice".to_string(), 1.5)]));
        let Ok(json) = serde_json::to_value(&point) else {
            panic!("serializable");
        };
        assert_eq!(json, serde_json::json!({"timestamp": 5, "ohmPrice": 1.5}));
    }

    #[test]
    fn parse_chart_ids() {
        assert_eq!(
            "market-value".parse::<ChartKind>().ok(),
            Some(ChartKind::MarketValue)
        );
        assert!(matches!(
            "pie".parse::<ChartKind>(),
            Err(DashboardError::ChartNotFound(_))
        ));
    }
}
