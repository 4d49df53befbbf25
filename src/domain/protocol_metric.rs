//! Per-period protocol metric records as indexed by the subgraph.
//!
//! Subgraph `BigDecimal`s arrive as JSON strings. Scalars are decoded into
//! `Option<f64>`; token record values keep their raw decimal string.

use serde::Deserialize;

use super::scalar_metric::ScalarMetric;

/// Index of the most recent period in a source response.
///
/// The source returns periods newest first. Every "latest value" lookup
/// (chart headers, the asset table) goes through this constant; nothing
/// infers recency from the array length or re-sorts the data.
pub const MOST_RECENT_INDEX: usize = 0;

/// Returns the most recent period of a newest-first series.
#[must_use]
pub fn latest<T>(periods: &[T]) -> Option<&T> {
    periods.get(MOST_RECENT_INDEX)
}

/// One token's contribution to a component bucket, as sent by the source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceTokenRecord {
    /// Token symbol or pool name.
    pub token: String,
    /// Value in USD as a decimal string.
    #[serde(deserialize_with = "decimal::string_from_any")]
    pub value: String,
}

/// A component bucket: its total and the per-token records.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TokenRecords {
    /// Total value of the bucket.
    #[serde(default, deserialize_with = "decimal::opt_f64")]
    pub value: Option<f64>,
    /// Per-token records.
    #[serde(default)]
    pub records: Vec<SourceTokenRecord>,
}

/// Protocol metrics for one period.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolMetric {
    /// Period start as Unix seconds.
    #[serde(deserialize_with = "decimal::i64_from_any")]
    pub timestamp: i64,
    /// Token price.
    #[serde(default, deserialize_with = "decimal::opt_f64")]
    pub ohm_price: Option<f64>,
    /// Wrapped token price.
    #[serde(default, deserialize_with = "decimal::opt_f64")]
    pub g_ohm_price: Option<f64>,
    /// Market capitalization.
    #[serde(default, deserialize_with = "decimal::opt_f64")]
    pub market_cap: Option<f64>,
    /// Total supply.
    #[serde(default, deserialize_with = "decimal::opt_f64")]
    pub total_supply: Option<f64>,
    /// Circulating supply.
    #[serde(default, deserialize_with = "decimal::opt_f64")]
    pub ohm_circulating_supply: Option<f64>,
    /// Floating supply.
    #[serde(default, deserialize_with = "decimal::opt_f64")]
    pub ohm_floating_supply: Option<f64>,
    /// Staking index.
    #[serde(default, deserialize_with = "decimal::opt_f64")]
    pub current_index: Option<f64>,
    /// Total value deposited.
    #[serde(default, deserialize_with = "decimal::opt_f64")]
    pub total_value_locked: Option<f64>,
    /// Next epoch rebase, in percent.
    #[serde(default, deserialize_with = "decimal::opt_f64")]
    pub next_epoch_rebase: Option<f64>,
    /// Treasury market value.
    #[serde(default, deserialize_with = "decimal::opt_f64")]
    pub treasury_market_value: Option<f64>,
    /// Liquid backing per floating token.
    #[serde(default, deserialize_with = "decimal::opt_f64")]
    pub treasury_liquid_backing_per_ohm_floating: Option<f64>,
    /// Liquid backing per wrapped token.
    #[serde(default, deserialize_with = "decimal::opt_f64")]
    pub treasury_liquid_backing_per_g_ohm: Option<f64>,
    /// Stablecoin holdings value.
    #[serde(default, deserialize_with = "decimal::opt_f64")]
    pub treasury_stable_value: Option<f64>,
    /// Volatile asset holdings value.
    #[serde(default, deserialize_with = "decimal::opt_f64")]
    pub treasury_volatile_value: Option<f64>,
    /// Protocol-owned liquidity value.
    #[serde(default, rename = "treasuryLPValue", deserialize_with = "decimal::opt_f64")]
    pub treasury_lp_value: Option<f64>,
    /// Stablecoin components.
    #[serde(default)]
    pub treasury_stable_value_components: Option<TokenRecords>,
    /// Volatile asset components.
    #[serde(default)]
    pub treasury_volatile_value_components: Option<TokenRecords>,
    /// Protocol-owned liquidity components.
    #[serde(default, rename = "treasuryLPValueComponents")]
    pub treasury_lp_value_components: Option<TokenRecords>,
}

impl ProtocolMetric {
    /// Reads a scalar metric from this period.
    ///
    /// Oracle prices are never part of an indexed record and return `None`.
    /// The rebase rate is converted from percent to a fraction.
    #[must_use]
    pub fn scalar(&self, metric: ScalarMetric) -> Option<f64> {
        match metric {
            ScalarMetric::MarketCap => self.market_cap,
            ScalarMetric::TokenPrice => self.ohm_price,
            ScalarMetric::WrappedTokenPrice => self.g_ohm_price,
            ScalarMetric::TotalSupply => self.total_supply,
            ScalarMetric::CirculatingSupply => self.ohm_circulating_supply,
            ScalarMetric::FloatingSupply => self.ohm_floating_supply,
            ScalarMetric::LiquidBackingPerFloating => self.treasury_liquid_backing_per_ohm_floating,
            ScalarMetric::LiquidBackingPerWrapped => self.treasury_liquid_backing_per_g_ohm,
            ScalarMetric::CurrentIndex => self.current_index,
            ScalarMetric::TotalValueLocked => self.total_value_locked,
            ScalarMetric::StakingRebaseRate => self.next_epoch_rebase.map(|pct| pct / 100.0),
            ScalarMetric::TreasuryMarketValue => self.treasury_market_value,
            ScalarMetric::OracleTokenPrice | ScalarMetric::OracleWrappedTokenPrice => None,
        }
    }

    /// Returns the component bucket for `key`.
    #[must_use]
    pub const fn components(&self, key: ComponentKey) -> Option<&TokenRecords> {
        match key {
            ComponentKey::StableValue => self.treasury_stable_value_components.as_ref(),
            ComponentKey::VolatileValue => self.treasury_volatile_value_components.as_ref(),
            ComponentKey::LpValue => self.treasury_lp_value_components.as_ref(),
        }
    }
}

/// Plain series selectable from a [`ProtocolMetric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesField {
    /// Token price.
    TokenPrice,
    /// Liquid backing per floating token.
    LiquidBackingPerFloating,
    /// Stablecoin holdings value.
    StableValue,
    /// Volatile holdings value.
    VolatileValue,
    /// Protocol-owned liquidity value.
    LpValue,
}

impl SeriesField {
    /// Series key in chart payloads, matching the source field name.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::TokenPrice => "ohmPrice",
            Self::LiquidBackingPerFloating => "treasuryLiquidBackingPerOhmFloating",
            Self::StableValue => "treasuryStableValue",
            Self::VolatileValue => "treasuryVolatileValue",
            Self::LpValue => "treasuryLPValue",
        }
    }

    /// Reads this series from one period.
    #[must_use]
    pub const fn value(self, metric: &ProtocolMetric) -> Option<f64> {
        match self {
            Self::TokenPrice => metric.ohm_price,
            Self::LiquidBackingPerFloating => metric.treasury_liquid_backing_per_ohm_floating,
            Self::StableValue => metric.treasury_stable_value,
            Self::VolatileValue => metric.treasury_volatile_value,
            Self::LpValue => metric.treasury_lp_value,
        }
    }
}

/// Component buckets holding per-token records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentKey {
    /// Stablecoins.
    StableValue,
    /// Volatile assets.
    VolatileValue,
    /// Protocol-owned liquidity.
    LpValue,
}

impl ComponentKey {
    /// Source field name, also used as the prefix of token series keys.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::StableValue => "treasuryStableValueComponents",
            Self::VolatileValue => "treasuryVolatileValueComponents",
            Self::LpValue => "treasuryLPValueComponents",
        }
    }
}

mod decimal {
    use serde::de::{self, Deserializer};
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(f64),
    }

    pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Num(n)) => Ok(Some(n)),
            Some(Raw::Str(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("invalid decimal: {s}"))),
        }
    }

    pub fn i64_from_any<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Num(n) if n.is_finite() => Ok(n as i64),
            Raw::Num(n) => Err(de::Error::custom(format!("invalid timestamp: {n}"))),
            Raw::Str(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| de::Error::custom(format!("invalid timestamp: {s}"))),
        }
    }

    pub fn string_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Str(s) => Ok(s),
            Raw::Num(n) => Ok(n.to_string()),
        }
    }
}
