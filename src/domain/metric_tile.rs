//! Metric tile catalogue and the rule each tile renders with.
//!
//! A tile names up to two [`ScalarMetric`] inputs. Rendering is a pure
//! function of those inputs' [`MetricState`]s and the [`RenderContext`]:
//! an absent required input always yields a loading record, never a partial
//! metric.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::derivation::{
    MetricError, SUPPLY_PLACEHOLDER, TOOLTIP_LOADING, compound_apy, format_apy, format_ratio,
    format_with_unit,
};
use super::display_config::DisplayConfig;
use super::display_record::{MetricBase, MetricDisplayRecord};
use super::format::ValueFormatter;
use super::metric_state::{LoadingPolicy, MetricState};
use super::scalar_metric::ScalarMetric;
use crate::error::DashboardError;

/// Dashboard metric tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetricTile {
    /// Market capitalization.
    MarketCap,
    /// Token price from the on-chain oracle.
    TokenPrice,
    /// Token price from the subgraph.
    TokenPriceFromSubgraph,
    /// Staked token price (equal to the token price).
    StakedTokenPrice,
    /// Circulating supply over total supply.
    CirculatingSupply,
    /// Wrapped token circulating supply; always a placeholder.
    WrappedCirculatingSupply,
    /// Liquid backing per floating token.
    BackingPerToken,
    /// Liquid backing per wrapped token.
    BackingPerWrappedToken,
    /// Current staking index.
    CurrentIndex,
    /// Wrapped token price from the on-chain oracle.
    WrappedTokenPrice,
    /// Wrapped token price from the subgraph.
    WrappedTokenPriceFromSubgraph,
    /// Total value deposited.
    TotalValueDeposited,
    /// Annualized staking rebases.
    StakingApy,
    /// Treasury market value.
    TreasuryBalance,
}

/// Inputs a tile reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileInputs {
    /// Input the metric is computed from.
    pub primary: Option<ScalarMetric>,
    /// Second input: the denominator of a ratio, or a value shown in the
    /// tooltip.
    pub secondary: Option<ScalarMetric>,
}

impl TileInputs {
    const NONE: Self = Self {
        primary: None,
        secondary: None,
    };

    const fn one(metric: ScalarMetric) -> Self {
        Self {
            primary: Some(metric),
            secondary: None,
        }
    }

    const fn two(primary: ScalarMetric, secondary: ScalarMetric) -> Self {
        Self {
            primary: Some(primary),
            secondary: Some(secondary),
        }
    }
}

/// Everything a tile needs to render besides its inputs.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Presentation settings.
    pub config: &'a DisplayConfig,
    /// Value formatter.
    pub formatter: &'a dyn ValueFormatter,
    /// How fetch failures are shown.
    pub policy: LoadingPolicy,
}

impl MetricTile {
    /// Every tile, in dashboard order.
    pub const ALL: [Self; 14] = [
        Self::MarketCap,
        Self::TokenPrice,
        Self::TokenPriceFromSubgraph,
        Self::StakedTokenPrice,
        Self::CirculatingSupply,
        Self::WrappedCirculatingSupply,
        Self::BackingPerToken,
        Self::BackingPerWrappedToken,
        Self::CurrentIndex,
        Self::WrappedTokenPrice,
        Self::WrappedTokenPriceFromSubgraph,
        Self::TotalValueDeposited,
        Self::StakingApy,
        Self::TreasuryBalance,
    ];

    /// Stable identifier used in URLs and events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MarketCap => "market_cap",
            Self::TokenPrice => "token_price",
            Self::TokenPriceFromSubgraph => "token_price_from_subgraph",
            Self::StakedTokenPrice => "staked_token_price",
            Self::CirculatingSupply => "circulating_supply",
            Self::WrappedCirculatingSupply => "wrapped_circulating_supply",
            Self::BackingPerToken => "backing_per_token",
            Self::BackingPerWrappedToken => "backing_per_wrapped_token",
            Self::CurrentIndex => "current_index",
            Self::WrappedTokenPrice => "wrapped_token_price",
            Self::WrappedTokenPriceFromSubgraph => "wrapped_token_price_from_subgraph",
            Self::TotalValueDeposited => "total_value_deposited",
            Self::StakingApy => "staking_apy",
            Self::TreasuryBalance => "treasury_balance",
        }
    }

    /// Decimal places used unless [`DisplayConfig`] overrides them.
    #[must_use]
    pub const fn default_decimals(self) -> usize {
        match self {
            Self::MarketCap
            | Self::CirculatingSupply
            | Self::WrappedCirculatingSupply
            | Self::TotalValueDeposited
            | Self::TreasuryBalance => 0,
            Self::StakingApy => 1,
            Self::TokenPrice
            | Self::TokenPriceFromSubgraph
            | Self::StakedTokenPrice
            | Self::BackingPerToken
            | Self::BackingPerWrappedToken
            | Self::CurrentIndex
            | Self::WrappedTokenPrice
            | Self::WrappedTokenPriceFromSubgraph => 2,
        }
    }

    /// Metrics this tile reads.
    #[must_use]
    pub const fn inputs(self) -> TileInputs {
        match self {
            Self::MarketCap => TileInputs::one(ScalarMetric::MarketCap),
            Self::TokenPrice | Self::StakedTokenPrice => {
                TileInputs::one(ScalarMetric::OracleTokenPrice)
            }
            Self::TokenPriceFromSubgraph => TileInputs::one(ScalarMetric::TokenPrice),
            Self::CirculatingSupply => {
                TileInputs::two(ScalarMetric::CirculatingSupply, ScalarMetric::TotalSupply)
            }
            Self::WrappedCirculatingSupply => TileInputs::NONE,
            Self::BackingPerToken => TileInputs::two(
                ScalarMetric::LiquidBackingPerFloating,
                ScalarMetric::FloatingSupply,
            ),
            Self::BackingPerWrappedToken => TileInputs::one(ScalarMetric::LiquidBackingPerWrapped),
            Self::CurrentIndex => TileInputs::one(ScalarMetric::CurrentIndex),
            Self::WrappedTokenPrice => TileInputs::one(ScalarMetric::OracleWrappedTokenPrice),
            Self::WrappedTokenPriceFromSubgraph => {
                TileInputs::one(ScalarMetric::WrappedTokenPrice)
            }
            Self::TotalValueDeposited => TileInputs::one(ScalarMetric::TotalValueLocked),
            Self::StakingApy => TileInputs::one(ScalarMetric::StakingRebaseRate),
            Self::TreasuryBalance => TileInputs::one(ScalarMetric::TreasuryMarketValue),
        }
    }

    /// Tile label.
    #[must_use]
    pub fn label(self, config: &DisplayConfig) -> String {
        let symbol = &config.token_symbol;
        match self {
            Self::MarketCap => format!("{symbol} Market Cap"),
            Self::TokenPrice | Self::TokenPriceFromSubgraph => format!("{symbol} Price"),
            Self::StakedTokenPrice => format!("{} Price", config.staked_symbol()),
            Self::CirculatingSupply => format!("{symbol} Circulating Supply / Total"),
            Self::WrappedCirculatingSupply => {
                format!("{} Circulating Supply / Total", config.wrapped_symbol())
            }
            Self::BackingPerToken => format!("Liquid Backing per {symbol}"),
            Self::BackingPerWrappedToken => {
                format!("Liquid Backing per {}", config.wrapped_symbol())
            }
            Self::CurrentIndex => "Current Index".to_string(),
            Self::WrappedTokenPrice | Self::WrappedTokenPriceFromSubgraph => {
                format!("{} Price", config.wrapped_symbol())
            }
            Self::TotalValueDeposited => "Total Value Deposited".to_string(),
            Self::StakingApy => "Annualized Rebases".to_string(),
            Self::TreasuryBalance => "Treasury Balance".to_string(),
        }
    }

    /// Tooltip text. `floating_supply` is only read by
    /// [`MetricTile::BackingPerToken`].
    #[must_use]
    pub fn tooltip(
        self,
        config: &DisplayConfig,
        formatter: &dyn ValueFormatter,
        floating_supply: Option<f64>,
    ) -> String {
        let symbol = &config.token_symbol;
        let staked = config.staked_symbol();
        let wrapped = config.wrapped_symbol();
        match self {
            Self::MarketCap => format!(
                "Market capitalization is the dollar value of the outstanding {symbol} tokens. \
                 It is calculated here as the price of {symbol} multiplied by the circulating supply.\n\n\
                 As the displayed {symbol} price is rounded to 2 decimal places, a manual calculation \
                 using the displayed values is likely to slightly differ from the reported market cap. \
                 The reported market cap is accurate, as it uses the unrounded price of {symbol}.\n\n\
                 Note: other sources may be inaccurate."
            ),
            Self::TokenPriceFromSubgraph => {
                "This price is sourced from the subgraph, so will lag the real-time market rate."
                    .to_string()
            }
            Self::CirculatingSupply => format!(
                "Circulating supply is the quantity of outstanding {symbol} not owned by the protocol \
                 in the treasury. {symbol} deployed in Protocol-Owned Liquidity is therefore included \
                 in circulating supply."
            ),
            Self::WrappedCirculatingSupply => format!(
                "{wrapped} supply is synthetically derived from {symbol} supply divided by the index."
            ),
            Self::BackingPerToken => {
                let floating = floating_supply.map_or_else(
                    || TOOLTIP_LOADING.to_string(),
                    |supply| formatter.number(supply, 0),
                );
                format!(
                    "Liquid backing is divided by floating supply of {symbol} to give liquid backing \
                     per {symbol}.\n\nFloating supply is the quantity of outstanding {symbol} not held \
                     by the protocol in the treasury and not deployed in Protocol-Owned Liquidity: \
                     {floating}"
                )
            }
            Self::BackingPerWrappedToken => format!(
                "Liquid backing per {wrapped} is synthetically calculated as liquid backing \
                 multiplied by the current index and divided by {symbol} floating supply."
            ),
            Self::CurrentIndex => format!(
                "The current index tracks the amount of {staked} accumulated since the beginning of \
                 staking. Basically, how much {staked} one would have if they staked and held 1 \
                 {symbol} from launch."
            ),
            Self::WrappedTokenPrice | Self::WrappedTokenPriceFromSubgraph => format!(
                "{wrapped} = {staked} * index\n\nThe price of {wrapped} is equal to the price of \
                 {symbol} multiplied by the current index"
            ),
            Self::TokenPrice
            | Self::StakedTokenPrice
            | Self::TotalValueDeposited
            | Self::StakingApy
            | Self::TreasuryBalance => String::new(),
        }
    }

    /// Renders the tile from the states of its primary and secondary inputs.
    ///
    /// Tiles without a secondary input ignore `secondary`.
    #[must_use]
    pub fn render(
        self,
        ctx: &RenderContext<'_>,
        primary: MetricState<f64>,
        secondary: MetricState<f64>,
    ) -> MetricDisplayRecord {
        let config = ctx.config;
        let formatter = ctx.formatter;
        let decimals = config.decimals_for(self);
        let floating = match self {
            Self::BackingPerToken => secondary.ready().copied(),
            _ => None,
        };
        let base = MetricBase::new(self.label(config), self.tooltip(config, formatter, floating));

        match self {
            Self::WrappedCirculatingSupply => base.ready(SUPPLY_PLACEHOLDER),
            Self::CirculatingSupply => settle(
                base,
                ctx.policy.apply(primary.and(secondary)),
                |(circulating, total)| Ok(format_ratio(formatter, circulating, total, decimals)),
            ),
            Self::StakingApy => settle(base, ctx.policy.apply(primary), |rate| {
                let apy = compound_apy(rate, config.compounding_periods)?;
                Ok(format_apy(formatter, apy, decimals))
            }),
            Self::CurrentIndex => settle(base, ctx.policy.apply(primary), |index| {
                Ok(format_with_unit(formatter, index, decimals, &config.token_symbol))
            }),
            Self::MarketCap
            | Self::TokenPrice
            | Self::TokenPriceFromSubgraph
            | Self::StakedTokenPrice
            | Self::BackingPerToken
            | Self::BackingPerWrappedToken
            | Self::WrappedTokenPrice
            | Self::WrappedTokenPriceFromSubgraph
            | Self::TotalValueDeposited
            | Self::TreasuryBalance => settle(base, ctx.policy.apply(primary), |value| {
                Ok(formatter.currency(value, decimals))
            }),
        }
    }
}

/// Turns a state into a record, deriving the metric only from a ready value.
fn settle<T>(
    base: MetricBase,
    state: MetricState<T>,
    derive: impl FnOnce(T) -> Result<String, MetricError>,
) -> MetricDisplayRecord {
    match state {
        MetricState::Pending => base.loading(),
        MetricState::Failed(reason) => base.failed(reason),
        MetricState::Ready(value) => match derive(value) {
            Ok(metric) => base.ready(metric),
            Err(err) => {
                tracing::warn!(label = %base.label, error = %err, "metric derivation failed");
                base.failed(err.to_string())
            }
        },
    }
}

impl fmt::Display for MetricTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricTile {
    type Err = DashboardError;

    /// Accepts the snake_case id or its kebab-case spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|tile| tile.as_str() == normalized)
            .ok_or_else(|| DashboardError::TileNotFound(s.to_string()))
    }
}
