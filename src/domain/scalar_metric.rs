//! Single-value metrics a source can be asked for.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar metric resolved by a [`crate::subgraph::MetricsSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarMetric {
    /// Token price times circulating supply.
    MarketCap,
    /// Token price from the on-chain oracle.
    OracleTokenPrice,
    /// Wrapped token price from the on-chain oracle.
    OracleWrappedTokenPrice,
    /// Token price as indexed by the subgraph.
    TokenPrice,
    /// Wrapped token price as indexed by the subgraph.
    WrappedTokenPrice,
    /// Total token supply.
    TotalSupply,
    /// Supply not owned by the treasury.
    CirculatingSupply,
    /// Supply outside the treasury and protocol-owned liquidity.
    FloatingSupply,
    /// Liquid backing divided by floating supply.
    LiquidBackingPerFloating,
    /// Liquid backing per wrapped token.
    LiquidBackingPerWrapped,
    /// Current staking index.
    CurrentIndex,
    /// Total value deposited in the protocol.
    TotalValueLocked,
    /// Per-period staking rebase rate, as a fraction.
    StakingRebaseRate,
    /// Market value of all treasury assets.
    TreasuryMarketValue,
}

impl ScalarMetric {
    /// Returns `true` for prices read from an on-chain oracle rather than the
    /// subgraph.
    #[must_use]
    pub const fn is_oracle(self) -> bool {
        matches!(self, Self::OracleTokenPrice | Self::OracleWrappedTokenPrice)
    }

    /// Stable identifier used in logs and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MarketCap => "market_cap",
            Self::OracleTokenPrice => "oracle_token_price",
            Self::OracleWrappedTokenPrice => "oracle_wrapped_token_price",
            Self::TokenPrice => "token_price",
            Self::WrappedTokenPrice => "wrapped_token_price",
            Self::TotalSupply => "total_supply",
            Self::CirculatingSupply => "circulating_supply",
            Self::FloatingSupply => "floating_supply",
            Self::LiquidBackingPerFloating => "liquid_backing_per_floating",
            Self::LiquidBackingPerWrapped => "liquid_backing_per_wrapped",
            Self::CurrentIndex => "current_index",
            Self::TotalValueLocked => "total_value_locked",
            Self::StakingRebaseRate => "staking_rebase_rate",
            Self::TreasuryMarketValue => "treasury_market_value",
        }
    }
}

impl fmt::Display for ScalarMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
