//! GraphQL documents sent to the protocol metrics subgraph.
//!
//! Every document takes a single `$records` variable and returns
//! `protocolMetrics` ordered newest first.

use serde::{Deserialize, Serialize};

/// Key metrics: prices, supplies, backing and the rebase.
pub const KEY_METRICS_DOCUMENT: &str = r"query KeyMetrics($records: Int = 100) {
  protocolMetrics(first: $records, orderBy: timestamp, orderDirection: desc) {
    id
    timestamp
    currentIndex
    gOhmPrice
    marketCap
    nextEpochRebase
    ohmCirculatingSupply
    ohmFloatingSupply
    ohmPrice
    totalSupply
    totalValueLocked
    treasuryLiquidBackingPerGOhm
    treasuryLiquidBackingPerOhmFloating
    treasuryMarketValue
  }
}
";

/// Treasury market value split by category.
pub const MARKET_VALUE_METRICS_DOCUMENT: &str = r"query MarketValueMetrics($records: Int = 100) {
  protocolMetrics(first: $records, orderBy: timestamp, orderDirection: desc) {
    id
    timestamp
    treasuryLPValue
    treasuryMarketValue
    treasuryStableValue
    treasuryVolatileValue
  }
}
";

/// Protocol-owned liquidity per pool.
pub const PROTOCOL_OWNED_LIQUIDITY_COMPONENTS_DOCUMENT: &str = r"query ProtocolOwnedLiquidityComponents($records: Int = 100) {
  protocolMetrics(first: $records, orderBy: timestamp, orderDirection: desc) {
    id
    timestamp
    treasuryLPValueComponents {
      records {
        token
        value
      }
      value
    }
  }
}
";

/// Per-token holdings of every market value category.
pub const MARKET_VALUE_METRICS_COMPONENTS_DOCUMENT: &str = r"query MarketValueMetricsComponents($records: Int = 1) {
  protocolMetrics(first: $records, orderBy: timestamp, orderDirection: desc) {
    id
    timestamp
    treasuryStableValueComponents {
      records {
        token
        value
      }
      value
    }
    treasuryVolatileValueComponents {
      records {
        token
        value
      }
      value
    }
    treasuryLPValueComponents {
      records {
        token
        value
      }
      value
    }
  }
}
";

/// Named subgraph queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsQuery {
    /// [`KEY_METRICS_DOCUMENT`].
    KeyMetrics,
    /// [`MARKET_VALUE_METRICS_DOCUMENT`].
    MarketValueMetrics,
    /// [`PROTOCOL_OWNED_LIQUIDITY_COMPONENTS_DOCUMENT`].
    ProtocolOwnedLiquidityComponents,
    /// [`MARKET_VALUE_METRICS_COMPONENTS_DOCUMENT`].
    MarketValueMetricsComponents,
}

impl MetricsQuery {
    /// GraphQL document text.
    #[must_use]
    pub const fn document(self) -> &'static str {
        match self {
            Self::KeyMetrics => KEY_METRICS_DOCUMENT,
            Self::MarketValueMetrics => MARKET_VALUE_METRICS_DOCUMENT,
            Self::ProtocolOwnedLiquidityComponents => PROTOCOL_OWNED_LIQUIDITY_COMPONENTS_DOCUMENT,
            Self::MarketValueMetricsComponents => MARKET_VALUE_METRICS_COMPONENTS_DOCUMENT,
        }
    }

    /// Operation name, as used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::KeyMetrics => "KeyMetrics",
            Self::MarketValueMetrics => "MarketValueMetrics",
            Self::ProtocolOwnedLiquidityComponents => "ProtocolOwnedLiquidityComponents",
            Self::MarketValueMetricsComponents => "MarketValueMetricsComponents",
        }
    }
}

/// Link opening `document` in the subgraph's query explorer.
///
/// The endpoint is used as given; nothing is parsed or validated.
#[must_use]
pub fn query_explorer_url(endpoint: &str, document: &str) -> String {
    format!("{endpoint}/graphql?query={}", urlencoding::encode(document))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explorer_url_percent_encodes_document() {
        let url = query_explorer_url("https://api.example/subgraphs/id/abc", "query { a(b: 1) }");
        assert_eq!(
            url,
            "https://api.example/subgraphs/id/abc/graphql?query=query%20%7B%20a%28b%3A%201%29%20%7D"
        );
    }

    #[test]
    fn every_document_declares_records_and_orders_newest_first() {
        for query in [
            MetricsQuery::KeyMetrics,
            MetricsQuery::MarketValueMetrics,
            MetricsQuery::ProtocolOwnedLiquidityComponents,
            MetricsQuery::MarketValueMetricsComponents,
        ] {
            let doc = query.document();
            assert!(doc.starts_with(&format!("query {}(", query.name())), "{doc}");
            assert!(doc.contains("$records: Int"));
            assert!(doc.contains("orderDirection: desc"));
        }
    }
}
