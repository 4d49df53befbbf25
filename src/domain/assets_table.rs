//! Treasury holdings table built from the most recent token summary.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::chart::{MARKET_VALUE_CATEGORIES, MARKET_VALUE_KEYS};
use super::format::{ValueFormatter, parse_currency};
use super::protocol_metric::{ProtocolMetric, latest};
use super::token_summary::{get_keys_token_summary, reduce_keys_token_summary};
use crate::error::DashboardError;

/// Table title.
pub const ASSETS_HEADER_TEXT: &str = "Holdings";

/// Table info tooltip.
pub const ASSETS_INFO_TOOLTIP: &str =
    "This table lists the details of the treasury assets that make up the market value";

/// Decimal places of the value column.
pub const VALUE_DECIMALS: usize = 0;

/// Sortable table columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Token symbol.
    Token,
    /// Asset category.
    Category,
    /// USD value.
    #[default]
    Value,
}

/// Sort direction. Only ascending and descending exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

/// One holding. Rows are identified by their token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AssetRow {
    /// Token symbol, unique within a table.
    pub token: String,
    /// Asset category.
    pub category: String,
    /// Raw decimal value from the source.
    pub value: String,
    /// Currency-formatted value.
    pub display_value: String,
}

/// Holdings for the most recent period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetsTable {
    /// Period the rows belong to.
    pub timestamp: i64,
    /// Rows in display order.
    pub rows: Vec<AssetRow>,
}

impl AssetsTable {
    /// Builds the table from newest-first `metrics`, sorted by value
    /// descending.
    ///
    /// Returns `Ok(None)` when there is no period to show; callers render
    /// that as a loading view.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::SeriesMismatch`] if the category labels do
    /// not line up with the component keys.
    pub fn build(
        metrics: Option<&[ProtocolMetric]>,
        formatter: &dyn ValueFormatter,
    ) -> Result<Option<Self>, DashboardError> {
        let Some(metrics) = metrics else {
            return Ok(None);
        };
        let summaries =
            get_keys_token_summary(Some(metrics), &MARKET_VALUE_KEYS, &MARKET_VALUE_CATEGORIES)?;
        let reduced = reduce_keys_token_summary(&summaries, &MARKET_VALUE_KEYS);
        let Some(current) = latest(&reduced) else {
            return Ok(None);
        };

        let rows = current
            .tokens
            .iter()
            .map(|record| AssetRow {
                token: record.token.clone(),
                category: record.category.clone(),
                value: record.value.clone(),
                display_value: record
                    .value
                    .trim()
                    .parse::<f64>()
                    .map_or_else(|_| record.value.clone(), |v| formatter.currency(v, VALUE_DECIMALS)),
            })
            .collect();

        let mut table = Self {
            timestamp: current.timestamp,
            rows,
        };
        table.sort(SortField::default(), SortDirection::default());
        Ok(Some(table))
    }

    /// Re-sorts the rows. The sort is stable.
    pub fn sort(&mut self, field: SortField, direction: SortDirection) {
        self.rows.sort_by(|a, b| {
            let ordering = match field {
                SortField::Token => a.token.cmp(&b.token),
                SortField::Category => a.category.cmp(&b.category),
                SortField::Value => currency_sort_comparator(&a.display_value, &b.display_value),
            };
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
}

/// Orders currency strings numerically after stripping `$` and `,`.
///
/// Operands that do not parse compare equal to everything.
#[must_use]
pub fn currency_sort_comparator(a: &str, b: &str) -> Ordering {
    match (parse_currency(a), parse_currency(b)) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}
