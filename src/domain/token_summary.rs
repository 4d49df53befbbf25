//! Token-level reshaping of component buckets for charts and the asset table.
//!
//! Component keys and category labels pair up positionally: the Nth key is
//! labelled with the Nth category.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use utoipa::ToSchema;

use super::chart::ChartSeriesPoint;
use super::protocol_metric::{ComponentKey, ProtocolMetric};
use crate::error::DashboardError;

/// One asset's contribution to a treasury bucket at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TokenRecord {
    /// Token symbol or pool name.
    pub token: String,
    /// Category label of the bucket the token came from.
    pub category: String,
    /// Value in USD as a decimal string.
    pub value: String,
}

/// Token records for one period, grouped by component key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysTokenSummary {
    /// Period start as Unix seconds.
    pub timestamp: i64,
    /// Token records per component key, in source order.
    pub components: BTreeMap<ComponentKey, Vec<TokenRecord>>,
}

/// Token records for one period, flattened across component keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedTokenSummary {
    /// Period start as Unix seconds.
    pub timestamp: i64,
    /// One record per token.
    pub tokens: Vec<TokenRecord>,
}

/// Builds one summary per period for the given component keys.
///
/// Records keep the order the source lists them in. A token listed twice
/// within the same bucket has its values summed into its first position.
/// Missing `metrics` yields an empty vector.
///
/// # Errors
///
/// Returns [`DashboardError::SeriesMismatch`] if `keys` and `categories`
/// differ in length.
pub fn get_keys_token_summary(
    metrics: Option<&[ProtocolMetric]>,
    keys: &[ComponentKey],
    categories: &[&str],
) -> Result<Vec<KeysTokenSummary>, DashboardError> {
    if keys.len() != categories.len() {
        return Err(DashboardError::SeriesMismatch {
            keys: keys.len(),
            categories: categories.len(),
        });
    }

    let summaries = metrics
        .unwrap_or_default()
        .iter()
        .map(|metric| {
            let components = keys
                .iter()
                .zip(categories)
                .map(|(key, category)| {
                    let records = metric.components(*key).map(|c| c.records.as_slice());
                    let tokens = merge_records(
                        records.unwrap_or_default().iter().map(|record| TokenRecord {
                            token: record.token.clone(),
                            category: (*category).to_string(),
                            value: record.value.clone(),
                        }),
                    );
                    (*key, tokens)
                })
                .collect();
            KeysTokenSummary {
                timestamp: metric.timestamp,
                components,
            }
        })
        .collect();

    Ok(summaries)
}

/// Flattens each summary across `keys`, in key order.
///
/// A token present under several keys is summed and keeps the category of
/// the first key it appeared under.
#[must_use]
pub fn reduce_keys_token_summary(
    summaries: &[KeysTokenSummary],
    keys: &[ComponentKey],
) -> Vec<ReducedTokenSummary> {
    summaries
        .iter()
        .map(|summary| ReducedTokenSummary {
            timestamp: summary.timestamp,
            tokens: merge_records(
                keys.iter()
                    .filter_map(|key| summary.components.get(key))
                    .flatten()
                    .cloned(),
            ),
        })
        .collect()
}

/// Distinct tokens seen under `key`, in first-seen order across periods.
#[must_use]
pub fn tokens_from_key(summaries: &[KeysTokenSummary], key: ComponentKey) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for summary in summaries {
        let Some(bucket) = summary.components.get(&key) else {
            continue;
        };
        for record in bucket {
            if !tokens.contains(&record.token) {
                tokens.push(record.token.clone());
            }
        }
    }
    tokens
}

/// Series keys for per-token charts: `"<component field>.<token>"`.
#[must_use]
pub fn data_keys_from_tokens(tokens: &[String], key: ComponentKey) -> Vec<String> {
    tokens
        .iter()
        .map(|token| data_key(key, token))
        .collect()
}

/// One chart point per period with a value for every token under `key`.
#[must_use]
pub fn token_series(summaries: &[KeysTokenSummary], key: ComponentKey) -> Vec<ChartSeriesPoint> {
    summaries
        .iter()
        .map(|summary| {
            let values = summary
                .components
                .get(&key)
                .into_iter()
                .flatten()
                .filter_map(|record| {
                    parse_value(&record.value).map(|value| (data_key(key, &record.token), value))
                })
                .collect();
            ChartSeriesPoint::new(summary.timestamp, values)
        })
        .collect()
}

/// Collapses records sharing a token into the first one, summing values.
fn merge_records(records: impl IntoIterator<Item = TokenRecord>) -> Vec<TokenRecord> {
    let mut merged: Vec<TokenRecord> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for record in records {
        match positions.get(&record.token).and_then(|i| merged.get_mut(*i)) {
            Some(existing) => existing.value = sum_values(&existing.value, &record.value),
            None => {
                positions.insert(record.token.clone(), merged.len());
                merged.push(record);
            }
        }
    }
    merged
}

fn data_key(key: ComponentKey, token: &str) -> String {
    format!("{}.{token}", key.field())
}

fn parse_value(value: &str) -> Option<f64> {
    let parsed = value.trim().parse::<f64>().ok();
    if parsed.is_none() {
        tracing::warn!(value, "token record value is not a decimal");
    }
    parsed
}

fn sum_values(a: &str, b: &str) -> String {
    let total = parse_value(a).unwrap_or(0.0) + parse_value(b).unwrap_or(0.0);
    total.to_string()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::protocol_metric::{SourceTokenRecord, TokenRecords, latest};

    fn records(entries: &[(&str, &str)]) -> Option<TokenRecords> {
        Some(TokenRecords {
            value: None,
            records: entries
                .iter()
                .map(|(token, value)| SourceTokenRecord {
                    token: (*token).to_string(),
                    value: (*value).to_string(),
                })
                .collect(),
        })
    }

    /// Two periods, newest first.
    fn metrics() -> Vec<ProtocolMetric> {
        vec![
            ProtocolMetric {
                timestamp: 200,
                treasury_stable_value_components: records(&[("DAI", "500"), ("FRAX", "250")]),
                treasury_volatile_value_components: records(&[("wETH", "300")]),
                treasury_lp_value_components: records(&[("OHM-DAI", "100"), ("OHM-DAI", "20")]),
                ..ProtocolMetric::default()
            },
            ProtocolMetric {
                timestamp: 100,
                treasury_stable_value_components: records(&[("DAI", "400")]),
                treasury_lp_value_components: records(&[("OHM-ETH", "50")]),
                ..ProtocolMetric::default()
            },
        ]
    }

    const KEYS: [ComponentKey; 3] = [
        ComponentKey::StableValue,
        ComponentKey::VolatileValue,
        ComponentKey::LpValue,
    ];
    const CATEGORIES: [&str; 3] = ["Stablecoins", "Volatile", "Protocol-Owned Liquidity"];

    #[test]
    fn summary_per_period_with_positional_categories() {
        let metrics = metrics();
        let Ok(summary) = get_keys_token_summary(Some(&metrics), &KEYS, &CATEGORIES) else {
            panic!("lengths match");
        };
        assert_eq!(summary.len(), 2);
        let Some(first) = summary.first() else {
            panic!("two periods");
        };
        assert_eq!(first.timestamp, 200);
        let lp = first.components.get(&ComponentKey::LpValue);
        let Some(record) = lp.and_then(|b| b.iter().find(|r| r.token == "OHM-DAI")) else {
            panic!("OHM-DAI under LP");
        };
        assert_eq!(record.category, "Protocol-Owned Liquidity");
        assert_eq!(record.value, "120");
    }

    #[test]
    fn mismatched_lengths_error() {
        let result = get_keys_token_summary(None, &KEYS, &CATEGORIES[..2]);
        assert!(matches!(
            result,
            Err(DashboardError::SeriesMismatch {
                keys: 3,
                categories: 2
            })
        ));
    }

    #[test]
    fn missing_metrics_yield_empty_summary() {
        let Ok(summary) = get_keys_token_summary(None, &KEYS, &CATEGORIES) else {
            panic!("lengths match");
        };
        assert!(summary.is_empty());
    }

    #[test]
    fn reduced_summary_renders_most_recent_period() {
        let metrics = metrics();
        let Ok(summary) = get_keys_token_summary(Some(&metrics), &KEYS, &CATEGORIES) else {
            panic!("lengths match");
        };
        let reduced = reduce_keys_token_summary(&summary, &KEYS);
        let Some(current) = latest(&reduced) else {
            panic!("two periods");
        };
        assert_eq!(current.timestamp, 200);
        let tokens: Vec<&str> = current.tokens.iter().map(|t| t.token.as_str()).collect();
        assert_eq!(tokens, vec!["DAI", "FRAX", "wETH", "OHM-DAI"]);
    }

    #[test]
    fn token_under_two_keys_is_merged() {
        let metrics = vec![ProtocolMetric {
            timestamp: 1,
            treasury_stable_value_components: records(&[("DAI", "10")]),
            treasury_volatile_value_components: records(&[("DAI", "5")]),
            ..ProtocolMetric::default()
        }];
        let Ok(summary) = get_keys_token_summary(Some(&metrics), &KEYS, &CATEGORIES) else {
            panic!("lengths match");
        };
        let reduced = reduce_keys_token_summary(&summary, &KEYS);
        let Some(current) = reduced.first() else {
            panic!("one period");
        };
        assert_eq!(
            current.tokens,
            vec![TokenRecord {
                token: "DAI".to_string(),
                category: "Stablecoins".to_string(),
                value: "15".to_string(),
            }]
        );
    }

    #[test]
    fn tokens_and_data_keys_in_first_seen_order() {
        let metrics = metrics();
        let Ok(summary) = get_keys_token_summary(
            Some(&metrics),
            &[ComponentKey::LpValue],
            &["Protocol-Owned Liquidity"],
        ) else {
            panic!("lengths match");
        };
        let tokens = tokens_from_key(&summary, ComponentKey::LpValue);
        assert_eq!(tokens, vec!["OHM-DAI", "OHM-ETH"]);
        let keys = data_keys_from_tokens(&tokens, ComponentKey::LpValue);
        assert_eq!(
            keys,
            vec![
                "treasuryLPValueComponents.OHM-DAI",
                "treasuryLPValueComponents.OHM-ETH"
            ]
        );
    }

    #[test]
    fn tokens_keep_source_order_within_a_period() {
        let metrics = vec![ProtocolMetric {
            timestamp: 1,
            treasury_lp_value_components: records(&[
                ("OHM-FRAX", "3"),
                ("OHM-DAI", "2"),
                ("OHM-FRAX", "4"),
            ]),
            ..ProtocolMetric::default()
        }];
        let Ok(summary) = get_keys_token_summary(
            Some(&metrics),
            &[ComponentKey::LpValue],
            &["Protocol-Owned Liquidity"],
        ) else {
            panic!("lengths match");
        };
        assert_eq!(
            tokens_from_key(&summary, ComponentKey::LpValue),
            vec!["OHM-FRAX", "OHM-DAI"]
        );
        let Some(bucket) = summary.first().and_then(|s| s.components.get(&ComponentKey::LpValue))
        else {
            panic!("LP bucket present");
        };
        assert_eq!(bucket.first().map(|r| r.value.as_str()), Some("7"));
    }

    #[test]
    fn token_series_keeps_source_order() {
        let metrics = metrics();
        let Ok(summary) = get_keys_token_summary(
            Some(&metrics),
            &[ComponentKey::LpValue],
            &["Protocol-Owned Liquidity"],
        ) else {
            panic!("lengths match");
        };
        let series = token_series(&summary, ComponentKey::LpValue);
        let timestamps: Vec<i64> = series.iter().map(|p| p.timestamp).collect();
        assert_eq!(timestamps, vec![200, 100]);
        let Some(first) = series.first() else {
            panic!("two points");
        };
        assert_eq!(
            first.values.get("treasuryLPValueComponents.OHM-DAI"),
            Some(&120.0)
        );
    }
}
