//! Display records handed to the metric tile widget.

use serde::Serialize;
use utoipa::ToSchema;

/// Static part of a tile: what it is called and how it is explained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricBase {
    /// Tile label.
    pub label: String,
    /// Tooltip text; empty when the tile has none.
    pub tooltip: String,
}

impl MetricBase {
    /// Creates a base with the given label and tooltip.
    #[must_use]
    pub fn new(label: impl Into<String>, tooltip: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            tooltip: tooltip.into(),
        }
    }

    /// Record for a value that is not available yet.
    #[must_use]
    pub fn loading(self) -> MetricDisplayRecord {
        MetricDisplayRecord {
            label: self.label,
            tooltip: self.tooltip,
            metric: None,
            is_loading: true,
            error: None,
        }
    }

    /// Record carrying a formatted metric.
    #[must_use]
    pub fn ready(self, metric: impl Into<String>) -> MetricDisplayRecord {
        MetricDisplayRecord {
            label: self.label,
            tooltip: self.tooltip,
            metric: Some(metric.into()),
            is_loading: false,
            error: None,
        }
    }

    /// Record for a value that could not be fetched or derived.
    #[must_use]
    pub fn failed(self, reason: impl Into<String>) -> MetricDisplayRecord {
        MetricDisplayRecord {
            label: self.label,
            tooltip: self.tooltip,
            metric: None,
            is_loading: false,
            error: Some(reason.into()),
        }
    }
}

/// What a tile shows at one point in time.
///
/// Exactly one of `metric`, `is_loading` and `error` is set. Records are only
/// built through [`MetricBase`], which upholds that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MetricDisplayRecord {
    /// Tile label.
    pub label: String,
    /// Tooltip text; empty when the tile has none.
    pub tooltip: String,
    /// Formatted metric, absent while loading or on error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    /// Whether the tile should render a loading skeleton.
    pub is_loading: bool,
    /// Error text shown instead of a metric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MetricDisplayRecord {
    /// Returns `true` if exactly one display state is set.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let states = [self.metric.is_some(), self.is_loading, self.error.is_some()];
        states.iter().filter(|set| **set).count() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> MetricBase {
        MetricBase::new("Current Index", "")
    }

    #[test]
    fn loading_has_no_metric() {
        let record = base().loading();
        assert!(record.is_loading);
        assert!(record.metric.is_none());
        assert!(record.is_consistent());
    }

    #[test]
    fn ready_is_not_loading() {
        let record = base().ready("12.34 OHM");
        assert!(!record.is_loading);
        assert_eq!(record.metric.as_deref(), Some("12.34 OHM"));
        assert!(record.is_consistent());
    }

    #[test]
    fn failed_sets_only_error() {
        let record = base().failed("rate below -100%");
        assert!(!record.is_loading);
        assert!(record.metric.is_none());
        assert_eq!(record.error.as_deref(), Some("rate below -100%"));
        assert!(record.is_consistent());
    }

    #[test]
    fn serializes_without_absent_fields() {
        let json = serde_json::to_value(base().loading()).unwrap_or_default();
        assert_eq!(json["is_loading"], true);
        assert!(json.get("metric").is_none());
        assert!(json.get("error").is_none());
    }
}
