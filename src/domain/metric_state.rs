//! Three-state fetch outcome and the policy that maps it onto display.
//!
//! A fetched value is either not there yet, there, or unobtainable. The
//! display layer historically only knew "present" and "absent", so
//! [`LoadingPolicy`] decides whether [`MetricState::Failed`] is shown as a
//! failure or folded into the loading state.

use serde::{Deserialize, Serialize};

use crate::subgraph::SourceError;

/// Outcome of fetching a single value from a metrics source.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricState<T> {
    /// The value has not been delivered (yet).
    Pending,
    /// The value is available.
    Ready(T),
    /// Fetching failed with the given reason.
    Failed(String),
}

impl<T> MetricState<T> {
    /// Returns `true` if the value is available.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Returns the ready value, if any.
    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Pending | Self::Failed(_) => None,
        }
    }

    /// Converts into an `Option`, discarding the pending/failed distinction.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Pending | Self::Failed(_) => None,
        }
    }

    /// Maps the ready value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MetricState<U> {
        match self {
            Self::Pending => MetricState::Pending,
            Self::Ready(value) => MetricState::Ready(f(value)),
            Self::Failed(reason) => MetricState::Failed(reason),
        }
    }

    /// Combines two states. Ready only when both are ready; a failure on
    /// either side wins over pending.
    pub fn and<U>(self, other: MetricState<U>) -> MetricState<(T, U)> {
        match (self, other) {
            (Self::Ready(a), MetricState::Ready(b)) => MetricState::Ready((a, b)),
            (Self::Failed(reason), _) | (_, MetricState::Failed(reason)) => {
                MetricState::Failed(reason)
            }
            _ => MetricState::Pending,
        }
    }
}

impl<T> From<Option<T>> for MetricState<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Pending, Self::Ready)
    }
}

impl<T> From<Result<Option<T>, SourceError>> for MetricState<T> {
    fn from(result: Result<Option<T>, SourceError>) -> Self {
        match result {
            Ok(value) => value.into(),
            Err(err) => Self::Failed(err.to_string()),
        }
    }
}

/// How fetch failures are presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingPolicy {
    /// A failed fetch displays exactly like a pending one.
    #[default]
    CollapseFailures,
    /// A failed fetch displays as an error.
    SurfaceFailures,
}

impl LoadingPolicy {
    /// Applies the policy to a state, turning failures into pending when
    /// they are collapsed.
    pub fn apply<T>(self, state: MetricState<T>) -> MetricState<T> {
        match (self, state) {
            (Self::CollapseFailures, MetricState::Failed(reason)) => {
                tracing::debug!(%reason, "fetch failure shown as loading");
                MetricState::Pending
            }
            (_, state) => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_a_ready_value() {
        let state: MetricState<f64> = Some(0.0).into();
        assert_eq!(state, MetricState::Ready(0.0));
    }

    #[test]
    fn none_is_pending() {
        let state: MetricState<f64> = None.into();
        assert_eq!(state, MetricState::Pending);
    }

    #[test]
    fn source_error_is_failed() {
        let state: MetricState<f64> = Err(SourceError::Network("timeout".to_string())).into();
        assert!(matches!(state, MetricState::Failed(ref r) if r.contains("timeout")));
    }

    #[test]
    fn and_requires_both_ready() {
        let both = MetricState::Ready(1.0).and(MetricState::Ready(2.0));
        assert_eq!(both, MetricState::Ready((1.0, 2.0)));

        let half = MetricState::Ready(1.0).and(MetricState::<f64>::Pending);
        assert_eq!(half, MetricState::Pending);

        let failed = MetricState::<f64>::Pending.and(MetricState::<f64>::Failed("x".into()));
        assert_eq!(failed, MetricState::Failed("x".to_string()));
    }

    #[test]
    fn collapse_policy_hides_failures() {
        let state = LoadingPolicy::CollapseFailures.apply(MetricState::<f64>::Failed("x".into()));
        assert_eq!(state, MetricState::Pending);

        let state = LoadingPolicy::SurfaceFailures.apply(MetricState::<f64>::Failed("x".into()));
        assert_eq!(state, MetricState::Failed("x".to_string()));
    }

    #[test]
    fn map_keeps_failure_reason() {
        let state = MetricState::<f64>::Failed("bad".into()).map(|v| v * 2.0);
        assert_eq!(state, MetricState::Failed("bad".to_string()));
        assert_eq!(MetricState::Ready(2.0).map(|v| v * 2.0).into_option(), Some(4.0));
    }
}
