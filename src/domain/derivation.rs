//! Formulas turning raw metric values into display strings.

use super::format::ValueFormatter;

/// Metric shown by the wrapped-supply tile, which has no data source.
pub const SUPPLY_PLACEHOLDER: &str = "- / -";

/// Tooltip filler while a value embedded in a tooltip is not loaded.
pub const TOOLTIP_LOADING: &str = "Loading...";

/// Errors raised while deriving a metric from present inputs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricError {
    /// A rebase rate at or below -100% has no meaningful compound growth.
    #[error("rebase rate {0} is at or below -100%")]
    RateAtOrBelowFloor(f64),

    /// An input or the result was NaN or infinite.
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    /// More compounding periods than an `i32` exponent can hold.
    #[error("{0} compounding periods is out of range")]
    PeriodsOutOfRange(u32),
}

/// Annualized percentage yield from a per-period rebase rate.
///
/// `apy = ((1 + rate)^periods - 1) * 100`.
///
/// # Errors
///
/// Returns [`MetricError::RateAtOrBelowFloor`] when `rate <= -1` and
/// [`MetricError::NonFinite`] when `rate` or the result is not finite, and
/// [`MetricError::PeriodsOutOfRange`] when `periods` exceeds `i32::MAX`.
pub fn compound_apy(rate: f64, periods: u32) -> Result<f64, MetricError> {
    if !rate.is_finite() {
        return Err(MetricError::NonFinite("rebase rate"));
    }
    if rate <= -1.0 {
        return Err(MetricError::RateAtOrBelowFloor(rate));
    }
    let exponent =
        i32::try_from(periods).map_err(|_| MetricError::PeriodsOutOfRange(periods))?;
    let apy = ((1.0 + rate).powi(exponent) - 1.0) * 100.0;
    if apy.is_finite() {
        Ok(apy)
    } else {
        Err(MetricError::NonFinite("compounded yield"))
    }
}

/// `"<apy>%"` with `decimals` places.
#[must_use]
pub fn format_apy(formatter: &dyn ValueFormatter, apy: f64, decimals: usize) -> String {
    format!("{}%", formatter.number(apy, decimals))
}

/// `"A / B"`, each side formatted on its own.
#[must_use]
pub fn format_ratio(
    formatter: &dyn ValueFormatter,
    numerator: f64,
    denominator: f64,
    decimals: usize,
) -> String {
    format!(
        "{} / {}",
        formatter.number(numerator, decimals),
        formatter.number(denominator, decimals)
    )
}

/// A number followed by a unit, e.g. `"45.12 OHM"`.
#[must_use]
pub fn format_with_unit(
    formatter: &dyn ValueFormatter,
    value: f64,
    decimals: usize,
    unit: &str,
) -> String {
    format!("{} {unit}", formatter.number(value, decimals))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::format::UsdFormatter;

    /// Renders numbers verbatim so tests see composition only.
    #[derive(Debug)]
    struct RawFormatter;

    impl ValueFormatter for RawFormatter {
        fn currency(&self, value: f64, _decimals: usize) -> String {
            format!("${value}")
        }

        fn number(&self, value: f64, _decimals: usize) -> String {
            format!("<{value}>")
        }
    }

    #[test]
    fn apy_matches_reference() {
        let Ok(apy) = compound_apy(0.001, 1095) else {
            panic!("valid rate");
        };
        let reference = (1.001_f64.powf(1095.0) - 1.0) * 100.0;
        assert!((apy - reference).abs() < 1e-9);
        assert_eq!(format_apy(&UsdFormatter, apy, 1), "198.8%");
    }

    #[test]
    fn zero_rate_is_zero_apy() {
        assert_eq!(compound_apy(0.0, 1095), Ok(0.0));
    }

    #[test]
    fn rate_at_floor_is_error() {
        assert_eq!(
            compound_apy(-1.0, 1095),
            Err(MetricError::RateAtOrBelowFloor(-1.0))
        );
        assert!(compound_apy(-2.5, 1095).is_err());
    }

    #[test]
    fn slightly_negative_rate_is_fine() {
        let Ok(apy) = compound_apy(-0.0001, 1095) else {
            panic!("valid rate");
        };
        assert!(apy < 0.0 && apy > -100.0);
    }

    #[test]
    fn overflow_is_error() {
        assert_eq!(
            compound_apy(10.0, 1095),
            Err(MetricError::NonFinite("compounded yield"))
        );
        assert_eq!(
            compound_apy(f64::NAN, 1095),
            Err(MetricError::NonFinite("rebase rate"))
        );
    }

    #[test]
    fn periods_beyond_i32_are_error() {
        let periods = 1_u32 << 31;
        assert_eq!(
            compound_apy(0.0, periods),
            Err(MetricError::PeriodsOutOfRange(periods))
        );
    }

    #[test]
    fn ratio_composes_two_formatted_sides() {
        assert_eq!(format_ratio(&RawFormatter, 1.0, 2.0, 0), "<1> / <2>");
        assert_eq!(
            format_ratio(&UsdFormatter, 1_000_000.0, 2_000_000.0, 0),
            "1,000,000 / 2,000,000"
        );
    }

    #[test]
    fn unit_suffix() {
        assert_eq!(format_with_unit(&UsdFormatter, 45.123, 2, "OHM"), "45.12 OHM");
    }
}
