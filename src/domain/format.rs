//! Number and currency formatting for display strings.
//!
//! [`ValueFormatter`] is the seam tiles, charts and the asset table format
//! through. [`UsdFormatter`] renders en-US style: thousands separated by
//! commas, a fixed number of decimals and a leading `$` for currency.

/// Formats raw values into display strings.
pub trait ValueFormatter: Send + Sync + std::fmt::Debug {
    /// Formats `value` as a currency amount with exactly `decimals` places.
    fn currency(&self, value: f64, decimals: usize) -> String;

    /// Formats `value` as a plain number with exactly `decimals` places.
    fn number(&self, value: f64, decimals: usize) -> String;
}

/// en-US dollar formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsdFormatter;

impl ValueFormatter for UsdFormatter {
    fn currency(&self, value: f64, decimals: usize) -> String {
        if !value.is_finite() {
            return format!("${}", non_finite(value));
        }
        let grouped = group_thousands(&format!("{:.*}", decimals, value.abs()));
        if value.is_sign_negative() && grouped.chars().any(|c| c.is_ascii_digit() && c != '0') {
            format!("-${grouped}")
        } else {
            format!("${grouped}")
        }
    }

    fn number(&self, value: f64, decimals: usize) -> String {
        if !value.is_finite() {
            return non_finite(value).to_string();
        }
        let grouped = group_thousands(&format!("{:.*}", decimals, value.abs()));
        if value.is_sign_negative() && grouped.chars().any(|c| c.is_ascii_digit() && c != '0') {
            format!("-{grouped}")
        } else {
            grouped
        }
    }
}

fn non_finite(value: f64) -> &'static str {
    if value.is_nan() {
        "NaN"
    } else if value.is_sign_negative() {
        "-∞"
    } else {
        "∞"
    }
}

/// Inserts `,` every three digits of the integer part of an unsigned
/// decimal string.
fn group_thousands(formatted: &str) -> String {
    let (integer, fraction) = match formatted.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (formatted, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match fraction {
        Some(fraction) => format!("{grouped}.{fraction}"),
        None => grouped,
    }
}

/// Removes the currency symbol and thousands separators.
#[must_use]
pub fn strip_currency(value: &str) -> String {
    value.chars().filter(|c| *c != '$' && *c != ',').collect()
}

/// Parses a currency-formatted string back into a number.
///
/// Returns `None` for anything that is not numeric once `$` and `,` are
/// removed.
#[must_use]
pub fn parse_currency(value: &str) -> Option<f64> {
    strip_currency(value).trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_and_pads() {
        let f = UsdFormatter;
        assert_eq!(f.currency(1234.5, 2), "$1,234.50");
        assert_eq!(f.currency(9.0, 2), "$9.00");
        assert_eq!(f.currency(1_234_567.0, 0), "$1,234,567");
        assert_eq!(f.currency(999.0, 0), "$999");
        assert_eq!(f.currency(0.0, 2), "$0.00");
    }

    #[test]
    fn currency_negative_puts_sign_first() {
        let f = UsdFormatter;
        assert_eq!(f.currency(-1500.25, 2), "-$1,500.25");
        assert_eq!(f.currency(-0.001, 2), "$0.00");
    }

    #[test]
    fn number_groups_without_symbol() {
        let f = UsdFormatter;
        assert_eq!(f.number(1_000_000.0, 0), "1,000,000");
        assert_eq!(f.number(198.754, 1), "198.8");
        assert_eq!(f.number(12.0, 2), "12.00");
        assert_eq!(f.number(-12_345.678, 1), "-12,345.7");
    }

    #[test]
    fn non_finite_values_do_not_panic() {
        let f = UsdFormatter;
        assert_eq!(f.number(f64::NAN, 1), "NaN");
        assert_eq!(f.currency(f64::INFINITY, 0), "$∞");
    }

    #[test]
    fn group_thousands_edges() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("100"), "100");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("123456.789"), "123,456.789");
    }

    #[test]
    fn parse_currency_strips_formatting() {
        assert_eq!(parse_currency("$8,500.00"), Some(8500.0));
        assert_eq!(parse_currency("$9"), Some(9.0));
        assert_eq!(parse_currency("-$1,000"), Some(-1000.0));
        assert_eq!(parse_currency("n/a"), None);
    }
}
