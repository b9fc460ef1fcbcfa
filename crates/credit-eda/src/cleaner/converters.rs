//! Locale-aware numeric conversion for data cleaning.

use crate::config::NumberFormat;
use crate::error::{AnalysisError, Result};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

/// Shape of a number once separators are normalized. Rejects text that
/// `f64::from_str` would accept but that never appears in money columns,
/// such as `inf`, `NaN` or exponents.
static PLAIN_DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").expect("Invalid regex: plain decimal")
});

/// Parse a locale-formatted number such as `12.691,51`.
///
/// Thousands separators are removed and the decimal separator becomes `.`.
/// Returns `None` for empty or malformed text.
///
/// # Example
///
/// ```rust,ignore
/// use credit_eda::cleaner::parse_locale_number;
/// use credit_eda::config::NumberFormat;
///
/// assert_eq!(parse_locale_number("12.691,51", &NumberFormat::default()), Some(12691.51));
/// ```
pub fn parse_locale_number(value: &str, format: &NumberFormat) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized: String = trimmed
        .chars()
        .filter(|c| *c != format.thousands_separator)
        .map(|c| if c == format.decimal_separator { '.' } else { c })
        .collect();

    if !PLAIN_DECIMAL.is_match(&normalized) {
        return None;
    }

    normalized.parse::<f64>().ok()
}

/// Convert a string series of locale-formatted numbers to Float64.
///
/// Nulls stay null. Any other value that does not parse fails the whole
/// column, naming the offending value.
pub(crate) fn locale_strings_to_f64(series: &Series, format: &NumberFormat) -> Result<Series> {
    let str_series = series.str()?;
    let mut result_vec: Vec<Option<f64>> = Vec::with_capacity(str_series.len());

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) => match parse_locale_number(val, format) {
                Some(num) => result_vec.push(Some(num)),
                None => {
                    return Err(AnalysisError::NumericParseFailed {
                        column: series.name().to_string(),
                        value: val.to_string(),
                    });
                }
            },
            None => result_vec.push(None),
        }
    }

    Ok(Series::new(series.name().clone(), result_vec))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt_br() -> NumberFormat {
        NumberFormat::default()
    }

    fn en_us() -> NumberFormat {
        NumberFormat {
            thousands_separator: ',',
            decimal_separator: '.',
        }
    }

    // ========================================================================
    // parse_locale_number() tests
    // ========================================================================

    #[test]
    fn test_parse_pt_br_with_thousands() {
        assert_eq!(parse_locale_number("12.691,51", &pt_br()), Some(12691.51));
        assert_eq!(parse_locale_number("1.144,90", &pt_br()), Some(1144.9));
        assert_eq!(parse_locale_number("1.000.000,00", &pt_br()), Some(1_000_000.0));
    }

    #[test]
    fn test_parse_pt_br_without_thousands() {
        assert_eq!(parse_locale_number("816,08", &pt_br()), Some(816.08));
        assert_eq!(parse_locale_number("42", &pt_br()), Some(42.0));
    }

    #[test]
    fn test_parse_trims_and_signs() {
        assert_eq!(parse_locale_number("  -3,5 ", &pt_br()), Some(-3.5));
        assert_eq!(parse_locale_number("+7", &pt_br()), Some(7.0));
    }

    #[test]
    fn test_parse_en_us() {
        assert_eq!(parse_locale_number("12,691.51", &en_us()), Some(12691.51));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_locale_number("", &pt_br()), None);
        assert_eq!(parse_locale_number("   ", &pt_br()), None);
        assert_eq!(parse_locale_number("1,2,3", &pt_br()), None);
        assert_eq!(parse_locale_number("abc", &pt_br()), None);
        assert_eq!(parse_locale_number("inf", &pt_br()), None);
        assert_eq!(parse_locale_number("1e5", &pt_br()), None);
    }

    // ========================================================================
    // locale_strings_to_f64() tests
    // ========================================================================

    #[test]
    fn test_series_conversion() {
        let series = Series::new(
            "limite_credito".into(),
            &[Some("12.691,51"), None, Some("3.418,56")],
        );
        let result = locale_strings_to_f64(&series, &pt_br()).unwrap();

        assert_eq!(result.dtype(), &DataType::Float64);
        assert_eq!(result.name().as_str(), "limite_credito");
        assert_eq!(result.get(0).unwrap().try_extract::<f64>().unwrap(), 12691.51);
        assert!(matches!(result.get(1).unwrap(), AnyValue::Null));
        assert_eq!(result.get(2).unwrap().try_extract::<f64>().unwrap(), 3418.56);
    }

    #[test]
    fn test_series_conversion_fails_on_bad_value() {
        let series = Series::new("limite_credito".into(), &["1.000,00", "n/d"]);
        let result = locale_strings_to_f64(&series, &pt_br());

        match result {
            Err(AnalysisError::NumericParseFailed { column, value }) => {
                assert_eq!(column, "limite_credito");
                assert_eq!(value, "n/d");
            }
            other => panic!("Expected NumericParseFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_series_conversion_requires_strings() {
        let series = Series::new("x".into(), &[1.0f64, 2.0]);
        assert!(locale_strings_to_f64(&series, &pt_br()).is_err());
    }
}
