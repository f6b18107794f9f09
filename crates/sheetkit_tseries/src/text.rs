//! Numeric-string detection and Cyrillic month-name normalization.

use std::borrow::Cow;
use std::sync::LazyLock;

use polars::prelude::AnyValue;
use regex::Regex;

use crate::conf::TUP_CYRILLIC_MONTH_RULES;

static L_CYRILLIC_MONTH_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    TUP_CYRILLIC_MONTH_RULES
        .iter()
        .map(|(c_pattern, c_month)| {
            let regex = Regex::new(c_pattern).expect("month patterns are valid regexes");
            (regex, *c_month)
        })
        .collect()
});

////////////////////////////////////////////////////////////////////////////////
// #region NumericText

/// Whether `value` parses as a floating-point number (surrounding whitespace allowed).
///
/// Uses Rust's `f64` grammar: `inf` and `NaN` are numbers, while digit-group
/// underscores (`"1_000"`) are not.
pub fn is_number(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok()
}

/// [`is_number`] over a dataframe cell: nulls are `false`, numbers are `true`.
pub fn is_number_any_value(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => false,
        AnyValue::String(val) => is_number(val),
        AnyValue::StringOwned(val) => is_number(val.as_str()),
        AnyValue::UInt8(_)
        | AnyValue::UInt16(_)
        | AnyValue::UInt32(_)
        | AnyValue::UInt64(_)
        | AnyValue::Int8(_)
        | AnyValue::Int16(_)
        | AnyValue::Int32(_)
        | AnyValue::Int64(_)
        | AnyValue::Float32(_)
        | AnyValue::Float64(_) => true,
        _ => false,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CyrillicMonths

/// Replace Cyrillic month names with two-digit month numbers.
///
/// Rules are case-sensitive and match anywhere in the text, so `"июля"`
/// becomes `"07"` while the genitive `"мая"` is left as is.
pub fn convert_cyrillic_month(text: &str) -> String {
    let mut c_text = text.to_string();
    for (regex, c_month) in L_CYRILLIC_MONTH_RULES.iter() {
        let c_replaced = match regex.replace_all(&c_text, *c_month) {
            Cow::Borrowed(_) => continue,
            Cow::Owned(c_replaced) => c_replaced,
        };
        c_text = c_replaced;
    }
    c_text
}

/// [`convert_cyrillic_month`] over a sequence; missing items stay missing.
pub fn convert_cyrillic_months(values: &[Option<String>]) -> Vec<Option<String>> {
    values
        .iter()
        .map(|value| value.as_deref().map(convert_cyrillic_month))
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_rules_compile() {
        assert_eq!(L_CYRILLIC_MONTH_RULES.len(), 12);
    }

    #[test]
    fn test_is_number() {
        assert!(is_number("3.14"));
        assert!(is_number(" -2e3 "));
        assert!(is_number("42"));
        assert!(!is_number("abc"));
        assert!(!is_number(""));
        assert!(!is_number("1,5"));
        assert!(!is_number("1_000"));
        assert!(is_number("inf"));
    }

    #[test]
    fn test_is_number_any_value_never_fails() {
        assert!(!is_number_any_value(&AnyValue::Null));
        assert!(!is_number_any_value(&AnyValue::Boolean(true)));
        assert!(is_number_any_value(&AnyValue::Int64(7)));
        assert!(is_number_any_value(&AnyValue::String("0.5")));
        assert!(!is_number_any_value(&AnyValue::String("x0.5")));
    }

    #[test]
    fn test_convert_cyrillic_month() {
        assert_eq!(convert_cyrillic_month("15 января 2020"), "15 01 2020");
        assert_eq!(convert_cyrillic_month("1 декабря 2019"), "1 12 2019");
        assert_eq!(convert_cyrillic_month("март-апрель"), "03-04");
        assert_eq!(convert_cyrillic_month("2020-01-15"), "2020-01-15");
        assert_eq!(convert_cyrillic_month("15 мая 2020"), "15 мая 2020");
        assert_eq!(convert_cyrillic_month("Январь"), "Январь");
    }

    #[test]
    fn test_convert_cyrillic_months_keeps_missing() {
        let l_values = vec![Some("3 июля".to_string()), None, Some("n/a".to_string())];
        assert_eq!(
            convert_cyrillic_months(&l_values),
            vec![Some("3 07".to_string()), None, Some("n/a".to_string())]
        );
    }
}
