//! Pure predicates and reducers over collections of chart values.
//!
//! Used to sniff the kind of values an axis carries (continuous, temporal,
//! categorical) and to compute extents across mixed number/date collections.

use crate::value::{Scalar, Value};

/// True iff at least one element is text. False for empty input.
#[must_use]
pub fn contains_strings(values: &[Value]) -> bool {
    values.iter().any(|v| matches!(v, Value::Text(_)))
}

/// True iff at least one element is a number. False for empty input.
#[must_use]
pub fn contains_numbers(values: &[Value]) -> bool {
    values.iter().any(|v| matches!(v, Value::Number(_)))
}

/// True iff at least one element is a date. False for empty input.
#[must_use]
pub fn contains_dates(values: &[Value]) -> bool {
    values.iter().any(|v| matches!(v, Value::Date(_)))
}

/// True iff the collection is non-empty and every element is text.
#[must_use]
pub fn contains_only_strings(values: &[Value]) -> bool {
    !values.is_empty() && values.iter().all(|v| matches!(v, Value::Text(_)))
}

/// True iff the collection is non-empty and every element is itself a list.
#[must_use]
pub fn is_array_of_arrays(values: &[Value]) -> bool {
    !values.is_empty() && values.iter().all(|v| matches!(v, Value::List(_)))
}

/// Drop undefined entries, preserving order.
#[must_use]
pub fn remove_undefined<T: Clone>(values: &[Option<T>]) -> Vec<T> {
    values.iter().flatten().cloned().collect()
}

/// Drop [`Value::Null`] entries, preserving order.
#[must_use]
pub fn remove_null(values: &[Value]) -> Vec<Value> {
    values.iter().filter(|v| !v.is_null()).cloned().collect()
}

/// Distinct text labels in order of first appearance.
#[must_use]
pub fn unique_strings(values: &[Value]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for label in values.iter().filter_map(Value::as_str) {
        if !seen.iter().any(|s| s == label) {
            seen.push(label.to_string());
        }
    }
    seen
}

/// Maximum over `values` and `extra`.
///
/// Returns a date when any input is a date. An empty input yields
/// `Number(-inf)`, and any NaN propagates to a NaN result.
#[must_use]
pub fn get_max_value(values: &[Scalar], extra: &[Scalar]) -> Scalar {
    extreme(values, extra, f64::NEG_INFINITY, f64::max)
}

/// Minimum over `values` and `extra`.
///
/// Returns a date when any input is a date. An empty input yields
/// `Number(inf)`, and any NaN propagates to a NaN result.
#[must_use]
pub fn get_min_value(values: &[Scalar], extra: &[Scalar]) -> Scalar {
    extreme(values, extra, f64::INFINITY, f64::min)
}

fn extreme(values: &[Scalar], extra: &[Scalar], init: f64, pick: fn(f64, f64) -> f64) -> Scalar {
    let all = || values.iter().chain(extra);
    // f64::max/min skip NaN; the extent must not
    let folded = all().map(Scalar::as_f64).fold(init, |acc, v| {
        if acc.is_nan() || v.is_nan() {
            f64::NAN
        } else {
            pick(acc, v)
        }
    });

    if all().any(Scalar::is_date) {
        Scalar::date_from_millis(folded)
    } else {
        Scalar::Number(folded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn strings(values: &[&str]) -> Vec<Value> {
        values.iter().map(|&s| Value::from(s)).collect()
    }

    #[test]
    fn test_contains_predicates() {
        let mixed = vec![Value::from(1), Value::from("a"), Value::Null];
        assert!(contains_strings(&mixed));
        assert!(contains_numbers(&mixed));
        assert!(!contains_dates(&mixed));
        assert!(!contains_only_strings(&mixed));

        let dated = vec![Value::from(Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap())];
        assert!(contains_dates(&dated));
    }

    #[test]
    fn test_contains_predicates_empty() {
        assert!(!contains_strings(&[]));
        assert!(!contains_numbers(&[]));
        assert!(!contains_dates(&[]));
        assert!(!contains_only_strings(&[]));
    }

    #[test]
    fn test_contains_only_strings() {
        assert!(contains_only_strings(&strings(&["a", "b"])));
    }

    #[test]
    fn test_is_array_of_arrays() {
        assert!(!is_array_of_arrays(&[]));
        assert!(is_array_of_arrays(&[Value::from(vec![1, 2]), Value::from(vec![3])]));
        assert!(!is_array_of_arrays(&[Value::from(vec![1, 2]), Value::from(3)]));
    }

    #[test]
    fn test_remove_undefined_preserves_order() {
        assert_eq!(remove_undefined(&[Some(3), None, Some(1), None]), vec![3, 1]);
        assert_eq!(
            remove_null(&[Value::from("a"), Value::Null, Value::from(2)]),
            vec![Value::from("a"), Value::from(2)]
        );
    }

    #[test]
    fn test_unique_strings_first_appearance() {
        let values = strings(&["cats", "dogs", "cats", "birds"]);
        assert_eq!(unique_strings(&values), vec!["cats", "dogs", "birds"]);
    }

    #[test]
    fn test_min_max_numbers() {
        let values = [Scalar::from(3.0), Scalar::from(-2.0), Scalar::from(7.5)];
        assert_eq!(get_max_value(&values, &[]), Scalar::Number(7.5));
        assert_eq!(get_min_value(&values, &[]), Scalar::Number(-2.0));
        assert_eq!(get_max_value(&values, &[Scalar::from(10.0)]), Scalar::Number(10.0));
        assert_eq!(get_min_value(&values, &[Scalar::from(-10.0)]), Scalar::Number(-10.0));
    }

    #[test]
    fn test_min_max_dates_return_dates() {
        let early = Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2017, 6, 1, 0, 0, 0).unwrap();
        let values = [Scalar::from(late), Scalar::from(early)];
        assert_eq!(get_max_value(&values, &[]), Scalar::Date(late));
        assert_eq!(get_min_value(&values, &[]), Scalar::Date(early));

        // a single date coerces the numeric extent into a date
        let mixed = [Scalar::from(0.0)];
        assert_eq!(get_max_value(&mixed, &[Scalar::from(early)]), Scalar::Date(early));
        assert!(get_min_value(&mixed, &[Scalar::from(early)]).is_date());
    }

    #[test]
    fn test_min_max_degenerate_inputs() {
        assert_eq!(get_max_value(&[], &[]), Scalar::Number(f64::NEG_INFINITY));
        assert_eq!(get_min_value(&[], &[]), Scalar::Number(f64::INFINITY));
        assert!(get_max_value(&[Scalar::from(1.0), Scalar::from(f64::NAN)], &[]).is_nan());
        assert!(get_min_value(&[Scalar::from(f64::NAN), Scalar::from(1.0)], &[]).is_nan());
    }
}
