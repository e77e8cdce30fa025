//! Domain derivation: the `[min, max]` extent each axis must represent.

use log::trace;

use crate::collection::{get_max_value, get_min_value};
use crate::config::ChartProps;
use crate::data::{format_data, FormattedDatum};
use crate::value::{Axes, Axis, Scalar};

/// Per-axis `[min, max]` extents.
pub type Domain = Axes<(Scalar, Scalar)>;

/// Extent used when neither an override nor data is available.
pub const DEFAULT_DOMAIN: (Scalar, Scalar) = (Scalar::Number(0.0), Scalar::Number(1.0));

/// Derive the domain of both axes.
#[must_use]
pub fn derive_domain(props: &ChartProps) -> Domain {
    // a domain is never needed to format explicit data
    domain_of(props, &format_data(props, None))
}

/// Derive the domain of both axes from already formatted data.
#[must_use]
pub fn domain_of(props: &ChartProps, data: &[FormattedDatum]) -> Domain {
    Axes::from_fn(|axis| {
        let projections: Vec<Scalar> = data.iter().map(|d| d.projected(axis)).collect();
        axis_domain(props, axis, &projections)
    })
}

/// Derive one axis' domain from its data projections.
///
/// First match wins: the explicit override (passed through as-is, even when
/// inverted), the extent of the non-NaN projections, then `[0, 1]`.
/// `min_domain`/`max_domain` then pin either end of a derived extent.
#[must_use]
pub fn axis_domain(props: &ChartProps, axis: Axis, projections: &[Scalar]) -> (Scalar, Scalar) {
    if let Some(explicit) = *props.domain.get(axis) {
        trace!("{axis} domain: explicit {explicit:?}");
        return explicit;
    }

    let finite: Vec<Scalar> = projections.iter().copied().filter(|s| !s.is_nan()).collect();
    let derived = if finite.is_empty() {
        DEFAULT_DOMAIN
    } else {
        (get_min_value(&finite, &[]), get_max_value(&finite, &[]))
    };

    let min = (*props.min_domain.get(axis)).unwrap_or(derived.0);
    let max = (*props.max_domain.get(axis)).unwrap_or(derived.1);
    trace!("{axis} domain: derived ({min:?}, {max:?})");
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{datum, Value};
    use chrono::{TimeZone, Utc};

    fn n(v: f64) -> Scalar {
        Scalar::Number(v)
    }

    #[test]
    fn test_default_domain_without_data() {
        let domain = derive_domain(&ChartProps::new());
        assert_eq!(domain.x, (n(0.0), n(1.0)));
        assert_eq!(domain.y, (n(0.0), n(1.0)));
    }

    #[test]
    fn test_domain_from_data() {
        let props = ChartProps::new().data(vec![
            datum([("x", 2), ("y", -4)]),
            datum([("x", 1), ("y", 3)]),
            datum([("x", 7), ("y", 1)]),
        ]);
        let domain = derive_domain(&props);
        assert_eq!(domain.x, (n(1.0), n(7.0)));
        assert_eq!(domain.y, (n(-4.0), n(3.0)));
    }

    #[test]
    fn test_categorical_domain_spans_positions() {
        let props = ChartProps::new().data(vec![
            datum([("x", Value::from("a")), ("y", Value::from(1))]),
            datum([("x", Value::from("b")), ("y", Value::from(1))]),
            datum([("x", Value::from("c")), ("y", Value::from(1))]),
        ]);
        let domain = derive_domain(&props);
        assert_eq!(domain.x, (n(1.0), n(3.0)));
        // single distinct value: zero-width domain
        assert_eq!(domain.y, (n(1.0), n(1.0)));
    }

    #[test]
    fn test_explicit_domain_passes_through_inverted() {
        let props = ChartProps::new()
            .data(vec![datum([("x", 1), ("y", 1)])])
            .domain(Axis::X, 10.0, 0.0)
            .min_domain(Axis::X, -5.0);
        let domain = derive_domain(&props);
        assert_eq!(domain.x, (n(10.0), n(0.0)));
        assert_eq!(domain.y, (n(1.0), n(1.0)));
    }

    #[test]
    fn test_min_max_domain_pin_ends() {
        let props = ChartProps::new()
            .data(vec![datum([("x", 2), ("y", 3)]), datum([("x", 4), ("y", 8)])])
            .min_domain(Axis::Y, 0.0)
            .max_domain(Axis::X, 10.0);
        let domain = derive_domain(&props);
        assert_eq!(domain.x, (n(2.0), n(10.0)));
        assert_eq!(domain.y, (n(0.0), n(8.0)));
    }

    #[test]
    fn test_nan_projections_ignored() {
        let props = ChartProps::new().data(vec![
            datum([("x", Value::from(3)), ("y", Value::Null)]),
            datum([("x", Value::from(vec![1])), ("y", Value::from(2))]),
        ]);
        let domain = derive_domain(&props);
        assert_eq!(domain.x, (n(3.0), n(3.0)));
        assert_eq!(domain.y, (n(2.0), n(2.0)));
        assert!(!domain.x.0.is_nan() && !domain.y.1.is_nan());
    }

    #[test]
    fn test_date_domain() {
        let early = Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2016, 6, 1, 0, 0, 0).unwrap();
        let props = ChartProps::new().data(vec![
            datum([("x", Value::from(late)), ("y", Value::from(1))]),
            datum([("x", Value::from(early)), ("y", Value::from(2))]),
        ]);
        let domain = derive_domain(&props);
        assert_eq!(domain.x, (Scalar::Date(early), Scalar::Date(late)));
    }
}
