//! Data formatting: raw rows to ordered, normalized chart points.
//!
//! Every chart consumer reads [`FormattedDatum`]s. Each one carries the
//! resolved `x`/`y` values for display and their continuous projections
//! (`_x`/`_y`) for mapping functions:
//!
//! - numbers and dates project to themselves,
//! - text projects to its 1-based position among the distinct labels of that
//!   axis, in order of first appearance across the whole dataset,
//! - anything else projects to NaN.
//!
//! Without explicit data, points are sampled across a domain instead.

use std::collections::HashMap;

use log::trace;

use crate::config::{ChartProps, SortOrder};
use crate::domain::Domain;
use crate::value::{Accessor, Axes, Axis, RawDatum, Scalar, Value};

/// Field names produced by formatting. Source fields with these names are
/// superseded by the formatted values.
pub const RESERVED_KEYS: [&str; 6] = ["x", "y", "_x", "_y", "xName", "yName"];

/// A normalized chart point.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedDatum {
    /// Continuous projection of `x` (`_x`).
    pub x_projected: Scalar,
    /// Resolved x value.
    pub x: Value,
    /// Label when `x` is categorical (`xName`).
    pub x_name: Option<String>,
    /// Continuous projection of `y` (`_y`).
    pub y_projected: Scalar,
    /// Resolved y value.
    pub y: Value,
    /// Label when `y` is categorical (`yName`).
    pub y_name: Option<String>,
    /// Source fields passed through unchanged.
    pub fields: RawDatum,
}

impl FormattedDatum {
    /// A point with continuous coordinates and no passthrough fields.
    #[must_use]
    pub fn from_scalars(x: Scalar, y: Scalar) -> Self {
        Self {
            x_projected: x,
            x: x.into(),
            x_name: None,
            y_projected: y,
            y: y.into(),
            y_name: None,
            fields: RawDatum::new(),
        }
    }

    /// Continuous projection for `axis`.
    #[must_use]
    pub fn projected(&self, axis: Axis) -> Scalar {
        match axis {
            Axis::X => self.x_projected,
            Axis::Y => self.y_projected,
        }
    }

    /// Resolved value for `axis`.
    #[must_use]
    pub fn value(&self, axis: Axis) -> &Value {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    /// Category label for `axis`, if categorical.
    #[must_use]
    pub fn name(&self, axis: Axis) -> Option<&str> {
        match axis {
            Axis::X => self.x_name.as_deref(),
            Axis::Y => self.y_name.as_deref(),
        }
    }

    /// Read a field by its flattened name (`_x`, `xName`, a passthrough field...).
    #[must_use]
    pub fn get(&self, key: &str) -> Value {
        let label = |name: &Option<String>| name.clone().map_or(Value::Null, Value::Text);
        match key {
            "_x" => self.x_projected.into(),
            "x" => self.x.clone(),
            "xName" => label(&self.x_name),
            "_y" => self.y_projected.into(),
            "y" => self.y.clone(),
            "yName" => label(&self.y_name),
            _ => self.fields.get(key).cloned().unwrap_or_default(),
        }
    }

    /// Flattened record: passthrough fields plus the formatted keys.
    ///
    /// Category names are only present for categorical values.
    #[must_use]
    pub fn to_raw(&self) -> RawDatum {
        let mut raw = self.fields.clone();
        raw.insert("_x".to_string(), self.x_projected.into());
        raw.insert("x".to_string(), self.x.clone());
        raw.insert("_y".to_string(), self.y_projected.into());
        raw.insert("y".to_string(), self.y.clone());
        if let Some(name) = &self.x_name {
            raw.insert("xName".to_string(), Value::Text(name.clone()));
        }
        if let Some(name) = &self.y_name {
            raw.insert("yName".to_string(), Value::Text(name.clone()));
        }
        raw
    }
}

/// Assigns 1-based positions to labels in order of first appearance.
#[derive(Debug, Default)]
struct Categories {
    positions: HashMap<String, usize>,
}

impl Categories {
    fn position(&mut self, label: &str) -> usize {
        let next = self.positions.len() + 1;
        *self.positions.entry(label.to_string()).or_insert(next)
    }

    /// Projection and category label of one resolved value.
    fn project(&mut self, value: &Value) -> (Scalar, Option<String>) {
        match value {
            Value::Text(label) => {
                (Scalar::Number(self.position(label) as f64), Some(label.clone()))
            }
            other => (other.to_scalar().unwrap_or(Scalar::Number(f64::NAN)), None),
        }
    }
}

/// Resolve one axis' accessor over every row of the props' dataset.
#[must_use]
pub fn axis_values(props: &ChartProps, axis: Axis) -> Vec<Value> {
    let Some(data) = props.data.as_deref() else {
        return Vec::new();
    };
    let accessor = props.accessor(axis);
    data.iter().enumerate().map(|(i, d)| accessor.resolve(d, i, data)).collect()
}

/// Format the props' data into chart points.
///
/// - With `props.data`, every row is resolved through the x/y accessors.
/// - Otherwise, with a `domain`, points are sampled across it: the two
///   endpoints, or `samples + 1` evenly spaced points when `samples` is set.
/// - Otherwise the result is empty.
///
/// Rows keep their input order unless `props.sort_key` is set.
#[must_use]
pub fn format_data(props: &ChartProps, domain: Option<&Domain>) -> Vec<FormattedDatum> {
    match (props.data.as_deref(), domain) {
        (Some(data), _) => format_rows(props, data),
        (None, Some(domain)) => sample_domain(props, domain),
        (None, None) => Vec::new(),
    }
}

fn format_rows(props: &ChartProps, data: &[RawDatum]) -> Vec<FormattedDatum> {
    trace!("formatting {} rows", data.len());
    let accessors = Axes::from_fn(|axis| props.accessor(axis));
    let mut categories: Axes<Categories> = Axes::default();

    let mut keyed: Vec<(Value, FormattedDatum)> = data
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let x = accessors.x.resolve(row, i, data);
            let y = accessors.y.resolve(row, i, data);
            let (x_projected, x_name) = categories.x.project(&x);
            let (y_projected, y_name) = categories.y.project(&y);

            let fields = row
                .iter()
                .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();

            let key = props.sort_key.as_ref().map(|k| k.resolve(row, i, data)).unwrap_or_default();
            (key, FormattedDatum { x_projected, x, x_name, y_projected, y, y_name, fields })
        })
        .collect();

    if props.sort_key.is_some() {
        sort_keyed(&mut keyed, props.sort_order);
    }
    keyed.into_iter().map(|(_, d)| d).collect()
}

fn sample_domain(props: &ChartProps, domain: &Domain) -> Vec<FormattedDatum> {
    // zero samples behaves like no samples: the two endpoints
    let intervals = props.samples.filter(|&n| n > 0).unwrap_or(1);
    trace!("sampling {} points across {domain:?}", intervals + 1);

    let points: Vec<FormattedDatum> = (0..=intervals)
        .map(|i| {
            FormattedDatum::from_scalars(
                sample(domain.x, i, intervals),
                sample(domain.y, i, intervals),
            )
        })
        .collect();

    match &props.sort_key {
        Some(key) => sort_generated(points, key, props.sort_order),
        None => points,
    }
}

/// The `i`-th of `n` intervals across `[min, max]`.
///
/// Every point of an axis has the same type: dates when either end is a date.
fn sample((min, max): (Scalar, Scalar), i: usize, n: usize) -> Scalar {
    min.lerp(&max, i as f64 / n as f64)
}

fn sort_generated(
    points: Vec<FormattedDatum>,
    key: &Accessor,
    order: SortOrder,
) -> Vec<FormattedDatum> {
    let raws: Vec<RawDatum> = points.iter().map(FormattedDatum::to_raw).collect();
    let mut keyed: Vec<(Value, FormattedDatum)> = points
        .into_iter()
        .enumerate()
        .map(|(i, p)| (key.resolve(&raws[i], i, &raws), p))
        .collect();
    sort_keyed(&mut keyed, order);
    keyed.into_iter().map(|(_, d)| d).collect()
}

/// Stable ascending sort by key; descending is its exact reverse.
fn sort_keyed(keyed: &mut [(Value, FormattedDatum)], order: SortOrder) {
    keyed.sort_by(|a, b| a.0.sort_cmp(&b.0));
    if order == SortOrder::Descending {
        keyed.reverse();
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::value::datum;
    use proptest::prelude::*;

    proptest! {
        /// Without a sort key, output order equals input order.
        #[test]
        fn prop_unsorted_preserves_order(xs in prop::collection::vec(-1.0e6f64..1.0e6, 0..50)) {
            let rows = xs.iter().map(|&x| datum([("x", x), ("y", x)])).collect();
            let data = format_data(&ChartProps::new().data(rows), None);
            let out: Vec<f64> = data.iter().map(|d| d.x_projected.as_f64()).collect();
            prop_assert_eq!(out, xs);
        }

        /// Sorted output is ordered by key and descending reverses ascending.
        #[test]
        fn prop_sort_orders(keys in prop::collection::vec(0i32..10, 0..50)) {
            let rows: Vec<RawDatum> = keys
                .iter()
                .enumerate()
                .map(|(i, &k)| {
                    datum([
                        ("x", Value::from(i as f64)),
                        ("y", Value::from(0)),
                        ("k", Value::from(k)),
                    ])
                })
                .collect();
            let asc = format_data(&ChartProps::new().data(rows.clone()).sort_key("k"), None);
            let mut desc = format_data(
                &ChartProps::new().data(rows).sort_key("k").sort_order(SortOrder::Descending),
                None,
            );

            for pair in asc.windows(2) {
                prop_assert!(pair[0].get("k").sort_cmp(&pair[1].get("k")).is_le());
            }
            desc.reverse();
            prop_assert_eq!(asc, desc);
        }

        /// Sampling yields samples + 1 points spanning the domain.
        #[test]
        fn prop_sample_count(
            samples in 1usize..100,
            lo in -1.0e3f64..1.0e3,
            width in 0.0f64..1.0e3
        ) {
            let extent = (Scalar::Number(lo), Scalar::Number(lo + width));
            let d: Domain = Axes::new(extent, extent);
            let data = format_data(&ChartProps::new().samples(samples), Some(&d));
            prop_assert_eq!(data.len(), samples + 1);
            prop_assert_eq!(data[0].x_projected, Scalar::Number(lo));
            prop_assert_eq!(data[samples].x_projected, Scalar::Number(lo + width));
        }
    }
}
