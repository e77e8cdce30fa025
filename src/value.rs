//! Value model shared by every chart-state module.
//!
//! Raw input rows are loosely typed ([`RawDatum`] maps field names to [`Value`]s),
//! while everything handed to a mapping function is a continuous [`Scalar`].

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A resolved field value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A missing or undefined value.
    #[default]
    Null,
    /// A numeric value.
    Number(f64),
    /// A timestamp. RFC 3339 strings in configuration deserialize to this variant.
    Date(DateTime<Utc>),
    /// A text (categorical) value.
    Text(String),
    /// A nested list of values.
    List(Vec<Value>),
}

impl Value {
    /// Get as f64, or None if not a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get as timestamp.
    #[must_use]
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Whether this value is missing.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The continuous projection of a non-categorical value.
    ///
    /// Text, lists and nulls have no direct projection.
    #[must_use]
    pub fn to_scalar(&self) -> Option<Scalar> {
        match self {
            Value::Number(n) => Some(Scalar::Number(*n)),
            Value::Date(d) => Some(Scalar::Date(*d)),
            _ => None,
        }
    }

    /// Total ordering used for sorting rows by a key.
    ///
    /// Numbers and dates compare by magnitude (dates as epoch milliseconds),
    /// text lexicographically after them, lists after text, and nulls last.
    #[must_use]
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self.to_scalar(), other.to_scalar()) {
            (Some(a), Some(b)) => a.as_f64().total_cmp(&b.as_f64()),
            _ => match (self, other) {
                (Value::Text(a), Value::Text(b)) => a.cmp(b),
                (Value::List(a), Value::List(b)) => a.len().cmp(&b.len()),
                _ => self.sort_rank().cmp(&other.sort_rank()),
            },
        }
    }

    fn sort_rank(&self) -> u8 {
        match self {
            Value::Number(_) | Value::Date(_) => 0,
            Value::Text(_) => 1,
            Value::List(_) => 2,
            Value::Null => 3,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        match s {
            Scalar::Number(n) => Value::Number(n),
            Scalar::Date(d) => Value::Date(d),
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

/// A continuous value a mapping function can consume directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// A plain number.
    Number(f64),
    /// A timestamp, mapped through its millisecond epoch.
    Date(DateTime<Utc>),
}

impl Scalar {
    /// Numeric view: numbers as-is, dates as milliseconds since the epoch.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Scalar::Number(n) => *n,
            Scalar::Date(d) => d.timestamp_millis() as f64,
        }
    }

    /// Whether this is a date.
    #[must_use]
    pub fn is_date(&self) -> bool {
        matches!(self, Scalar::Date(_))
    }

    /// Whether the numeric view is NaN.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.as_f64().is_nan()
    }

    /// Build a date from epoch milliseconds.
    ///
    /// Non-finite or out-of-range inputs produce `Number(NaN)`, the equivalent
    /// of an invalid date.
    #[must_use]
    pub fn date_from_millis(ms: f64) -> Self {
        if !ms.is_finite() {
            return Scalar::Number(f64::NAN);
        }
        DateTime::<Utc>::from_timestamp_millis(ms.round() as i64)
            .map_or(Scalar::Number(f64::NAN), Scalar::Date)
    }

    /// Linear interpolation towards `other`.
    ///
    /// The result is a date when either end is one, and `t` of 0 or 1
    /// reproduces the matching end exactly.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let v = self.as_f64() * (1.0 - t) + other.as_f64() * t;
        if self.is_date() || other.is_date() {
            Self::date_from_millis(v)
        } else {
            Scalar::Number(v)
        }
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Number(v)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(d: DateTime<Utc>) -> Self {
        Scalar::Date(d)
    }
}

/// One input row: field name to value. Missing keys read as [`Value::Null`].
pub type RawDatum = BTreeMap<String, Value>;

/// Build a [`RawDatum`] from `(field, value)` pairs.
///
/// ```rust
/// use trueno_chart::value::{datum, Value};
///
/// let row = datum([("x", Value::from("kittens")), ("y", Value::from(3))]);
/// assert_eq!(row["y"], Value::Number(3.0));
/// ```
pub fn datum<K, V, I>(fields: I) -> RawDatum
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// Signature of a function accessor: `(datum, index, all_data) -> value`.
pub type AccessorFn = dyn Fn(&RawDatum, usize, &[RawDatum]) -> Value + Send + Sync;

/// Pulls one value out of a raw datum, by field name or by function.
#[derive(Clone)]
pub enum Accessor {
    /// Read a named field.
    Field(String),
    /// Compute the value from the datum, its index and the whole dataset.
    Function(Arc<AccessorFn>),
}

impl Accessor {
    /// Accessor reading a named field.
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Accessor::Field(name.into())
    }

    /// Accessor computing its value with a closure.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&RawDatum, usize, &[RawDatum]) -> Value + Send + Sync + 'static,
    {
        Accessor::Function(Arc::new(f))
    }

    /// Resolve this accessor against `datum`, the `index`-th row of `all`.
    #[must_use]
    pub fn resolve(&self, datum: &RawDatum, index: usize, all: &[RawDatum]) -> Value {
        match self {
            Accessor::Field(name) => datum.get(name).cloned().unwrap_or_default(),
            Accessor::Function(f) => f(datum, index, all),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Accessor::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl From<&str> for Accessor {
    fn from(name: &str) -> Self {
        Accessor::field(name)
    }
}

impl From<String> for Accessor {
    fn from(name: String) -> Self {
        Accessor::Field(name)
    }
}

impl<'de> Deserialize<'de> for Accessor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Accessor::Field)
    }
}

/// A chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

impl Axis {
    /// Field name used for this axis when no accessor is configured.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One value per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Axes<T> {
    /// X axis value.
    pub x: T,
    /// Y axis value.
    pub y: T,
}

impl<T> Axes<T> {
    /// Create from both axis values.
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Value for `axis`.
    pub fn get(&self, axis: Axis) -> &T {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    /// Mutable value for `axis`.
    pub fn get_mut(&mut self, axis: Axis) -> &mut T {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    /// Build both values from a per-axis function.
    pub fn from_fn(mut f: impl FnMut(Axis) -> T) -> Self {
        let x = f(Axis::X);
        let y = f(Axis::Y);
        Self { x, y }
    }
}
