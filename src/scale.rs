//! Scale functions for data-to-visual mappings.
//!
//! Scales transform domain values to range values (usually pixels). One
//! [`AxisScale`] is built per axis per computation pass and never mutated
//! afterwards. Based on the Grammar of Graphics [Wilkinson 2005].

use std::fmt;

use log::{trace, warn};
use serde::Deserialize;

use crate::collection::{contains_dates, contains_only_strings};
use crate::error::{Error, Result};
use crate::value::{Scalar, Value};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Family of mapping function used for an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    /// Continuous linear mapping.
    Linear,
    /// Linear mapping over millisecond timestamps.
    Time,
    /// Logarithmic mapping.
    Log,
    /// Categorical mapping over first-appearance positions.
    Ordinal,
}

impl ScaleType {
    /// Infer the scale type from an axis' resolved values.
    ///
    /// Any date makes the axis temporal; an all-text axis is ordinal;
    /// everything else is linear.
    #[must_use]
    pub fn infer(values: &[Value]) -> Self {
        if contains_dates(values) {
            ScaleType::Time
        } else if contains_only_strings(values) {
            ScaleType::Ordinal
        } else {
            ScaleType::Linear
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScaleType::Linear => "linear",
            ScaleType::Time => "time",
            ScaleType::Log => "log",
            ScaleType::Ordinal => "ordinal",
        };
        f.write_str(name)
    }
}

/// Linear scale for continuous-to-continuous mapping.
///
/// A zero-width domain maps every value to the middle of the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Create a new linear scale.
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain_min: domain.0, domain_max: domain.1, range_min: range.0, range_max: range.1 }
    }

    /// Invert the scale (range to domain).
    #[must_use]
    pub fn invert(&self, value: f64) -> f64 {
        let t = normalize(value, self.range_min, self.range_max);
        self.domain_min + t * (self.domain_max - self.domain_min)
    }

    /// Roughly `count` evenly spaced, human-friendly values inside the domain.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain_min, self.domain_max, count as f64)
    }
}

impl Scale<f64, f64> for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let t = normalize(value, self.domain_min, self.domain_max);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

/// Position of `value` between `a` and `b`; 0.5 when `a == b`.
fn normalize(value: f64, a: f64, b: f64) -> f64 {
    let span = b - a;
    if span == 0.0 {
        return 0.5;
    }
    (value - a) / span
}

/// Time scale: linear over millisecond epochs, keeping date endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: (Scalar, Scalar),
    linear: LinearScale,
}

impl TimeScale {
    /// Create a new time scale.
    #[must_use]
    pub fn new(domain: (Scalar, Scalar), range: (f64, f64)) -> Self {
        Self { domain, linear: LinearScale::new((domain.0.as_f64(), domain.1.as_f64()), range) }
    }

    /// Invert a range value back to a date.
    #[must_use]
    pub fn invert(&self, value: f64) -> Scalar {
        Scalar::date_from_millis(self.linear.invert(value))
    }

    /// Evenly spaced dates inside the domain, on round millisecond steps.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<Scalar> {
        self.linear.ticks(count).into_iter().map(Scalar::date_from_millis).collect()
    }
}

impl Scale<Scalar, f64> for TimeScale {
    fn scale(&self, value: Scalar) -> f64 {
        self.linear.scale(value.as_f64())
    }

    fn domain(&self) -> (Scalar, Scalar) {
        self.domain
    }

    fn range(&self) -> (f64, f64) {
        self.linear.range()
    }
}

/// Logarithmic scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
    base: f64,
}

impl LogScale {
    /// Create a new logarithmic scale with base 10.
    ///
    /// # Errors
    ///
    /// Returns an error if domain contains non-positive values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        Self::with_base(domain, range, 10.0)
    }

    /// Create a logarithmic scale with a custom base.
    ///
    /// # Errors
    ///
    /// Returns an error if domain contains non-positive values or base is invalid.
    pub fn with_base(domain: (f64, f64), range: (f64, f64), base: f64) -> Result<Self> {
        if !(domain.0 > 0.0 && domain.1 > 0.0) {
            return Err(Error::ScaleDomain("Log scale domain must be positive".to_string()));
        }

        if base <= 0.0 || base == 1.0 {
            return Err(Error::ScaleDomain(
                "Log scale base must be positive and not 1".to_string(),
            ));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
            base,
        })
    }

    fn log(&self, value: f64) -> f64 {
        value.max(f64::MIN_POSITIVE).ln() / self.base.ln()
    }

    /// Integer powers of the base that fall inside the domain.
    #[must_use]
    pub fn ticks(&self) -> Vec<f64> {
        let (lo, hi) = if self.domain_min <= self.domain_max {
            (self.domain_min, self.domain_max)
        } else {
            (self.domain_max, self.domain_min)
        };
        // ln-ratio logs land just below exact powers (log(1000) = 2.9999...)
        let first = (self.log(lo) - 1e-9).ceil() as i32;
        let last = (self.log(hi) + 1e-9).floor() as i32;
        (first..=last).map(|p| self.base.powi(p)).collect()
    }
}

impl Scale<f64, f64> for LogScale {
    fn scale(&self, value: f64) -> f64 {
        let t = normalize(self.log(value), self.log(self.domain_min), self.log(self.domain_max));
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

/// Ordinal scale for categorical axes.
///
/// Categories are projected to their 1-based position of first appearance,
/// and those positions are mapped linearly onto the range.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalScale {
    categories: Vec<String>,
    linear: LinearScale,
}

impl OrdinalScale {
    /// Create an ordinal scale over `categories` with the given position domain.
    #[must_use]
    pub fn new(categories: Vec<String>, domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { categories, linear: LinearScale::new(domain, range) }
    }

    /// Category labels in position order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Map a category label directly, or `None` for an unknown label.
    #[must_use]
    pub fn scale_label(&self, label: &str) -> Option<f64> {
        self.categories
            .iter()
            .position(|c| c == label)
            .map(|i| self.linear.scale((i + 1) as f64))
    }

    /// Category positions, one tick per category.
    #[must_use]
    pub fn ticks(&self) -> Vec<f64> {
        (1..=self.categories.len()).map(|i| i as f64).collect()
    }
}

impl Scale<f64, f64> for OrdinalScale {
    fn scale(&self, value: f64) -> f64 {
        self.linear.scale(value)
    }

    fn domain(&self) -> (f64, f64) {
        self.linear.domain()
    }

    fn range(&self) -> (f64, f64) {
        self.linear.range()
    }
}

/// The mapping function of one axis.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisScale {
    /// Linear mapping.
    Linear(LinearScale),
    /// Time mapping.
    Time(TimeScale),
    /// Logarithmic mapping.
    Log(LogScale),
    /// Categorical mapping.
    Ordinal(OrdinalScale),
}

impl AxisScale {
    /// Build a fresh mapping function bound to `domain` and `range`.
    ///
    /// Never fails: a log scale over a non-positive domain falls back to a
    /// linear mapping. `categories` labels ordinal positions and is ignored by
    /// other kinds.
    #[must_use]
    pub fn build(
        kind: ScaleType,
        domain: (Scalar, Scalar),
        range: (f64, f64),
        categories: &[String],
    ) -> Self {
        let numeric = (domain.0.as_f64(), domain.1.as_f64());
        trace!("building {kind} scale over {numeric:?} -> {range:?}");
        match kind {
            ScaleType::Linear => AxisScale::Linear(LinearScale::new(numeric, range)),
            ScaleType::Time => AxisScale::Time(TimeScale::new(domain, range)),
            ScaleType::Log => match LogScale::new(numeric, range) {
                Ok(log) => AxisScale::Log(log),
                Err(e) => {
                    warn!("{e}: domain {numeric:?}, using a linear scale instead");
                    AxisScale::Linear(LinearScale::new(numeric, range))
                }
            },
            ScaleType::Ordinal => {
                AxisScale::Ordinal(OrdinalScale::new(categories.to_vec(), numeric, range))
            }
        }
    }

    /// The family of this mapping function.
    #[must_use]
    pub fn kind(&self) -> ScaleType {
        match self {
            AxisScale::Linear(_) => ScaleType::Linear,
            AxisScale::Time(_) => ScaleType::Time,
            AxisScale::Log(_) => ScaleType::Log,
            AxisScale::Ordinal(_) => ScaleType::Ordinal,
        }
    }

    /// Map a raw value: numbers and dates directly, labels through an ordinal
    /// scale. Anything else maps to NaN.
    #[must_use]
    pub fn scale_value(&self, value: &Value) -> f64 {
        match (self, value) {
            (_, Value::Number(_) | Value::Date(_)) => {
                value.to_scalar().map_or(f64::NAN, |s| self.scale(s))
            }
            (AxisScale::Ordinal(ordinal), Value::Text(label)) => {
                ordinal.scale_label(label).unwrap_or(f64::NAN)
            }
            _ => f64::NAN,
        }
    }

    /// Tick values for an axis with roughly `count` ticks.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<Scalar> {
        match self {
            AxisScale::Linear(linear) => {
                linear.ticks(count).into_iter().map(Scalar::Number).collect()
            }
            AxisScale::Time(time) => time.ticks(count),
            AxisScale::Log(log) => log.ticks().into_iter().map(Scalar::Number).collect(),
            AxisScale::Ordinal(ordinal) => {
                ordinal.ticks().into_iter().map(Scalar::Number).collect()
            }
        }
    }
}

impl Scale<Scalar, f64> for AxisScale {
    fn scale(&self, value: Scalar) -> f64 {
        match self {
            AxisScale::Linear(s) => s.scale(value.as_f64()),
            AxisScale::Time(s) => s.scale(value),
            AxisScale::Log(s) => s.scale(value.as_f64()),
            AxisScale::Ordinal(s) => s.scale(value.as_f64()),
        }
    }

    fn domain(&self) -> (Scalar, Scalar) {
        let numeric = |(a, b): (f64, f64)| (Scalar::Number(a), Scalar::Number(b));
        match self {
            AxisScale::Linear(s) => numeric(s.domain()),
            AxisScale::Time(s) => s.domain(),
            AxisScale::Log(s) => numeric(s.domain()),
            AxisScale::Ordinal(s) => numeric(s.domain()),
        }
    }

    fn range(&self) -> (f64, f64) {
        match self {
            AxisScale::Linear(s) => s.range(),
            AxisScale::Time(s) => s.range(),
            AxisScale::Log(s) => s.range(),
            AxisScale::Ordinal(s) => s.range(),
        }
    }
}

// ============================================================================
// Tick generation (nice 1-2-5 steps)
// ============================================================================

fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();

    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let scale = 10f64.powf(-power) / factor;
        i1 = (start * scale).round();
        i2 = (stop * scale).round();
        if i1 / scale < start {
            i1 += 1.0;
        }
        if i2 / scale > stop {
            i2 -= 1.0;
        }
        inc = -scale;
    } else {
        let step = 10f64.powf(power) * factor;
        i1 = (start / step).round();
        i2 = (stop / step).round();
        if i1 * step < start {
            i1 += 1.0;
        }
        if i2 * step > stop {
            i2 -= 1.0;
        }
        inc = step;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

fn ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    if !(count > 0.0) || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count);
    if !(i2 >= i1) {
        return Vec::new();
    }

    let n = (i2 - i1 + 1.0) as usize;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 {
                k / -inc
            } else {
                k * inc
            }
        })
        .collect();
    if reverse {
        out.reverse();
    }
    out
}
