//! Chart configuration surface.
//!
//! [`ChartProps`] is everything a chart provider derives its state from. Props
//! can be assembled with builder methods or parsed from YAML:
//!
//! ```yaml
//! data:
//!   - { x: kittens, y: 3 }
//!   - { x: cats, y: 5 }
//! sortKey: y
//! sortOrder: descending
//! scale: { y: log }
//! layout: { width: 450, height: 300, padding: 50 }
//! ```
//!
//! Function accessors are only available through the builder API.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::scale::ScaleType;
use crate::value::{Accessor, Axes, Axis, RawDatum, Scalar};

/// Direction applied when a sort key is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest key first.
    #[default]
    Ascending,
    /// Reverse of the ascending order.
    Descending,
}

/// Padding around the plotting area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(from = "PaddingSpec")]
pub struct Padding {
    /// Top padding.
    pub top: f64,
    /// Bottom padding.
    pub bottom: f64,
    /// Left padding.
    pub left: f64,
    /// Right padding.
    pub right: f64,
}

impl Padding {
    /// The same padding on every side.
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self { top: value, bottom: value, left: value, right: value }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PaddingSpec {
    Uniform(f64),
    Sides {
        #[serde(default)]
        top: f64,
        #[serde(default)]
        bottom: f64,
        #[serde(default)]
        left: f64,
        #[serde(default)]
        right: f64,
    },
}

impl From<PaddingSpec> for Padding {
    fn from(spec: PaddingSpec) -> Self {
        match spec {
            PaddingSpec::Uniform(v) => Padding::uniform(v),
            PaddingSpec::Sides { top, bottom, left, right } => Padding { top, bottom, left, right },
        }
    }
}

/// Resolved chart dimensions supplied by the surrounding layout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Layout {
    /// Total width.
    pub width: f64,
    /// Total height.
    pub height: f64,
    /// Padding inside width/height.
    #[serde(default)]
    pub padding: Padding,
}

impl Layout {
    /// Create a layout without padding.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height, padding: Padding::uniform(0.0) }
    }

    /// Set the padding.
    #[must_use]
    pub const fn padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }
}

/// Chart configuration from which one snapshot of chart state is derived.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartProps {
    /// Explicit dataset.
    pub data: Option<Vec<RawDatum>>,
    /// X accessor, field `x` when unset.
    pub x: Option<Accessor>,
    /// Y accessor, field `y` when unset.
    pub y: Option<Accessor>,
    /// Explicit per-axis domain overrides.
    pub domain: Axes<Option<(Scalar, Scalar)>>,
    /// Explicit per-axis range overrides.
    pub range: Axes<Option<(f64, f64)>>,
    /// Number of intervals sampled across the domain when no data is given.
    pub samples: Option<usize>,
    /// Key to sort formatted data by. Unsorted when unset.
    #[serde(alias = "sort_key")]
    pub sort_key: Option<Accessor>,
    /// Sort direction for `sort_key`.
    #[serde(alias = "sort_order")]
    pub sort_order: SortOrder,
    /// Explicit per-axis scale types.
    pub scale: Axes<Option<ScaleType>>,
    /// Replaces the lower end of a derived domain.
    #[serde(alias = "min_domain")]
    pub min_domain: Axes<Option<Scalar>>,
    /// Replaces the upper end of a derived domain.
    #[serde(alias = "max_domain")]
    pub max_domain: Axes<Option<Scalar>>,
    /// Dimensions from the surrounding layout.
    pub layout: Option<Layout>,
}

impl ChartProps {
    /// Creates empty props.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dataset.
    #[must_use]
    pub fn data(mut self, data: Vec<RawDatum>) -> Self {
        self.data = Some(data);
        self
    }

    /// Set the x accessor.
    #[must_use]
    pub fn x(mut self, accessor: impl Into<Accessor>) -> Self {
        self.x = Some(accessor.into());
        self
    }

    /// Set the y accessor.
    #[must_use]
    pub fn y(mut self, accessor: impl Into<Accessor>) -> Self {
        self.y = Some(accessor.into());
        self
    }

    /// Override the domain of one axis.
    #[must_use]
    pub fn domain(mut self, axis: Axis, min: impl Into<Scalar>, max: impl Into<Scalar>) -> Self {
        *self.domain.get_mut(axis) = Some((min.into(), max.into()));
        self
    }

    /// Override the range of one axis.
    #[must_use]
    pub fn range(mut self, axis: Axis, start: f64, end: f64) -> Self {
        *self.range.get_mut(axis) = Some((start, end));
        self
    }

    /// Set the sample count for domain-generated data.
    #[must_use]
    pub fn samples(mut self, samples: usize) -> Self {
        self.samples = Some(samples);
        self
    }

    /// Sort formatted data by a key.
    #[must_use]
    pub fn sort_key(mut self, accessor: impl Into<Accessor>) -> Self {
        self.sort_key = Some(accessor.into());
        self
    }

    /// Set the sort direction.
    #[must_use]
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// Force the scale type of one axis.
    #[must_use]
    pub fn scale(mut self, axis: Axis, kind: ScaleType) -> Self {
        *self.scale.get_mut(axis) = Some(kind);
        self
    }

    /// Pin the lower end of one axis' derived domain.
    #[must_use]
    pub fn min_domain(mut self, axis: Axis, value: impl Into<Scalar>) -> Self {
        *self.min_domain.get_mut(axis) = Some(value.into());
        self
    }

    /// Pin the upper end of one axis' derived domain.
    #[must_use]
    pub fn max_domain(mut self, axis: Axis, value: impl Into<Scalar>) -> Self {
        *self.max_domain.get_mut(axis) = Some(value.into());
        self
    }

    /// Set the layout dimensions.
    #[must_use]
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// The accessor for `axis`, defaulting to the field named after it.
    #[must_use]
    pub fn accessor(&self, axis: Axis) -> Accessor {
        let configured = match axis {
            Axis::X => self.x.as_ref(),
            Axis::Y => self.y.as_ref(),
        };
        configured.cloned().unwrap_or_else(|| Accessor::field(axis.key()))
    }

    /// Loads props from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses props from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            Error::ConfigParse { line, message: e.to_string() }
        })
    }

    /// Loads props with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }
}
