//! Range derivation: the pixel interval each axis maps onto.

use log::trace;

use crate::config::{ChartProps, Layout};
use crate::value::{Axes, Axis};

/// Per-axis `[start, end]` output intervals. Ends need not be ascending.
pub type Range = Axes<(f64, f64)>;

/// Interval used when neither an override nor a layout is available.
pub const DEFAULT_RANGE: (f64, f64) = (0.0, 1.0);

/// Derive the range of both axes.
#[must_use]
pub fn derive_range(props: &ChartProps) -> Range {
    Axes::from_fn(|axis| axis_range(props, axis))
}

/// Derive one axis' range: the explicit override, then the layout, then `[0, 1]`.
#[must_use]
pub fn axis_range(props: &ChartProps, axis: Axis) -> (f64, f64) {
    let range = (*props.range.get(axis))
        .or_else(|| props.layout.map(|layout| layout_range(&layout, axis)))
        .unwrap_or(DEFAULT_RANGE);
    trace!("{axis} range: {range:?}");
    range
}

/// Range of `axis` inside a padded layout.
///
/// The y range is inverted so the top of the plotting area maps to the
/// domain maximum.
#[must_use]
pub fn layout_range(layout: &Layout, axis: Axis) -> (f64, f64) {
    let p = layout.padding;
    match axis {
        Axis::X => (p.left, layout.width - p.right),
        Axis::Y => (layout.height - p.bottom, p.top),
    }
}
