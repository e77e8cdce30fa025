//! Shared chart state.
//!
//! A [`ChartProvider`] derives one immutable [`Snapshot`] from its props:
//! domain, then range, then one scale per axis, then the formatted data.
//! Consumers read it through the [`ChartContext`] handed to them by
//! [`ChartProvider::render`], selecting only the slice they need.
//!
//! ```rust
//! use trueno_chart::config::{ChartProps, Layout};
//! use trueno_chart::state::ChartProvider;
//! use trueno_chart::value::{datum, Value};
//!
//! let props = ChartProps::new()
//!     .data(vec![datum([("x", 1), ("y", 2)]), datum([("x", 3), ("y", 4)])])
//!     .layout(Layout::new(400.0, 300.0));
//! let provider = ChartProvider::new(props);
//!
//! let points = provider.render(|ctx| ctx.select(|s| s.data.len())).unwrap();
//! assert_eq!(points, 2);
//! ```

use std::sync::Arc;

use log::debug;

use crate::collection::unique_strings;
use crate::config::ChartProps;
use crate::data::{axis_values, format_data, FormattedDatum};
use crate::domain::{domain_of, Domain};
use crate::error::{Error, Result};
use crate::range::{derive_range, Range};
use crate::scale::{AxisScale, Scale, ScaleType};
use crate::value::{Axes, Axis, Value};

/// Everything a chart consumer needs for one computation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Formatted points, in output order.
    pub data: Vec<FormattedDatum>,
    /// Mapping function per axis.
    pub scale: Axes<AxisScale>,
    /// Domain the scales were built from.
    pub domain: Domain,
    /// Range the scales were built from.
    pub range: Range,
}

impl Snapshot {
    /// Pixel position of a formatted point.
    #[must_use]
    pub fn position(&self, datum: &FormattedDatum) -> (f64, f64) {
        (self.scale.x.scale(datum.x_projected), self.scale.y.scale(datum.y_projected))
    }
}

/// Compute the snapshot for `props`.
///
/// Total: empty, partial or degenerate props produce a valid, possibly
/// degenerate snapshot.
#[must_use]
pub fn compute_snapshot(props: &ChartProps) -> Snapshot {
    let explicit = props.data.as_ref().map(|_| format_data(props, None));
    let domain = domain_of(props, explicit.as_deref().unwrap_or_default());
    let range = derive_range(props);
    let scale = Axes::from_fn(|axis| axis_scale(props, axis, &domain, &range));
    let data = explicit.unwrap_or_else(|| format_data(props, Some(&domain)));

    debug!(
        "chart snapshot: {} points, x {} {:?} -> {:?}, y {} {:?} -> {:?}",
        data.len(),
        scale.x.kind(),
        domain.x,
        range.x,
        scale.y.kind(),
        domain.y,
        range.y,
    );

    Snapshot { data, scale, domain, range }
}

/// Build one axis' scale: the configured type, else one inferred from the
/// axis' values (or from the domain when there is no data).
fn axis_scale(props: &ChartProps, axis: Axis, domain: &Domain, range: &Range) -> AxisScale {
    let extent = *domain.get(axis);
    let values = axis_values(props, axis);
    let kind = (*props.scale.get(axis)).unwrap_or_else(|| {
        if values.is_empty() {
            ScaleType::infer(&[Value::from(extent.0), Value::from(extent.1)])
        } else {
            ScaleType::infer(&values)
        }
    });
    AxisScale::build(kind, extent, *range.get(axis), &unique_strings(&values))
}

/// Owns chart props and publishes a fresh [`Snapshot`] whenever they change.
#[derive(Debug)]
pub struct ChartProvider {
    props: ChartProps,
    snapshot: Arc<Snapshot>,
}

impl ChartProvider {
    /// Create a provider and compute its first snapshot.
    #[must_use]
    pub fn new(props: ChartProps) -> Self {
        let snapshot = Arc::new(compute_snapshot(&props));
        Self { props, snapshot }
    }

    /// Current props.
    #[must_use]
    pub fn props(&self) -> &ChartProps {
        &self.props
    }

    /// Replace the props and publish a new snapshot.
    ///
    /// The previous snapshot is never mutated; holders of it keep a
    /// consistent view, and identity comparison detects the change.
    pub fn set_props(&mut self, props: ChartProps) {
        self.snapshot = Arc::new(compute_snapshot(&props));
        self.props = props;
    }

    /// The published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Run `children` inside this provider's scope.
    pub fn render<T>(&self, children: impl FnOnce(&ChartContext) -> T) -> T {
        let ctx = ChartContext { snapshot: Some(self.snapshot()) };
        children(&ctx)
    }
}

/// Read side of the shared chart state.
#[derive(Debug, Default)]
pub struct ChartContext {
    snapshot: Option<Arc<Snapshot>>,
}

impl ChartContext {
    /// A context with no provider above it. Every read fails.
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    /// Whether a provider supplies this context.
    #[must_use]
    pub fn is_provided(&self) -> bool {
        self.snapshot.is_some()
    }

    /// The whole snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingProvider`] outside a provider scope.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>> {
        self.snapshot.clone().ok_or(Error::MissingProvider)
    }

    /// Read the slice of the snapshot chosen by `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingProvider`] outside a provider scope.
    pub fn select<T>(&self, selector: impl FnOnce(&Snapshot) -> T) -> Result<T> {
        self.snapshot.as_deref().map(selector).ok_or(Error::MissingProvider)
    }
}

/// A consumer's subscription to one slice of the snapshot.
///
/// Re-selecting after a pass reports whether the slice changed, so a
/// consumer only reacts to changes it depends on.
pub struct Selection<T, F> {
    selector: F,
    current: Option<T>,
}

impl<T, F> Selection<T, F>
where
    T: PartialEq,
    F: Fn(&Snapshot) -> T,
{
    /// Subscribe with `selector`. Nothing is selected until [`Self::update`].
    pub fn new(selector: F) -> Self {
        Self { selector, current: None }
    }

    /// Re-select from `ctx`. Returns true when the slice changed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingProvider`] outside a provider scope.
    pub fn update(&mut self, ctx: &ChartContext) -> Result<bool> {
        let next = ctx.select(&self.selector)?;
        let changed = self.current.as_ref() != Some(&next);
        if changed {
            self.current = Some(next);
        }
        Ok(changed)
    }

    /// The last selected slice.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Layout;
    use crate::value::{datum, Scalar};
    use approx::assert_relative_eq;

    fn kittens() -> ChartProps {
        ChartProps::new()
            .data(vec![
                datum([("x", Value::from("kittens")), ("y", Value::from(3))]),
                datum([("x", Value::from("cats")), ("y", Value::from(5))]),
            ])
            .layout(Layout::new(300.0, 200.0))
    }

    #[test]
    fn test_snapshot_composes_domain_range_scale_data() {
        let snapshot = compute_snapshot(&kittens());

        assert_eq!(snapshot.data.len(), 2);
        assert_eq!(snapshot.domain.x, (Scalar::Number(1.0), Scalar::Number(2.0)));
        assert_eq!(snapshot.domain.y, (Scalar::Number(3.0), Scalar::Number(5.0)));
        assert_eq!(snapshot.range.x, (0.0, 300.0));
        assert_eq!(snapshot.range.y, (200.0, 0.0));
        assert_eq!(snapshot.scale.x.kind(), ScaleType::Ordinal);
        assert_eq!(snapshot.scale.y.kind(), ScaleType::Linear);

        let (px, py) = snapshot.position(&snapshot.data[1]);
        assert_relative_eq!(px, 300.0);
        assert_relative_eq!(py, 0.0);
        assert_relative_eq!(snapshot.scale.x.scale_value(&Value::from("kittens")), 0.0);
    }

    #[test]
    fn test_snapshot_without_data_samples_default_domain() {
        let snapshot = compute_snapshot(&ChartProps::new());
        assert_eq!(snapshot.data.len(), 2);
        assert_eq!(snapshot.data[1].x, Value::from(1));
        assert_eq!(snapshot.scale.x.kind(), ScaleType::Linear);
    }

    #[test]
    fn test_snapshot_time_domain_without_data() {
        use chrono::{TimeZone, Utc};
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap();
        let snapshot = compute_snapshot(&ChartProps::new().domain(Axis::X, start, end));
        assert_eq!(snapshot.scale.x.kind(), ScaleType::Time);
        assert_eq!(snapshot.data[0].x, Value::from(start));
    }

    #[test]
    fn test_explicit_scale_type_wins() {
        let snapshot = compute_snapshot(&kittens().scale(Axis::Y, ScaleType::Log));
        assert_eq!(snapshot.scale.y.kind(), ScaleType::Log);
    }

    #[test]
    fn test_zero_width_domain_snapshot() {
        let props = ChartProps::new().data(vec![datum([("x", 5), ("y", 5)])]);
        let snapshot = compute_snapshot(&props);
        assert_eq!(snapshot.domain.x, (Scalar::Number(5.0), Scalar::Number(5.0)));
        assert_relative_eq!(snapshot.position(&snapshot.data[0]).0, 0.5);
    }

    #[test]
    fn test_render_provides_context() {
        let provider = ChartProvider::new(kittens());
        let names = provider
            .render(|ctx| {
                ctx.select(|s| s.data.iter().filter_map(|d| d.x_name.clone()).collect::<Vec<_>>())
            })
            .unwrap();
        assert_eq!(names, vec!["kittens", "cats"]);
    }

    #[test]
    fn test_detached_context_fails() {
        let ctx = ChartContext::detached();
        assert!(!ctx.is_provided());
        assert!(matches!(ctx.select(|s| s.data.len()), Err(Error::MissingProvider)));
        assert!(matches!(ctx.snapshot(), Err(Error::MissingProvider)));
    }

    #[test]
    fn test_set_props_publishes_new_snapshot() {
        let mut provider = ChartProvider::new(kittens());
        let before = provider.snapshot();
        provider.set_props(kittens());
        let after = provider.snapshot();

        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(*before, *after);
        assert!(Arc::ptr_eq(&after, &provider.snapshot()));
    }

    #[test]
    fn test_selection_reports_changes() {
        let mut provider = ChartProvider::new(kittens());
        let mut count = Selection::new(|s: &Snapshot| s.data.len());
        let mut y_domain = Selection::new(|s: &Snapshot| s.domain.y);

        assert!(provider.render(|ctx| count.update(ctx)).unwrap());
        assert!(provider.render(|ctx| y_domain.update(ctx)).unwrap());
        assert_eq!(count.get(), Some(&2));

        // same point count, different y extent
        provider.set_props(kittens().max_domain(Axis::Y, 10.0));
        assert!(!provider.render(|ctx| count.update(ctx)).unwrap());
        assert!(provider.render(|ctx| y_domain.update(ctx)).unwrap());
        assert_eq!(y_domain.get(), Some(&(Scalar::Number(3.0), Scalar::Number(10.0))));

        assert!(count.update(&ChartContext::detached()).is_err());
    }

    #[test]
    fn test_snapshot_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Snapshot>();
        assert_send_sync::<ChartProvider>();
    }
}
