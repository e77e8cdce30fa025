//! # Trueno-Chart
//!
//! The state core behind a chart: formatted data points, axis domains, pixel
//! ranges and the scale functions mapping one onto the other, computed once per
//! pass and shared read-only with every chart consumer.
//!
//! ## Pipeline
//!
//! For each set of [`ChartProps`](config::ChartProps):
//!
//! 1. **Domain**: explicit override, else the extent of the data, else `[0, 1]`
//! 2. **Range**: explicit override, else the padded layout, else `[0, 1]`
//! 3. **Scale**: configured or inferred (linear, time, log, ordinal) per axis
//! 4. **Data**: explicit rows through accessors, or points sampled across the domain
//!
//! The result is one immutable [`Snapshot`](state::Snapshot), published by a
//! [`ChartProvider`](state::ChartProvider).
//!
//! ## Quick Start
//!
//! ```rust
//! use trueno_chart::prelude::*;
//!
//! let props = ChartProps::new()
//!     .data(vec![
//!         datum([("x", Value::from("kittens")), ("y", Value::from(3))]),
//!         datum([("x", Value::from("cats")), ("y", Value::from(5))]),
//!     ])
//!     .layout(Layout::new(450.0, 300.0).padding(Padding::uniform(50.0)));
//!
//! let provider = ChartProvider::new(props);
//! let (x, y) = provider
//!     .render(|ctx| ctx.select(|s| s.position(&s.data[0])))
//!     .unwrap();
//! assert_eq!((x, y), (50.0, 250.0));
//! ```
//!
//! ## References
//!
//! - Wilkinson, L. (2005). *The Grammar of Graphics*. Springer.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code (Cloudflare incident 2025-11-18)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Values, rows, accessors and per-axis pairs.
pub mod value;

/// Predicates and reducers over value collections.
pub mod collection;

/// Chart props and YAML loading.
pub mod config;

// ============================================================================
// Derivation Modules
// ============================================================================

/// Data formatting.
pub mod data;

/// Domain derivation.
pub mod domain;

/// Range derivation.
pub mod range;

/// Scale functions for data-to-visual mappings.
pub mod scale;

// ============================================================================
// Shared State
// ============================================================================

/// Snapshot computation and the provider/context pair.
pub mod state;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for trueno-chart operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use trueno_chart::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ChartProps, Layout, Padding, SortOrder};
    pub use crate::data::{format_data, FormattedDatum};
    pub use crate::domain::{derive_domain, Domain};
    pub use crate::error::{Error, Result};
    pub use crate::range::{derive_range, Range};
    pub use crate::scale::{
        AxisScale, LinearScale, LogScale, OrdinalScale, Scale, ScaleType, TimeScale,
    };
    pub use crate::state::{compute_snapshot, ChartContext, ChartProvider, Selection, Snapshot};
    pub use crate::value::{datum, Accessor, Axes, Axis, RawDatum, Scalar, Value};
}
