//! kpi_charts
//!
//! Turn backend chart descriptors into drawable KPI chart geometry. Pairs with the
//! `kpic` CLI.
//!
//! ### Features
//! - Normalize explicit series or tabular rows into length-matched label/value arrays
//! - Pure geometry for gauges, funnels, radars, waterfalls, budget/YoY comparisons,
//!   bars, lines, pies, KPI cards and progress bars
//! - Exhaustive chart-type dispatch with explicit empty and unsupported outcomes
//! - Dimension/measure switching and a two-tap period range selector
//! - SVG/PNG previews of any dispatched view
//!
//! ### Example
//! ```no_run
//! use kpi_charts::{ChartDescriptor, LayoutParams, dispatch};
//!
//! let descriptor = kpi_charts::storage::load_descriptor("revenue_gauge.json")?;
//! let layout = LayoutParams::sized(480.0, 320.0);
//! let view = dispatch(&descriptor, &layout);
//! kpi_charts::viz::render_view(&view, &layout, "gauge.svg", &Default::default())?;
//! let series = kpi_charts::normalize(&descriptor, 0);
//! println!("{:#?}", kpi_charts::stats::summarize(&series));
//! # let _: &ChartDescriptor = &descriptor;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cache;
pub mod config;
pub mod dimension;
pub mod dispatch;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod models;
pub mod normalize;
pub mod period;
pub mod stats;
pub mod storage;
pub mod viz;

pub use cache::GeometryCache;
pub use config::LayoutParams;
pub use dispatch::{ChartRoute, ChartView, dispatch, dispatch_series};
pub use error::{Error, Result};
pub use models::{ChartDescriptor, ChartType, NormalizedSeries};
pub use normalize::{normalize, normalize_all};
pub use period::{PeriodSelection, PeriodSelector, format_period_display};
