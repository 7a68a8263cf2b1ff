//! Forest Plot Data: layout metadata for forest-plot renderers.
//!
//! Pure transform over per-study effect sizes and a pooled result:
//! - Row ordering (original, by year, by weight, by effect, alphabetical)
//! - X-axis scale, null line and rounded ticks
//! - Y positions for study rows, separator, pooled diamond and header
//!
//! No drawing primitives are produced.

pub mod axis;
pub mod builder;
pub mod types;

pub use axis::{linear_ticks, log_ticks};
pub use builder::ForestPlotDataBuilder;
pub use types::{AxisScale, ForestPlotData, ForestRow, PooledRow, StudyOrder, XAxis, YAxis};
