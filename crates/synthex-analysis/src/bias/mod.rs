//! Publication Bias: small-study effect diagnostics.
//!
//! - Egger's regression test (standardized effect on precision)
//! - Begg's rank-correlation test (Kendall tau-b)
//! - Funnel-plot data with pseudo-confidence limits
//! - Conservative overall assessment combining both tests
//!
//! Fewer than the recommended study count never blocks: results are
//! computed and marked low-power.

pub mod assessor;
pub mod begg;
pub mod egger;
pub mod funnel;
pub mod types;

pub use assessor::{BiasOptions, PublicationBiasAssessor};
pub use begg::begg_test;
pub use egger::egger_test;
pub use funnel::funnel_data;
pub use types::{
    AsymmetryDirection, BeggTest, BiasAssessment, EggerTest, FunnelData, FunnelLimit,
    FunnelPoint, PublicationBiasResult,
};
