//! Effect Size Calculation: per-study effect sizes with standard errors.
//!
//! - Binary (2×2 counts) → OR, RR, RD with all-cell continuity correction
//! - Continuous (means/SDs) → MD, SMD (Cohen's d), Hedges' g
//! - Precomputed → any measure, including HR
//!
//! Ratio measures are pooled on the log scale; `analysis_value` carries
//! the pooling-scale estimate, `value` the natural-scale one.

pub mod binary;
pub mod calculator;
pub mod confidence;
pub mod continuous;
pub mod types;

pub use calculator::{EffectSizeCalculator, EffectSizeOptions};
pub use types::{
    BinaryCounts, ContinuousSummary, DataKind, EffectMeasure, EffectSizeResult,
    PrecomputedEffect, Study, StudyData,
};
