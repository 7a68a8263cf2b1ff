//! # synthex-analysis
//!
//! Meta-analysis engine for Synthex. Pure, synchronous computation over
//! immutable study records:
//! - `effect_size`: per-study OR, RR, RD, MD, SMD, Hedges' g
//! - `pooling`: fixed-effect and DerSimonian–Laird random-effects synthesis
//! - `heterogeneity`: Q, I², H², τ², prediction interval
//! - `forest`: forest-plot layout metadata
//! - `bias`: Egger's and Begg's tests, funnel data
//! - `pipeline`: all of the above in one call

pub mod bias;
pub mod effect_size;
pub mod forest;
pub mod heterogeneity;
pub mod pipeline;
pub mod pooling;
pub mod stats;
pub mod warnings;

pub use bias::{PublicationBiasAssessor, PublicationBiasResult};
pub use effect_size::{EffectMeasure, EffectSizeCalculator, EffectSizeResult, Study};
pub use forest::{ForestPlotData, ForestPlotDataBuilder};
pub use heterogeneity::{HeterogeneityAssessor, HeterogeneityResult};
pub use pipeline::{MetaAnalysis, MetaAnalysisReport};
pub use pooling::{PooledResult, PoolingEngine, StudyEffect};
pub use warnings::AnalysisWarning;
