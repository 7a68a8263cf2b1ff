//! Shared constants for the Synthex meta-analysis engine.

/// Synthex version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default confidence level for study and pooled intervals.
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Value added to every cell of a 2×2 table containing a zero.
pub const DEFAULT_CONTINUITY_CORRECTION: f64 = 0.5;

/// Default model request when none is configured.
pub const DEFAULT_MODEL: &str = "auto";

/// Auto model selection: switch to random effects above this I² (percent).
pub const DEFAULT_AUTO_I_SQUARED_THRESHOLD: f64 = 50.0;

/// Auto model selection: switch to random effects below this Q p-value.
pub const DEFAULT_AUTO_Q_P_THRESHOLD: f64 = 0.10;

/// Minimum studies for pooling.
pub const MIN_STUDIES_POOLING: usize = 2;

/// Minimum studies for the Q significance test and prediction interval.
pub const MIN_STUDIES_HETEROGENEITY_TEST: usize = 3;

/// Minimum studies for leave-one-out sensitivity analysis.
pub const MIN_STUDIES_SENSITIVITY: usize = 3;

/// Studies required before publication-bias tests have adequate power.
pub const DEFAULT_BIAS_MIN_STUDIES: usize = 10;

/// Publication bias: both tests below this p-value flag asymmetry.
pub const DEFAULT_BIAS_SCREENING_ALPHA: f64 = 0.10;

/// Publication bias: a single test below this p-value counts as strong evidence.
pub const DEFAULT_BIAS_STRONG_ALPHA: f64 = 0.01;

/// Default forest-plot study ordering.
pub const DEFAULT_FOREST_ORDER: &str = "original";

/// Default number of x-axis ticks the forest layout aims for.
pub const DEFAULT_TARGET_TICKS: usize = 5;

/// Number of SE grid points for funnel pseudo-confidence limits.
pub const FUNNEL_LIMIT_POINTS: usize = 20;

/// Accepted model names.
pub const MODEL_NAMES: [&str; 3] = ["fixed", "random", "auto"];

/// Accepted forest ordering names.
pub const FOREST_ORDER_NAMES: [&str; 5] =
    ["original", "by_year", "by_weight", "by_effect", "alphabetical"];
