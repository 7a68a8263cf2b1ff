//! Non-fatal conditions attached to results.
//!
//! Warnings never abort a computation; callers render them as
//! low-confidence indicators.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A non-fatal issue detected during analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    /// A 2×2 table contained a zero cell; every cell was incremented.
    ContinuityCorrectionApplied { study_id: String, correction: f64 },
    /// Arm standard deviations differ by more than a factor of two.
    UnequalVariances { study_id: String, sd_ratio: f64 },
    /// Fewer than 3 studies: the Q significance test was not computed.
    HeterogeneityTestOmitted { studies: usize },
    /// Fewer than 3 studies: the prediction interval was not computed.
    PredictionIntervalOmitted { studies: usize },
    /// Fewer studies than recommended for publication-bias tests.
    LowPower { studies: usize, recommended: usize },
    /// A publication-bias test could not be computed.
    BiasTestUnavailable { test: String, reason: String },
    /// Fewer than 3 studies: leave-one-out analysis was skipped.
    SensitivityOmitted { studies: usize },
}

impl AnalysisWarning {
    /// Study the warning refers to, if study-specific.
    pub fn study_id(&self) -> Option<&str> {
        match self {
            Self::ContinuityCorrectionApplied { study_id, .. }
            | Self::UnequalVariances { study_id, .. } => Some(study_id),
            _ => None,
        }
    }
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContinuityCorrectionApplied {
                study_id,
                correction,
            } => write!(
                f,
                "study {study_id}: zero cell, continuity correction of {correction} added to all cells"
            ),
            Self::UnequalVariances { study_id, sd_ratio } => write!(
                f,
                "study {study_id}: SD ratio {sd_ratio:.2} outside [0.5, 2]; pooled-SD assumption questionable"
            ),
            Self::HeterogeneityTestOmitted { studies } => write!(
                f,
                "{studies} studies: heterogeneity significance test requires at least 3"
            ),
            Self::PredictionIntervalOmitted { studies } => write!(
                f,
                "{studies} studies: prediction interval requires at least 3"
            ),
            Self::LowPower {
                studies,
                recommended,
            } => write!(
                f,
                "{studies} studies: publication-bias tests have low power (recommended at least {recommended})"
            ),
            Self::BiasTestUnavailable { test, reason } => {
                write!(f, "{test} test unavailable: {reason}")
            }
            Self::SensitivityOmitted { studies } => write!(
                f,
                "{studies} studies: leave-one-out analysis requires at least 3"
            ),
        }
    }
}
