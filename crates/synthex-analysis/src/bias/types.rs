//! Core types for publication-bias diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::warnings::AnalysisWarning;

/// Egger's regression of y/se on 1/se.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EggerTest {
    /// β0; non-zero indicates funnel asymmetry.
    pub intercept: f64,
    pub standard_error: f64,
    pub slope: f64,
    pub t: f64,
    /// k − 2.
    pub df: usize,
    pub p_value: f64,
}

/// Begg and Mazumdar's rank correlation test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeggTest {
    /// Kendall tau-b between standardized effect and variance.
    pub tau: f64,
    /// Concordant minus discordant pairs.
    pub s: f64,
    pub variance_s: f64,
    pub z: f64,
    pub p_value: f64,
}

/// One study in the funnel plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelPoint {
    pub study_id: String,
    /// Natural-scale effect.
    pub effect: f64,
    /// Pooling-scale estimate.
    pub estimate: f64,
    pub standard_error: f64,
    /// 1 / se.
    pub precision: f64,
}

/// Pseudo-confidence limits around the pooled estimate at one SE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelLimit {
    pub standard_error: f64,
    /// Natural-scale bounds.
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelData {
    pub points: Vec<FunnelPoint>,
    /// Pooled effect (natural scale) drawn as the reference line.
    pub reference: f64,
    /// Pooled estimate on the pooling scale.
    pub reference_estimate: f64,
    /// From se = 0 to the largest observed se.
    pub limits: Vec<FunnelLimit>,
}

/// Direction of small-study asymmetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AsymmetryDirection {
    /// Less precise studies report larger effects.
    SmallStudiesLarger,
    /// Less precise studies report smaller effects.
    SmallStudiesSmaller,
}

impl AsymmetryDirection {
    /// Direction implied by the sign of a statistic; `None` at exactly zero.
    pub fn from_sign(value: f64) -> Option<Self> {
        if value > 0.0 {
            Some(Self::SmallStudiesLarger)
        } else if value < 0.0 {
            Some(Self::SmallStudiesSmaller)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SmallStudiesLarger => "small_studies_larger",
            Self::SmallStudiesSmaller => "small_studies_smaller",
        }
    }
}

impl fmt::Display for AsymmetryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Combined judgement across both tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasAssessment {
    pub bias_detected: bool,
    /// Advisory confidence in [0.1, 0.9].
    pub confidence: f64,
    pub direction: Option<AsymmetryDirection>,
    pub low_power: bool,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationBiasResult {
    pub k: usize,
    /// `None` when the test could not be computed (see warnings).
    pub egger: Option<EggerTest>,
    pub begg: Option<BeggTest>,
    pub funnel: FunnelData,
    pub overall: BiasAssessment,
    pub warnings: Vec<AnalysisWarning>,
}
