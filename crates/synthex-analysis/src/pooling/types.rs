//! Core types for pooling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use synthex_core::errors::InputError;

use crate::effect_size::EffectMeasure;
use crate::heterogeneity::HeterogeneityResult;
use crate::warnings::AnalysisWarning;

/// One study's pooling input: estimate and SE on the pooling scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyEffect {
    pub study_id: String,
    pub estimate: f64,
    pub standard_error: f64,
}

impl StudyEffect {
    pub fn new(study_id: impl Into<String>, estimate: f64, standard_error: f64) -> Self {
        Self {
            study_id: study_id.into(),
            estimate,
            standard_error,
        }
    }

    pub fn variance(&self) -> f64 {
        self.standard_error * self.standard_error
    }
}

/// Resolved pooling model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolingModel {
    Fixed,
    Random,
}

impl PoolingModel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Random => "random",
        }
    }

    /// Row label used for the pooled estimate.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fixed => "Fixed-effect model",
            Self::Random => "Random-effects model",
        }
    }
}

impl fmt::Display for PoolingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Requested pooling model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelChoice {
    Fixed,
    Random,
    #[default]
    Auto,
}

impl ModelChoice {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Random => "random",
            Self::Auto => "auto",
        }
    }
}

impl From<PoolingModel> for ModelChoice {
    fn from(model: PoolingModel) -> Self {
        match model {
            PoolingModel::Fixed => Self::Fixed,
            PoolingModel::Random => Self::Random,
        }
    }
}

impl FromStr for ModelChoice {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "random" => Ok(Self::Random),
            "auto" => Ok(Self::Auto),
            other => Err(InputError::InvalidOption {
                field: "model".to_string(),
                message: format!("unknown pooling model '{other}'"),
            }),
        }
    }
}

/// Why a model was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionReason {
    /// The caller asked for this model explicitly.
    Requested,
    /// Auto: I² above threshold.
    HighISquared,
    /// Auto: Q p-value below threshold.
    SignificantQ,
    /// Auto: neither criterion met.
    Homogeneous,
}

/// Record of model selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelSelection {
    pub requested: ModelChoice,
    pub resolved: PoolingModel,
    pub reason: SelectionReason,
}

/// A study's weight in the pooled estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyWeight {
    pub study_id: String,
    /// Inverse-variance weight used in the computation.
    pub raw: f64,
    /// Share of the total, in percent.
    pub percent: f64,
}

/// Summary estimate across studies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PooledResult {
    pub model: PoolingModel,
    pub measure: EffectMeasure,
    pub k: usize,
    /// Pooled estimate on the pooling scale.
    pub estimate: f64,
    /// Standard error on the pooling scale.
    pub standard_error: f64,
    /// Natural-scale pooled effect and confidence bounds.
    pub effect: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub confidence_level: f64,
    pub z: f64,
    pub p_value: f64,
    /// τ² applied to the weights (0 under the fixed-effect model).
    pub tau_squared: f64,
    pub weights: Vec<StudyWeight>,
    pub selection: ModelSelection,
    pub heterogeneity: HeterogeneityResult,
    pub warnings: Vec<AnalysisWarning>,
}

impl PooledResult {
    /// Weight percentage for a study, if it took part.
    pub fn weight_percent(&self, study_id: &str) -> Option<f64> {
        self.weights
            .iter()
            .find(|w| w.study_id == study_id)
            .map(|w| w.percent)
    }

    /// Whether the interval excludes the measure's null value.
    pub fn is_significant(&self) -> bool {
        let null = self.measure.null_value();
        self.ci_lower > null || self.ci_upper < null
    }
}
