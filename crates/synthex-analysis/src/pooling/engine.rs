//! PoolingEngine: combines per-study effects into one summary estimate.

use rustc_hash::FxHashSet;
use synthex_core::config::AnalysisConfig;
use synthex_core::constants;
use synthex_core::errors::{AnalysisError, AnalysisResult, InputError};

use super::types::{
    ModelChoice, ModelSelection, PooledResult, PoolingModel, SelectionReason, StudyEffect,
    StudyWeight,
};
use crate::effect_size::{EffectMeasure, EffectSizeResult};
use crate::heterogeneity::{HeterogeneityAssessor, HeterogeneityResult};
use crate::stats::{inverse_variance, normal_two_sided_p, z_critical};

/// Identifier reported when the pooled summary itself is degenerate.
const POOLED_ID: &str = "pooled";

/// Options for pooling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolingOptions {
    pub model: ModelChoice,
    pub confidence_level: f64,
    /// Auto: random effects when I² exceeds this (percent).
    pub auto_i_squared_threshold: f64,
    /// Auto: random effects when Q's p-value is below this.
    pub auto_q_p_threshold: f64,
}

impl Default for PoolingOptions {
    fn default() -> Self {
        Self {
            model: ModelChoice::Auto,
            confidence_level: constants::DEFAULT_CONFIDENCE_LEVEL,
            auto_i_squared_threshold: constants::DEFAULT_AUTO_I_SQUARED_THRESHOLD,
            auto_q_p_threshold: constants::DEFAULT_AUTO_Q_P_THRESHOLD,
        }
    }
}

impl PoolingOptions {
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, InputError> {
        Ok(Self {
            model: config.effective_model().parse()?,
            confidence_level: config.effective_confidence_level(),
            auto_i_squared_threshold: config.effective_auto_i_squared_threshold(),
            auto_q_p_threshold: config.effective_auto_q_p_threshold(),
        })
    }

    pub fn with_model(mut self, model: ModelChoice) -> Self {
        self.model = model;
        self
    }

    fn validate(&self) -> Result<(), InputError> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(InputError::InvalidOption {
                field: "confidence_level".to_string(),
                message: format!("must be in (0, 1), got {}", self.confidence_level),
            });
        }
        Ok(())
    }
}

/// Validate pooling inputs: enough studies, unique ids, finite estimates,
/// positive standard errors whose inverse-variance weight is finite.
pub(crate) fn validate_effects(
    studies: &[StudyEffect],
    required: usize,
    operation: &'static str,
) -> AnalysisResult<()> {
    if studies.len() < required {
        return Err(AnalysisError::InsufficientStudies {
            operation,
            required,
            found: studies.len(),
        });
    }
    let mut seen = FxHashSet::default();
    let mut sum_squared_weights = 0.0;
    for s in studies {
        if !seen.insert(s.study_id.as_str()) {
            return Err(InputError::DuplicateStudyId {
                study_id: s.study_id.clone(),
            }
            .into());
        }
        if !s.estimate.is_finite() {
            return Err(InputError::NonFiniteValue {
                study_id: s.study_id.clone(),
                field: "estimate",
            }
            .into());
        }
        if !(s.standard_error.is_finite() && s.standard_error > 0.0) {
            return Err(InputError::NonPositiveStandardError {
                study_id: s.study_id.clone(),
                se: s.standard_error,
            }
            .into());
        }
        if !(1.0 / s.variance()).is_finite() {
            return Err(AnalysisError::degenerate(
                s.study_id.clone(),
                format!(
                    "standard error {:e} is too small for a finite inverse-variance weight",
                    s.standard_error
                ),
            ));
        }
        sum_squared_weights += (1.0 / s.variance()).powi(2);
    }
    // Heterogeneity moments need Σw² as well as Σw.
    if !sum_squared_weights.is_finite() {
        return Err(AnalysisError::degenerate(
            POOLED_ID,
            "inverse-variance weights overflow the heterogeneity moments",
        ));
    }
    Ok(())
}

/// Stateless pooling engine.
#[derive(Debug, Clone, Default)]
pub struct PoolingEngine {
    options: PoolingOptions,
}

impl PoolingEngine {
    pub fn new(options: PoolingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PoolingOptions {
        &self.options
    }

    /// Pool at least 2 studies under the configured model.
    pub fn pool(&self, studies: &[StudyEffect], measure: EffectMeasure) -> AnalysisResult<PooledResult> {
        self.pool_with_model(studies, measure, self.options.model)
    }

    /// Pool per-study effect sizes; all must share one measure.
    pub fn pool_effect_sizes(&self, effects: &[EffectSizeResult]) -> AnalysisResult<PooledResult> {
        let measure = common_measure(effects)?;
        let studies: Vec<StudyEffect> = effects.iter().map(EffectSizeResult::to_study_effect).collect();
        self.pool(&studies, measure)
    }

    /// Pool with an explicit model, overriding the configured one.
    pub fn pool_with_model(
        &self,
        studies: &[StudyEffect],
        measure: EffectMeasure,
        model: ModelChoice,
    ) -> AnalysisResult<PooledResult> {
        self.options.validate()?;
        validate_effects(studies, constants::MIN_STUDIES_POOLING, "pooling")?;

        let heterogeneity =
            HeterogeneityAssessor::new(self.options.confidence_level).assess(studies, measure)?;
        let selection = self.select_model(model, &heterogeneity);

        let tau_squared = match selection.resolved {
            PoolingModel::Fixed => 0.0,
            PoolingModel::Random => heterogeneity.tau_squared,
        };

        let estimates: Vec<f64> = studies.iter().map(|s| s.estimate).collect();
        let variances: Vec<f64> = studies.iter().map(StudyEffect::variance).collect();
        let summary = inverse_variance(&estimates, &variances, tau_squared);
        if !(summary.estimate.is_finite() && summary.standard_error > 0.0) {
            return Err(AnalysisError::degenerate(
                POOLED_ID,
                format!(
                    "pooled estimate is not finite (sum of weights {:e})",
                    summary.sum_weights
                ),
            ));
        }

        let z_crit = z_critical(self.options.confidence_level);
        let lower = summary.estimate - z_crit * summary.standard_error;
        let upper = summary.estimate + z_crit * summary.standard_error;
        let z = summary.estimate / summary.standard_error;
        let p_value = normal_two_sided_p(z);

        let weights = studies
            .iter()
            .zip(summary.weights.iter().zip(summary.weight_percentages()))
            .map(|(s, (&raw, percent))| StudyWeight {
                study_id: s.study_id.clone(),
                raw,
                percent,
            })
            .collect();

        tracing::debug!(
            k = studies.len(),
            model = %selection.resolved,
            estimate = summary.estimate,
            standard_error = summary.standard_error,
            tau_squared,
            "pooled studies"
        );

        let warnings = heterogeneity.warnings.clone();
        Ok(PooledResult {
            model: selection.resolved,
            measure,
            k: studies.len(),
            estimate: summary.estimate,
            standard_error: summary.standard_error,
            effect: measure.from_analysis_scale(summary.estimate),
            ci_lower: measure.from_analysis_scale(lower),
            ci_upper: measure.from_analysis_scale(upper),
            confidence_level: self.options.confidence_level,
            z,
            p_value,
            tau_squared,
            weights,
            selection,
            heterogeneity,
            warnings,
        })
    }

    /// Resolve the requested model. Deterministic: auto picks random when
    /// I² exceeds the threshold or Q's p-value is below it.
    pub fn select_model(&self, requested: ModelChoice, heterogeneity: &HeterogeneityResult) -> ModelSelection {
        let (resolved, reason) = match requested {
            ModelChoice::Fixed => (PoolingModel::Fixed, SelectionReason::Requested),
            ModelChoice::Random => (PoolingModel::Random, SelectionReason::Requested),
            ModelChoice::Auto => {
                if heterogeneity.i_squared > self.options.auto_i_squared_threshold {
                    (PoolingModel::Random, SelectionReason::HighISquared)
                } else if heterogeneity
                    .p_value
                    .is_some_and(|p| p < self.options.auto_q_p_threshold)
                {
                    (PoolingModel::Random, SelectionReason::SignificantQ)
                } else {
                    (PoolingModel::Fixed, SelectionReason::Homogeneous)
                }
            }
        };
        ModelSelection {
            requested,
            resolved,
            reason,
        }
    }
}

/// The single measure shared by all effects.
pub(crate) fn common_measure(effects: &[EffectSizeResult]) -> AnalysisResult<EffectMeasure> {
    let first = effects.first().ok_or(AnalysisError::InsufficientStudies {
        operation: "pooling",
        required: constants::MIN_STUDIES_POOLING,
        found: 0,
    })?;
    for e in effects {
        if e.measure != first.measure {
            return Err(InputError::MixedMeasures {
                study_id: e.study_id.clone(),
                expected: first.measure.name().to_string(),
                found: e.measure.name().to_string(),
            }
            .into());
        }
    }
    Ok(first.measure)
}
