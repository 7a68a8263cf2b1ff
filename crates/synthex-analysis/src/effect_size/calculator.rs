//! EffectSizeCalculator: turns a `Study` into an `EffectSizeResult`.

use rustc_hash::FxHashSet;
use synthex_core::config::AnalysisConfig;
use synthex_core::constants;
use synthex_core::errors::{AnalysisError, AnalysisResult, InputError};

use super::binary::{self, RawEffect, TwoByTwo};
use super::confidence::{effect_confidence, ConfidenceFactors};
use super::continuous;
use super::types::{
    BinaryCounts, ContinuousSummary, EffectMeasure, EffectSizeResult, PrecomputedEffect, Study,
    StudyData,
};
use crate::stats::z_critical;
use crate::warnings::AnalysisWarning;

/// Options for effect-size computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectSizeOptions {
    /// Confidence level for per-study intervals (default 0.95).
    pub confidence_level: f64,
    /// Added to all cells of a 2×2 table with a zero cell; 0 disables.
    pub continuity_correction: f64,
}

impl Default for EffectSizeOptions {
    fn default() -> Self {
        Self {
            confidence_level: constants::DEFAULT_CONFIDENCE_LEVEL,
            continuity_correction: constants::DEFAULT_CONTINUITY_CORRECTION,
        }
    }
}

impl EffectSizeOptions {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            confidence_level: config.effective_confidence_level(),
            continuity_correction: config.effective_continuity_correction(),
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(InputError::InvalidOption {
                field: "confidence_level".to_string(),
                message: format!("must be in (0, 1), got {}", self.confidence_level),
            });
        }
        if !(self.continuity_correction.is_finite() && self.continuity_correction >= 0.0) {
            return Err(InputError::InvalidOption {
                field: "continuity_correction".to_string(),
                message: format!("must be non-negative, got {}", self.continuity_correction),
            });
        }
        Ok(())
    }
}

/// Stateless per-study effect-size calculator.
#[derive(Debug, Clone, Default)]
pub struct EffectSizeCalculator {
    options: EffectSizeOptions,
}

/// Intermediate result before CI/confidence decoration.
struct Computed {
    raw: RawEffect,
    total_n: Option<i64>,
    continuity_corrected: bool,
    warnings: Vec<AnalysisWarning>,
}

impl EffectSizeCalculator {
    pub fn new(options: EffectSizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EffectSizeOptions {
        &self.options
    }

    /// Compute the effect size of one study under `measure`.
    pub fn compute(&self, study: &Study, measure: EffectMeasure) -> AnalysisResult<EffectSizeResult> {
        self.options.validate()?;
        let id = study.study_id.as_str();

        if !measure.accepts(study.data.kind()) {
            return Err(InputError::IncompatibleMeasure {
                study_id: id.to_string(),
                measure: measure.name().to_string(),
                data_kind: study.data.kind().name(),
            }
            .into());
        }

        let computed = match &study.data {
            StudyData::Binary(counts) => self.binary(id, counts, measure)?,
            StudyData::Continuous(summary) => self.continuous(id, summary, measure)?,
            StudyData::Precomputed(effect) => self.precomputed(id, effect, measure)?,
        };

        let z = z_critical(self.options.confidence_level);
        let RawEffect {
            estimate,
            standard_error,
        } = computed.raw;
        let lower = estimate - z * standard_error;
        let upper = estimate + z * standard_error;

        let confidence = effect_confidence(&ConfidenceFactors {
            total_n: computed.total_n,
            ci_width: upper - lower,
            continuity_corrected: computed.continuity_corrected,
            unequal_variances: computed
                .warnings
                .iter()
                .any(|w| matches!(w, AnalysisWarning::UnequalVariances { .. })),
        });

        tracing::debug!(
            study_id = id,
            measure = %measure,
            estimate,
            standard_error,
            corrected = computed.continuity_corrected,
            "computed effect size"
        );

        Ok(EffectSizeResult {
            study_id: study.study_id.clone(),
            label: study.display_label().to_string(),
            year: study.year,
            measure,
            value: measure.from_analysis_scale(estimate),
            analysis_value: estimate,
            standard_error,
            ci_lower: measure.from_analysis_scale(lower),
            ci_upper: measure.from_analysis_scale(upper),
            weight: 1.0 / (standard_error * standard_error),
            continuity_corrected: computed.continuity_corrected,
            confidence,
            warnings: computed.warnings,
        })
    }

    /// Compute effect sizes for a batch, failing on the first invalid study.
    /// Study ids must be unique.
    pub fn compute_all(
        &self,
        studies: &[Study],
        measure: EffectMeasure,
    ) -> AnalysisResult<Vec<EffectSizeResult>> {
        let mut seen = FxHashSet::default();
        for study in studies {
            if !seen.insert(study.study_id.as_str()) {
                return Err(InputError::DuplicateStudyId {
                    study_id: study.study_id.clone(),
                }
                .into());
            }
        }
        studies.iter().map(|s| self.compute(s, measure)).collect()
    }

    fn binary(&self, id: &str, counts: &BinaryCounts, measure: EffectMeasure) -> AnalysisResult<Computed> {
        let table = TwoByTwo::from_counts(id, counts, self.options.continuity_correction)?;
        let raw = match measure {
            EffectMeasure::OddsRatio => binary::log_odds_ratio(id, &table)?,
            EffectMeasure::RiskRatio => binary::log_risk_ratio(id, &table)?,
            EffectMeasure::RiskDifference => binary::risk_difference(id, &table)?,
            other => return Err(incompatible(id, other, "binary")),
        };

        let mut warnings = Vec::new();
        if table.corrected {
            warnings.push(AnalysisWarning::ContinuityCorrectionApplied {
                study_id: id.to_string(),
                correction: self.options.continuity_correction,
            });
        }
        Ok(Computed {
            raw,
            total_n: Some(counts.n_t + counts.n_c),
            continuity_corrected: table.corrected,
            warnings,
        })
    }

    fn continuous(
        &self,
        id: &str,
        summary: &ContinuousSummary,
        measure: EffectMeasure,
    ) -> AnalysisResult<Computed> {
        let raw = match measure {
            EffectMeasure::MeanDifference => continuous::mean_difference(id, summary)?,
            EffectMeasure::StandardizedMeanDifference => continuous::cohens_d(id, summary)?,
            EffectMeasure::HedgesG => continuous::hedges_g(id, summary)?,
            other => return Err(incompatible(id, other, "continuous")),
        };
        if !(raw.standard_error.is_finite() && raw.standard_error > 0.0) {
            return Err(AnalysisError::degenerate(id, "standard error is zero"));
        }

        let mut warnings = Vec::new();
        if let Some(sd_ratio) = continuous::questionable_sd_ratio(summary) {
            tracing::warn!(study_id = id, sd_ratio, "unequal arm variances");
            warnings.push(AnalysisWarning::UnequalVariances {
                study_id: id.to_string(),
                sd_ratio,
            });
        }
        Ok(Computed {
            raw,
            total_n: Some(summary.n_t + summary.n_c),
            continuity_corrected: false,
            warnings,
        })
    }

    fn precomputed(
        &self,
        id: &str,
        effect: &PrecomputedEffect,
        measure: EffectMeasure,
    ) -> AnalysisResult<Computed> {
        if !effect.effect_size.is_finite() {
            return Err(InputError::NonFiniteValue {
                study_id: id.to_string(),
                field: "effect_size",
            }
            .into());
        }
        if !(effect.standard_error.is_finite() && effect.standard_error > 0.0) {
            return Err(InputError::NonPositiveStandardError {
                study_id: id.to_string(),
                se: effect.standard_error,
            }
            .into());
        }
        if measure.is_ratio() && effect.effect_size <= 0.0 {
            return Err(InputError::NonPositiveRatio {
                study_id: id.to_string(),
                measure: measure.name().to_string(),
                value: effect.effect_size,
            }
            .into());
        }
        Ok(Computed {
            raw: RawEffect {
                estimate: measure.to_analysis_scale(effect.effect_size),
                standard_error: effect.standard_error,
            },
            total_n: None,
            continuity_corrected: false,
            warnings: Vec::new(),
        })
    }
}

fn incompatible(id: &str, measure: EffectMeasure, data_kind: &'static str) -> AnalysisError {
    InputError::IncompatibleMeasure {
        study_id: id.to_string(),
        measure: measure.name().to_string(),
        data_kind,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odds_ratio_ci_on_log_scale() {
        let calc = EffectSizeCalculator::default();
        let r = calc
            .compute(&Study::binary("s1", 20, 100, 10, 100), EffectMeasure::OddsRatio)
            .unwrap();
        assert!((r.value - 2.25).abs() < 1e-12);
        assert!((r.analysis_value - 2.25f64.ln()).abs() < 1e-12);
        let z = z_critical(0.95);
        assert!((r.ci_lower - (r.analysis_value - z * r.standard_error).exp()).abs() < 1e-12);
        assert!((r.ci_upper - (r.analysis_value + z * r.standard_error).exp()).abs() < 1e-12);
        assert!((r.weight - 1.0 / r.variance()).abs() < 1e-9);
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn test_measure_data_mismatch() {
        let calc = EffectSizeCalculator::default();
        let err = calc
            .compute(&Study::binary("s1", 2, 10, 1, 10), EffectMeasure::MeanDifference)
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Input(InputError::IncompatibleMeasure { .. })
        ));
        let err = calc
            .compute(
                &Study::continuous("s2", 1.0, 1.0, 10, 0.0, 1.0, 10),
                EffectMeasure::HazardRatio,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Input(InputError::IncompatibleMeasure { .. })
        ));
    }

    #[test]
    fn test_precomputed_hazard_ratio() {
        let calc = EffectSizeCalculator::default();
        let r = calc
            .compute(&Study::precomputed("hr", 0.8, 0.1), EffectMeasure::HazardRatio)
            .unwrap();
        assert!((r.value - 0.8).abs() < 1e-12);
        assert!((r.analysis_value - 0.8f64.ln()).abs() < 1e-12);
        assert!(r.ci_lower < 0.8 && r.ci_upper > 0.8);

        let err = calc
            .compute(&Study::precomputed("hr", -0.8, 0.1), EffectMeasure::HazardRatio)
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Input(InputError::NonPositiveRatio { .. })
        ));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let calc = EffectSizeCalculator::new(EffectSizeOptions {
            confidence_level: 1.2,
            continuity_correction: 0.5,
        });
        let err = calc
            .compute(&Study::binary("s1", 2, 10, 1, 10), EffectMeasure::OddsRatio)
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Input(InputError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let calc = EffectSizeCalculator::default();
        let studies = vec![
            Study::binary("dup", 2, 10, 1, 10),
            Study::binary("dup", 3, 10, 1, 10),
        ];
        assert!(matches!(
            calc.compute_all(&studies, EffectMeasure::OddsRatio),
            Err(AnalysisError::Input(InputError::DuplicateStudyId { .. }))
        ));
    }
}
