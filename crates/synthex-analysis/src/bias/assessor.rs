//! PublicationBiasAssessor: runs both tests and combines them.

use synthex_core::config::BiasConfig;
use synthex_core::constants;
use synthex_core::errors::{AnalysisResult, InputError};

use super::begg::begg_test;
use super::egger::egger_test;
use super::funnel::funnel_data;
use super::types::{AsymmetryDirection, BeggTest, BiasAssessment, EggerTest, PublicationBiasResult};
use crate::pooling::engine::validate_effects;
use crate::pooling::{PooledResult, StudyEffect};
use crate::warnings::AnalysisWarning;

/// Thresholds for the overall assessment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiasOptions {
    /// Below this study count results are marked low-power.
    pub min_studies: usize,
    /// Both tests below this p-value flag asymmetry.
    pub screening_alpha: f64,
    /// One test below this p-value flags asymmetry if the other agrees in sign.
    pub strong_alpha: f64,
    /// Level of the funnel pseudo-confidence limits.
    pub confidence_level: f64,
}

impl Default for BiasOptions {
    fn default() -> Self {
        Self {
            min_studies: constants::DEFAULT_BIAS_MIN_STUDIES,
            screening_alpha: constants::DEFAULT_BIAS_SCREENING_ALPHA,
            strong_alpha: constants::DEFAULT_BIAS_STRONG_ALPHA,
            confidence_level: constants::DEFAULT_CONFIDENCE_LEVEL,
        }
    }
}

impl BiasOptions {
    pub fn from_config(config: &BiasConfig, confidence_level: f64) -> Self {
        Self {
            min_studies: config.effective_min_studies(),
            screening_alpha: config.effective_screening_alpha(),
            strong_alpha: config.effective_strong_alpha(),
            confidence_level,
        }
    }

    fn validate(&self) -> Result<(), InputError> {
        let in_unit = |v: f64| v > 0.0 && v < 1.0;
        if !in_unit(self.screening_alpha) || !in_unit(self.strong_alpha) {
            return Err(InputError::InvalidOption {
                field: "bias".to_string(),
                message: format!(
                    "alphas must be in (0, 1), got screening {} and strong {}",
                    self.screening_alpha, self.strong_alpha
                ),
            });
        }
        if self.strong_alpha > self.screening_alpha {
            return Err(InputError::InvalidOption {
                field: "bias.strong_alpha".to_string(),
                message: format!(
                    "must not exceed screening_alpha ({}), got {}",
                    self.screening_alpha, self.strong_alpha
                ),
            });
        }
        Ok(())
    }
}

/// Stateless publication-bias assessor.
#[derive(Debug, Clone, Default)]
pub struct PublicationBiasAssessor {
    options: BiasOptions,
}

impl PublicationBiasAssessor {
    pub fn new(options: BiasOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BiasOptions {
        &self.options
    }

    /// Run Egger's and Begg's tests, build funnel data and judge asymmetry.
    ///
    /// `pooled` supplies the funnel reference line; `studies` are the same
    /// pooling-scale inputs it was computed from.
    pub fn assess(
        &self,
        studies: &[StudyEffect],
        pooled: &PooledResult,
    ) -> AnalysisResult<PublicationBiasResult> {
        self.options.validate()?;
        validate_effects(
            studies,
            constants::MIN_STUDIES_POOLING,
            "publication bias assessment",
        )?;
        let k = studies.len();
        let mut warnings = Vec::new();

        let low_power = k < self.options.min_studies;
        if low_power {
            tracing::warn!(k, recommended = self.options.min_studies, "bias tests have low power");
            warnings.push(AnalysisWarning::LowPower {
                studies: k,
                recommended: self.options.min_studies,
            });
        }

        let egger = match egger_test(studies) {
            Ok(test) => Some(test),
            Err(reason) => {
                warnings.push(AnalysisWarning::BiasTestUnavailable {
                    test: "egger".to_string(),
                    reason: reason.to_string(),
                });
                None
            }
        };
        let begg = match begg_test(studies) {
            Ok(test) => Some(test),
            Err(reason) => {
                warnings.push(AnalysisWarning::BiasTestUnavailable {
                    test: "begg".to_string(),
                    reason: reason.to_string(),
                });
                None
            }
        };

        let overall = self.judge(k, egger.as_ref(), begg.as_ref(), low_power);
        let funnel = funnel_data(
            studies,
            pooled,
            self.options.confidence_level,
            constants::FUNNEL_LIMIT_POINTS,
        );

        tracing::debug!(
            k,
            egger_p = egger.as_ref().map(|e| e.p_value),
            begg_p = begg.as_ref().map(|b| b.p_value),
            bias_detected = overall.bias_detected,
            "assessed publication bias"
        );

        Ok(PublicationBiasResult {
            k,
            egger,
            begg,
            funnel,
            overall,
            warnings,
        })
    }

    /// Flag bias only when both tests reach the screening level, or one is
    /// strongly significant and the other points the same way.
    fn judge(
        &self,
        k: usize,
        egger: Option<&EggerTest>,
        begg: Option<&BeggTest>,
        low_power: bool,
    ) -> BiasAssessment {
        let screen = self.options.screening_alpha;
        let strong = self.options.strong_alpha;

        let (bias_detected, agreement, rationale) = match (egger, begg) {
            (Some(e), Some(b)) => {
                let e_dir = AsymmetryDirection::from_sign(e.intercept);
                let b_dir = AsymmetryDirection::from_sign(b.tau);
                let same_direction = e_dir.is_some() && e_dir == b_dir;
                let e_sig = e.p_value < screen;
                let b_sig = b.p_value < screen;

                if e_sig && b_sig {
                    (
                        true,
                        Some(true),
                        format!(
                            "both tests significant (Egger p = {:.4}, Begg p = {:.4})",
                            e.p_value, b.p_value
                        ),
                    )
                } else if (e.p_value < strong || b.p_value < strong) && same_direction {
                    (
                        true,
                        Some(false),
                        format!(
                            "one test strongly significant with the other directionally supportive (Egger p = {:.4}, Begg p = {:.4})",
                            e.p_value, b.p_value
                        ),
                    )
                } else if e_sig || b_sig {
                    (
                        false,
                        Some(false),
                        format!(
                            "tests disagree (Egger p = {:.4}, Begg p = {:.4})",
                            e.p_value, b.p_value
                        ),
                    )
                } else {
                    (
                        false,
                        Some(true),
                        format!(
                            "no asymmetry detected (Egger p = {:.4}, Begg p = {:.4})",
                            e.p_value, b.p_value
                        ),
                    )
                }
            }
            (Some(e), None) => (
                false,
                None,
                format!("only Egger's test available (p = {:.4})", e.p_value),
            ),
            (None, Some(b)) => (
                false,
                None,
                format!("only Begg's test available (p = {:.4})", b.p_value),
            ),
            (None, None) => (false, None, "no test could be computed".to_string()),
        };

        let direction = if bias_detected {
            egger
                .and_then(|e| AsymmetryDirection::from_sign(e.intercept))
                .or_else(|| begg.and_then(|b| AsymmetryDirection::from_sign(b.tau)))
        } else {
            None
        };

        BiasAssessment {
            bias_detected,
            confidence: self.confidence(k, agreement),
            direction,
            low_power,
            rationale,
        }
    }

    /// Grows with study count, rises when the tests agree, falls otherwise.
    fn confidence(&self, k: usize, agreement: Option<bool>) -> f64 {
        let min = self.options.min_studies;
        let base: f64 = if k < min {
            0.3
        } else if k < 2 * min {
            0.5
        } else {
            0.6
        };
        let adjustment = match agreement {
            Some(true) => 0.15,
            Some(false) | None => -0.1,
        };
        (base + adjustment).clamp(0.1, 0.9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn egger(intercept: f64, p_value: f64) -> EggerTest {
        EggerTest {
            intercept,
            standard_error: 1.0,
            slope: 0.0,
            t: intercept,
            df: 10,
            p_value,
        }
    }

    fn begg(tau: f64, p_value: f64) -> BeggTest {
        BeggTest {
            tau,
            s: 0.0,
            variance_s: 1.0,
            z: 0.0,
            p_value,
        }
    }

    #[test]
    fn test_both_significant_flags_bias() {
        let a = PublicationBiasAssessor::default();
        let j = a.judge(12, Some(&egger(1.5, 0.04)), Some(&begg(0.4, 0.08)), false);
        assert!(j.bias_detected);
        assert_eq!(j.direction, Some(AsymmetryDirection::SmallStudiesLarger));
        assert!((j.confidence - 0.65).abs() < 1e-12);
    }

    #[test]
    fn test_single_strong_test_needs_supportive_direction() {
        let a = PublicationBiasAssessor::default();
        let supported = a.judge(12, Some(&egger(-2.0, 0.005)), Some(&begg(-0.2, 0.3)), false);
        assert!(supported.bias_detected);
        assert_eq!(supported.direction, Some(AsymmetryDirection::SmallStudiesSmaller));

        let opposed = a.judge(12, Some(&egger(-2.0, 0.005)), Some(&begg(0.2, 0.3)), false);
        assert!(!opposed.bias_detected);
        assert!(opposed.direction.is_none());
    }

    #[test]
    fn test_one_screening_hit_is_not_enough() {
        let a = PublicationBiasAssessor::default();
        let j = a.judge(12, Some(&egger(1.0, 0.05)), Some(&begg(0.3, 0.4)), false);
        assert!(!j.bias_detected);
    }

    #[test]
    fn test_confidence_scales_with_study_count() {
        let a = PublicationBiasAssessor::default();
        assert!((a.confidence(5, Some(true)) - 0.45).abs() < 1e-12);
        assert!((a.confidence(15, Some(true)) - 0.65).abs() < 1e-12);
        assert!((a.confidence(25, Some(true)) - 0.75).abs() < 1e-12);
        assert!((a.confidence(25, None) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_alphas_rejected() {
        let a = PublicationBiasAssessor::new(BiasOptions {
            strong_alpha: 0.2,
            ..BiasOptions::default()
        });
        assert!(a.options.validate().is_err());
    }
}
