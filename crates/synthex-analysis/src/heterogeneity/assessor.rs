//! HeterogeneityAssessor: Q, I², H², τ² and prediction interval.

use synthex_core::constants;
use synthex_core::errors::AnalysisResult;

use super::types::{HeterogeneityLevel, HeterogeneityResult, PredictionInterval};
use crate::effect_size::EffectMeasure;
use crate::pooling::engine::validate_effects;
use crate::pooling::types::{PoolingModel, StudyEffect};
use crate::stats::{chi_squared_sf, inverse_variance, t_critical, InverseVarianceSummary};
use crate::warnings::AnalysisWarning;

/// I² above which random effects is recommended.
pub const RANDOM_EFFECTS_I_SQUARED: f64 = 50.0;

/// DerSimonian–Laird moment estimate and the fixed-effect fit it is built on.
#[derive(Debug, Clone, PartialEq)]
pub struct DerSimonianLaird {
    /// Q = Σw_i(y_i − ȳ_fixed)².
    pub q: f64,
    pub df: usize,
    /// C = Σw_i − Σw_i²/Σw_i.
    pub c: f64,
    /// τ² = max(0, (Q − df)/C).
    pub tau_squared: f64,
    pub fixed: InverseVarianceSummary,
}

/// Compute Q and the DerSimonian–Laird τ².
///
/// `estimates` and `variances` are on the pooling scale; at least one study.
pub fn dersimonian_laird(estimates: &[f64], variances: &[f64]) -> DerSimonianLaird {
    let fixed = inverse_variance(estimates, variances, 0.0);
    let q: f64 = fixed
        .weights
        .iter()
        .zip(estimates)
        .map(|(w, y)| w * (y - fixed.estimate).powi(2))
        .sum();
    let df = estimates.len().saturating_sub(1);

    let sum_w2: f64 = fixed.weights.iter().map(|w| w * w).sum();
    let c = fixed.sum_weights - sum_w2 / fixed.sum_weights;
    let tau_squared = if c > 0.0 && c.is_finite() {
        ((q - df as f64) / c).max(0.0)
    } else {
        0.0
    };

    DerSimonianLaird {
        q,
        df,
        c,
        tau_squared,
        fixed,
    }
}

/// I² = max(0, (Q − df)/Q)·100, bounded to [0, 100].
pub fn i_squared(q: f64, df: usize) -> f64 {
    if !(q > 0.0) || !q.is_finite() {
        return 0.0;
    }
    ((q - df as f64) / q * 100.0).clamp(0.0, 100.0)
}

/// Stateless heterogeneity assessor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeterogeneityAssessor {
    confidence_level: f64,
}

impl Default for HeterogeneityAssessor {
    fn default() -> Self {
        Self::new(constants::DEFAULT_CONFIDENCE_LEVEL)
    }
}

impl HeterogeneityAssessor {
    pub fn new(confidence_level: f64) -> Self {
        Self { confidence_level }
    }

    /// Assess heterogeneity across at least 2 studies.
    ///
    /// With fewer than 3 studies the Q p-value and the prediction interval
    /// are omitted and warnings attached instead.
    pub fn assess(
        &self,
        studies: &[StudyEffect],
        measure: EffectMeasure,
    ) -> AnalysisResult<HeterogeneityResult> {
        validate_effects(
            studies,
            constants::MIN_STUDIES_POOLING,
            "heterogeneity assessment",
        )?;
        let k = studies.len();
        let estimates: Vec<f64> = studies.iter().map(|s| s.estimate).collect();
        let variances: Vec<f64> = studies.iter().map(StudyEffect::variance).collect();

        let dl = dersimonian_laird(&estimates, &variances);
        let i2 = i_squared(dl.q, dl.df);
        let h_squared = if dl.df > 0 { dl.q / dl.df as f64 } else { 0.0 };

        let mut warnings = Vec::new();
        let p_value = if k >= constants::MIN_STUDIES_HETEROGENEITY_TEST {
            Some(chi_squared_sf(dl.q, dl.df as f64))
        } else {
            tracing::warn!(k, "heterogeneity test omitted: fewer than 3 studies");
            warnings.push(AnalysisWarning::HeterogeneityTestOmitted { studies: k });
            None
        };

        let prediction_interval = if k >= constants::MIN_STUDIES_HETEROGENEITY_TEST {
            self.prediction_interval(&estimates, &variances, dl.tau_squared, measure)
        } else {
            warnings.push(AnalysisWarning::PredictionIntervalOmitted { studies: k });
            None
        };

        let recommended_model = if i2 > RANDOM_EFFECTS_I_SQUARED {
            PoolingModel::Random
        } else {
            PoolingModel::Fixed
        };

        tracing::debug!(
            k,
            q = dl.q,
            i_squared = i2,
            tau_squared = dl.tau_squared,
            "assessed heterogeneity"
        );

        Ok(HeterogeneityResult {
            k,
            q: dl.q,
            df: dl.df,
            p_value,
            i_squared: i2,
            tau_squared: dl.tau_squared,
            h_squared,
            prediction_interval,
            level: HeterogeneityLevel::from_i_squared(i2),
            recommended_model,
            warnings,
        })
    }

    /// pooled_re ± t_{k−2}·√(τ² + SE_re²), back-transformed to the natural scale.
    fn prediction_interval(
        &self,
        estimates: &[f64],
        variances: &[f64],
        tau_squared: f64,
        measure: EffectMeasure,
    ) -> Option<PredictionInterval> {
        let df = estimates.len().checked_sub(2)?;
        let random = inverse_variance(estimates, variances, tau_squared);
        let t = t_critical(self.confidence_level, df as f64);
        let half_width = t * (tau_squared + random.standard_error.powi(2)).sqrt();
        if !half_width.is_finite() {
            return None;
        }
        Some(PredictionInterval {
            lower: measure.from_analysis_scale(random.estimate - half_width),
            upper: measure.from_analysis_scale(random.estimate + half_width),
            t_critical: t,
            df,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effects(pairs: &[(f64, f64)]) -> Vec<StudyEffect> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, &(y, se))| StudyEffect::new(format!("s{i}"), y, se))
            .collect()
    }

    #[test]
    fn test_identical_effects_have_no_heterogeneity() {
        let studies = effects(&[(0.3, 0.1), (0.3, 0.2), (0.3, 0.15), (0.3, 0.12)]);
        let h = HeterogeneityAssessor::default()
            .assess(&studies, EffectMeasure::MeanDifference)
            .unwrap();
        assert!(h.q < 1e-20);
        assert_eq!(h.i_squared, 0.0);
        assert_eq!(h.tau_squared, 0.0);
        assert_eq!(h.level, HeterogeneityLevel::Low);
        assert_eq!(h.recommended_model, PoolingModel::Fixed);
        assert!(h.p_value.unwrap() > 0.99);
    }

    #[test]
    fn test_dersimonian_laird_hand_computed() {
        // Equal variances 0.01 → w = 100 each; ȳ = 0.5;
        // Q = 100·(0.25 + 0 + 0.25) = 50; C = 300 − 30000/300 = 200;
        // τ² = (50 − 2)/200 = 0.24.
        let dl = dersimonian_laird(&[0.0, 0.5, 1.0], &[0.01, 0.01, 0.01]);
        assert!((dl.fixed.estimate - 0.5).abs() < 1e-12);
        assert!((dl.q - 50.0).abs() < 1e-9);
        assert!((dl.c - 200.0).abs() < 1e-9);
        assert!((dl.tau_squared - 0.24).abs() < 1e-12);
        assert!((i_squared(dl.q, dl.df) - 96.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_studies_omit_test_and_interval() {
        let studies = effects(&[(0.1, 0.1), (0.4, 0.1)]);
        let h = HeterogeneityAssessor::default()
            .assess(&studies, EffectMeasure::MeanDifference)
            .unwrap();
        assert!(h.p_value.is_none());
        assert!(h.prediction_interval.is_none());
        assert!(h
            .warnings
            .contains(&AnalysisWarning::HeterogeneityTestOmitted { studies: 2 }));
        assert!(h
            .warnings
            .contains(&AnalysisWarning::PredictionIntervalOmitted { studies: 2 }));
    }

    #[test]
    fn test_prediction_interval_wider_than_spread() {
        let studies = effects(&[(0.0, 0.1), (0.5, 0.1), (1.0, 0.1), (0.2, 0.1), (0.8, 0.1)]);
        let h = HeterogeneityAssessor::default()
            .assess(&studies, EffectMeasure::MeanDifference)
            .unwrap();
        let pi = h.prediction_interval.unwrap();
        assert_eq!(pi.df, 3);
        assert!(pi.lower < 0.0 && pi.upper > 1.0);
        assert!((h.h_squared - h.q / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_study_rejected() {
        let studies = effects(&[(0.1, 0.1)]);
        assert!(HeterogeneityAssessor::default()
            .assess(&studies, EffectMeasure::MeanDifference)
            .is_err());
    }
}
