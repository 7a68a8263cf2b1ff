//! Leave-one-out sensitivity analysis.

use serde::{Deserialize, Serialize};
use synthex_core::constants;
use synthex_core::errors::AnalysisResult;

use super::engine::{validate_effects, PoolingEngine};
use super::types::{PooledResult, PoolingModel, StudyEffect};
use crate::effect_size::EffectMeasure;

/// Pooled result with one study removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveOneOut {
    pub omitted_study_id: String,
    /// Pooling-scale estimate.
    pub estimate: f64,
    /// Natural-scale effect and interval.
    pub effect: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub p_value: f64,
    pub i_squared: f64,
    pub tau_squared: f64,
    /// Whether significance differs from the full analysis.
    pub significance_changed: bool,
}

/// Influence of each study on the pooled estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityAnalysis {
    /// Model held fixed across all refits (the full analysis's resolved model).
    pub model: PoolingModel,
    pub entries: Vec<LeaveOneOut>,
    /// Study whose omission moves the pooling-scale estimate the most.
    pub most_influential_study_id: Option<String>,
    pub max_shift: f64,
    pub significance_changes: usize,
}

impl PoolingEngine {
    /// Re-pool k times, omitting one study each time. Requires at least 3 studies.
    pub fn leave_one_out(
        &self,
        studies: &[StudyEffect],
        measure: EffectMeasure,
    ) -> AnalysisResult<SensitivityAnalysis> {
        validate_effects(
            studies,
            constants::MIN_STUDIES_SENSITIVITY,
            "leave-one-out analysis",
        )?;
        let full = self.pool(studies, measure)?;
        self.leave_one_out_from(studies, &full)
    }

    /// Leave-one-out against an existing full result, reusing its model.
    pub fn leave_one_out_from(
        &self,
        studies: &[StudyEffect],
        full: &PooledResult,
    ) -> AnalysisResult<SensitivityAnalysis> {
        validate_effects(
            studies,
            constants::MIN_STUDIES_SENSITIVITY,
            "leave-one-out analysis",
        )?;
        let model = full.model;
        let full_significant = full.is_significant();

        let mut entries = Vec::with_capacity(studies.len());
        for (i, omitted) in studies.iter().enumerate() {
            let subset: Vec<StudyEffect> = studies
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, s)| s.clone())
                .collect();
            let refit = self.pool_with_model(&subset, full.measure, model.into())?;
            entries.push(LeaveOneOut {
                omitted_study_id: omitted.study_id.clone(),
                estimate: refit.estimate,
                effect: refit.effect,
                ci_lower: refit.ci_lower,
                ci_upper: refit.ci_upper,
                p_value: refit.p_value,
                i_squared: refit.heterogeneity.i_squared,
                tau_squared: refit.tau_squared,
                significance_changed: refit.is_significant() != full_significant,
            });
        }

        let mut most_influential_study_id = None;
        let mut max_shift = 0.0;
        for e in &entries {
            let shift = (e.estimate - full.estimate).abs();
            if shift > max_shift {
                max_shift = shift;
                most_influential_study_id = Some(e.omitted_study_id.clone());
            }
        }
        let significance_changes = entries.iter().filter(|e| e.significance_changed).count();

        tracing::debug!(
            k = studies.len(),
            max_shift,
            significance_changes,
            "leave-one-out complete"
        );

        Ok(SensitivityAnalysis {
            model,
            entries,
            most_influential_study_id,
            max_shift,
            significance_changes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pooling::{ModelChoice, PoolingOptions};
    use synthex_core::errors::AnalysisError;

    #[test]
    fn test_outlier_is_most_influential() {
        let studies = vec![
            StudyEffect::new("a", 0.10, 0.1),
            StudyEffect::new("b", 0.12, 0.1),
            StudyEffect::new("c", 0.11, 0.1),
            StudyEffect::new("d", 0.90, 0.1),
        ];
        let engine = PoolingEngine::new(PoolingOptions::default().with_model(ModelChoice::Fixed));
        let s = engine
            .leave_one_out(&studies, EffectMeasure::MeanDifference)
            .unwrap();
        assert_eq!(s.entries.len(), 4);
        assert_eq!(s.model, PoolingModel::Fixed);
        assert_eq!(s.most_influential_study_id.as_deref(), Some("d"));
        // Without d: mean of 0.10, 0.12, 0.11.
        assert!((s.entries[3].estimate - 0.11).abs() < 1e-12);
    }

    #[test]
    fn test_requires_three_studies() {
        let studies = vec![StudyEffect::new("a", 0.1, 0.1), StudyEffect::new("b", 0.2, 0.1)];
        let err = PoolingEngine::default()
            .leave_one_out(&studies, EffectMeasure::MeanDifference)
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientStudies { required: 3, found: 2, .. }
        ));
    }
}
