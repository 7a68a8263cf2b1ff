//! MetaAnalysis: runs every stage over one set of studies.

use serde::{Deserialize, Serialize};
use synthex_core::config::SynthexConfig;
use synthex_core::constants;
use synthex_core::errors::{AnalysisResult, InputError};

use crate::bias::{BiasOptions, PublicationBiasAssessor, PublicationBiasResult};
use crate::effect_size::{EffectMeasure, EffectSizeCalculator, EffectSizeOptions, EffectSizeResult, Study};
use crate::forest::{ForestPlotData, ForestPlotDataBuilder};
use crate::heterogeneity::HeterogeneityResult;
use crate::pooling::{PooledResult, PoolingEngine, PoolingOptions, SensitivityAnalysis, StudyEffect};
use crate::warnings::AnalysisWarning;

/// Everything computed for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaAnalysisReport {
    pub measure: EffectMeasure,
    pub effect_sizes: Vec<EffectSizeResult>,
    pub pooled: PooledResult,
    pub heterogeneity: HeterogeneityResult,
    pub forest: ForestPlotData,
    pub publication_bias: PublicationBiasResult,
    /// Leave-one-out results; `None` below 3 studies.
    pub sensitivity: Option<SensitivityAnalysis>,
    /// Warnings from every stage, in stage order.
    pub warnings: Vec<AnalysisWarning>,
}

impl MetaAnalysisReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Stateless facade over the analysis stages.
#[derive(Debug, Clone, Default)]
pub struct MetaAnalysis {
    calculator: EffectSizeCalculator,
    pooling: PoolingEngine,
    forest: ForestPlotDataBuilder,
    bias: PublicationBiasAssessor,
}

impl MetaAnalysis {
    pub fn new(
        calculator: EffectSizeCalculator,
        pooling: PoolingEngine,
        forest: ForestPlotDataBuilder,
        bias: PublicationBiasAssessor,
    ) -> Self {
        Self {
            calculator,
            pooling,
            forest,
            bias,
        }
    }

    pub fn from_config(config: &SynthexConfig) -> Result<Self, InputError> {
        let effect_options = EffectSizeOptions::from_config(&config.analysis);
        effect_options.validate()?;
        Ok(Self {
            calculator: EffectSizeCalculator::new(effect_options),
            pooling: PoolingEngine::new(PoolingOptions::from_config(&config.analysis)?),
            forest: ForestPlotDataBuilder::from_config(&config.forest)?,
            bias: PublicationBiasAssessor::new(BiasOptions::from_config(
                &config.bias,
                config.analysis.effective_confidence_level(),
            )),
        })
    }

    /// Compute effect sizes, pool, lay out the forest plot, test for
    /// publication bias and run leave-one-out. Any input error aborts the
    /// whole run; no partial report is returned.
    pub fn run(&self, studies: &[Study], measure: EffectMeasure) -> AnalysisResult<MetaAnalysisReport> {
        let span = tracing::info_span!("meta_analysis", k = studies.len(), measure = %measure);
        let _guard = span.enter();

        let effect_sizes = self.calculator.compute_all(studies, measure)?;
        let inputs: Vec<StudyEffect> = effect_sizes
            .iter()
            .map(EffectSizeResult::to_study_effect)
            .collect();

        let pooled = self.pooling.pool(&inputs, measure)?;
        let forest = self.forest.build(&effect_sizes, &pooled)?;
        let publication_bias = self.bias.assess(&inputs, &pooled)?;

        let mut warnings: Vec<AnalysisWarning> = effect_sizes
            .iter()
            .flat_map(|e| e.warnings.iter().cloned())
            .collect();
        warnings.extend(pooled.warnings.iter().cloned());

        let sensitivity = if inputs.len() >= constants::MIN_STUDIES_SENSITIVITY {
            Some(self.pooling.leave_one_out_from(&inputs, &pooled)?)
        } else {
            warnings.push(AnalysisWarning::SensitivityOmitted {
                studies: inputs.len(),
            });
            None
        };
        warnings.extend(publication_bias.warnings.iter().cloned());

        tracing::info!(
            model = %pooled.model,
            effect = pooled.effect,
            i_squared = pooled.heterogeneity.i_squared,
            bias_detected = publication_bias.overall.bias_detected,
            warnings = warnings.len(),
            "meta-analysis complete"
        );

        Ok(MetaAnalysisReport {
            measure,
            effect_sizes,
            heterogeneity: pooled.heterogeneity.clone(),
            pooled,
            forest,
            publication_bias,
            sensitivity,
            warnings,
        })
    }
}
