//! Effect-size and pooling configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for effect-size computation and pooling.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Confidence level for study and pooled intervals. Default: 0.95.
    pub confidence_level: Option<f64>,
    /// Added to every 2×2 cell when any cell is zero; 0 disables. Default: 0.5.
    pub continuity_correction: Option<f64>,
    /// Pooling model: "fixed", "random" or "auto". Default: "auto".
    pub model: Option<String>,
    /// Auto selection I² threshold (percent). Default: 50.
    pub auto_i_squared_threshold: Option<f64>,
    /// Auto selection Q p-value threshold. Default: 0.10.
    pub auto_q_p_threshold: Option<f64>,
}

impl AnalysisConfig {
    pub fn effective_confidence_level(&self) -> f64 {
        self.confidence_level
            .unwrap_or(constants::DEFAULT_CONFIDENCE_LEVEL)
    }

    pub fn effective_continuity_correction(&self) -> f64 {
        self.continuity_correction
            .unwrap_or(constants::DEFAULT_CONTINUITY_CORRECTION)
    }

    pub fn effective_model(&self) -> &str {
        self.model.as_deref().unwrap_or(constants::DEFAULT_MODEL)
    }

    pub fn effective_auto_i_squared_threshold(&self) -> f64 {
        self.auto_i_squared_threshold
            .unwrap_or(constants::DEFAULT_AUTO_I_SQUARED_THRESHOLD)
    }

    pub fn effective_auto_q_p_threshold(&self) -> f64 {
        self.auto_q_p_threshold
            .unwrap_or(constants::DEFAULT_AUTO_Q_P_THRESHOLD)
    }
}
