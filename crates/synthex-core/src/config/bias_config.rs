//! Publication-bias configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for publication-bias diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct BiasConfig {
    /// Study count below which tests are marked low-power. Default: 10.
    pub min_studies: Option<usize>,
    /// Both tests below this p-value flag asymmetry. Default: 0.10.
    pub screening_alpha: Option<f64>,
    /// One test below this p-value is strong evidence. Default: 0.01.
    pub strong_alpha: Option<f64>,
}

impl BiasConfig {
    pub fn effective_min_studies(&self) -> usize {
        self.min_studies.unwrap_or(constants::DEFAULT_BIAS_MIN_STUDIES)
    }

    pub fn effective_screening_alpha(&self) -> f64 {
        self.screening_alpha
            .unwrap_or(constants::DEFAULT_BIAS_SCREENING_ALPHA)
    }

    pub fn effective_strong_alpha(&self) -> f64 {
        self.strong_alpha
            .unwrap_or(constants::DEFAULT_BIAS_STRONG_ALPHA)
    }
}
