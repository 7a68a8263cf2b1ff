//! Forest-plot layout configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for forest-plot layout derivation.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ForestConfig {
    /// Row ordering policy. Default: "original".
    pub order: Option<String>,
    /// Approximate number of x-axis ticks. Default: 5.
    pub target_ticks: Option<usize>,
}

impl ForestConfig {
    pub fn effective_order(&self) -> &str {
        self.order.as_deref().unwrap_or(constants::DEFAULT_FOREST_ORDER)
    }

    pub fn effective_target_ticks(&self) -> usize {
        self.target_ticks.unwrap_or(constants::DEFAULT_TARGET_TICKS)
    }
}
