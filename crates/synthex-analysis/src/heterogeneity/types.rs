//! Core types for heterogeneity assessment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pooling::types::PoolingModel;
use crate::warnings::AnalysisWarning;

/// Interpretation band for I².
///
/// Bands follow the Cochrane Handbook's intentionally overlapping ranges:
/// 0–40 low, 30–60 moderate, 50–90 substantial, 75–100 considerable.
/// `from_i_squared` resolves an overlap to the higher band;
/// `matching_bands` reports every band that contains the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeterogeneityLevel {
    Low,
    Moderate,
    Substantial,
    Considerable,
}

impl HeterogeneityLevel {
    pub const ALL: [HeterogeneityLevel; 4] = [
        Self::Low,
        Self::Moderate,
        Self::Substantial,
        Self::Considerable,
    ];

    /// Inclusive I² range of the band, in percent.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Low => (0.0, 40.0),
            Self::Moderate => (30.0, 60.0),
            Self::Substantial => (50.0, 90.0),
            Self::Considerable => (75.0, 100.0),
        }
    }

    /// Canonical band: the highest band whose range contains `i_squared`.
    pub fn from_i_squared(i_squared: f64) -> Self {
        if i_squared >= 75.0 {
            Self::Considerable
        } else if i_squared >= 50.0 {
            Self::Substantial
        } else if i_squared >= 30.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Every band whose range contains `i_squared`.
    pub fn matching_bands(i_squared: f64) -> Vec<Self> {
        Self::ALL
            .iter()
            .copied()
            .filter(|band| {
                let (lo, hi) = band.range();
                i_squared >= lo && i_squared <= hi
            })
            .collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::Substantial => "substantial",
            Self::Considerable => "considerable",
        }
    }
}

impl fmt::Display for HeterogeneityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Range in which the true effect of a new study is expected to lie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionInterval {
    /// Natural-scale bounds.
    pub lower: f64,
    pub upper: f64,
    /// Student-t critical value with k − 2 degrees of freedom.
    pub t_critical: f64,
    pub df: usize,
}

/// Between-study variability summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeterogeneityResult {
    pub k: usize,
    /// Cochran's Q.
    pub q: f64,
    pub df: usize,
    /// Chi-square upper-tail p-value of Q; omitted below 3 studies.
    pub p_value: Option<f64>,
    /// I² in percent, within [0, 100].
    pub i_squared: f64,
    /// DerSimonian–Laird τ², ≥ 0.
    pub tau_squared: f64,
    /// Q / df.
    pub h_squared: f64,
    pub prediction_interval: Option<PredictionInterval>,
    pub level: HeterogeneityLevel,
    /// Random if I² > 50, otherwise fixed.
    pub recommended_model: PoolingModel,
    pub warnings: Vec<AnalysisWarning>,
}

impl HeterogeneityResult {
    /// One-line summary for plot annotations, e.g. `I² = 12.3%, τ² = 0.0040, p = 0.340`.
    pub fn summary_label(&self) -> String {
        match self.p_value {
            Some(p) => format!(
                "I\u{b2} = {:.1}%, \u{3c4}\u{b2} = {:.4}, p = {:.3}",
                self.i_squared, self.tau_squared, p
            ),
            None => format!(
                "I\u{b2} = {:.1}%, \u{3c4}\u{b2} = {:.4}",
                self.i_squared, self.tau_squared
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_band_takes_higher_on_overlap() {
        assert_eq!(HeterogeneityLevel::from_i_squared(0.0), HeterogeneityLevel::Low);
        assert_eq!(HeterogeneityLevel::from_i_squared(29.9), HeterogeneityLevel::Low);
        assert_eq!(HeterogeneityLevel::from_i_squared(35.0), HeterogeneityLevel::Moderate);
        assert_eq!(HeterogeneityLevel::from_i_squared(55.0), HeterogeneityLevel::Substantial);
        assert_eq!(HeterogeneityLevel::from_i_squared(80.0), HeterogeneityLevel::Considerable);
        assert_eq!(HeterogeneityLevel::from_i_squared(100.0), HeterogeneityLevel::Considerable);
    }

    #[test]
    fn test_matching_bands_overlap() {
        assert_eq!(
            HeterogeneityLevel::matching_bands(35.0),
            vec![HeterogeneityLevel::Low, HeterogeneityLevel::Moderate]
        );
        assert_eq!(
            HeterogeneityLevel::matching_bands(80.0),
            vec![HeterogeneityLevel::Substantial, HeterogeneityLevel::Considerable]
        );
        assert_eq!(
            HeterogeneityLevel::matching_bands(45.0),
            vec![HeterogeneityLevel::Moderate]
        );
    }
}
