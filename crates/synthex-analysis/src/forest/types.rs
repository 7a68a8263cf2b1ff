//! Core types for forest-plot layout.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use synthex_core::errors::InputError;

use crate::effect_size::EffectMeasure;
use crate::heterogeneity::PredictionInterval;
use crate::pooling::PoolingModel;

/// Row ordering policy. Ties keep insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyOrder {
    #[default]
    Original,
    /// Ascending year; studies without a year last.
    ByYear,
    /// Descending weight.
    ByWeight,
    /// Ascending effect.
    ByEffect,
    /// Case-insensitive label order.
    Alphabetical,
}

impl StudyOrder {
    pub const ALL: [StudyOrder; 5] = [
        Self::Original,
        Self::ByYear,
        Self::ByWeight,
        Self::ByEffect,
        Self::Alphabetical,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::ByYear => "by_year",
            Self::ByWeight => "by_weight",
            Self::ByEffect => "by_effect",
            Self::Alphabetical => "alphabetical",
        }
    }
}

impl fmt::Display for StudyOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StudyOrder {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|o| o.name() == normalized)
            .ok_or_else(|| InputError::InvalidOption {
                field: "order".to_string(),
                message: format!("unknown forest ordering '{normalized}'"),
            })
    }
}

/// X-axis scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisScale {
    Linear,
    Log,
}

impl AxisScale {
    /// Log for ratio measures, linear for differences.
    pub fn for_measure(measure: EffectMeasure) -> Self {
        if measure.is_ratio() {
            Self::Log
        } else {
            Self::Linear
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Log => "log",
        }
    }
}

impl fmt::Display for AxisScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One study row. Values are natural scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestRow {
    pub study_id: String,
    pub label: String,
    pub year: Option<i32>,
    pub effect: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub weight_pct: f64,
    pub y_position: usize,
}

/// The pooled diamond. Values are copied from the pooled result unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PooledRow {
    pub label: String,
    pub model: PoolingModel,
    pub effect: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub weight_pct: f64,
    pub y_position: usize,
    pub prediction_interval: Option<PredictionInterval>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XAxis {
    pub scale: AxisScale,
    /// Position of the line of no effect (1 for ratios, 0 for differences).
    pub null_value: f64,
    pub min: f64,
    pub max: f64,
    pub ticks: Vec<f64>,
    pub label: String,
}

/// Vertical layout, counted in rows from the bottom (0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YAxis {
    /// Total rows: studies, pooled row, separator and header.
    pub height: usize,
    pub order: StudyOrder,
    pub pooled_position: usize,
    pub separator_position: usize,
    pub header_position: usize,
}

/// Complete layout for one forest plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestPlotData {
    pub measure: EffectMeasure,
    pub rows: Vec<ForestRow>,
    pub pooled_row: PooledRow,
    pub x_axis: XAxis,
    pub y_axis: YAxis,
    /// Heterogeneity annotation, e.g. `I² = 12.3%, τ² = 0.0040, p = 0.340`.
    pub heterogeneity_label: String,
}

impl ForestPlotData {
    /// Study rows plus the pooled row.
    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }

    pub fn row(&self, study_id: &str) -> Option<&ForestRow> {
        self.rows.iter().find(|r| r.study_id == study_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_names_parse() {
        for order in StudyOrder::ALL {
            assert_eq!(order.name().parse::<StudyOrder>().unwrap(), order);
        }
        assert_eq!(" BY_YEAR ".parse::<StudyOrder>().unwrap(), StudyOrder::ByYear);
        assert!("random".parse::<StudyOrder>().is_err());
    }

    #[test]
    fn test_scale_for_measure() {
        assert_eq!(AxisScale::for_measure(EffectMeasure::OddsRatio), AxisScale::Log);
        assert_eq!(AxisScale::for_measure(EffectMeasure::HazardRatio), AxisScale::Log);
        assert_eq!(AxisScale::for_measure(EffectMeasure::RiskDifference), AxisScale::Linear);
        assert_eq!(AxisScale::for_measure(EffectMeasure::HedgesG), AxisScale::Linear);
    }
}
