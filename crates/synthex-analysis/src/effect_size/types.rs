//! Core types for effect-size computation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use synthex_core::errors::InputError;

use crate::pooling::types::StudyEffect;
use crate::warnings::AnalysisWarning;

/// Kind of raw data a study supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    Binary,
    Continuous,
    Precomputed,
}

impl DataKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Continuous => "continuous",
            Self::Precomputed => "precomputed",
        }
    }
}

/// Static description of an effect measure.
#[derive(Debug)]
pub struct MeasureInfo {
    pub abbreviation: &'static str,
    pub name: &'static str,
    /// Pooled on the natural-log scale.
    pub ratio: bool,
    /// Raw data the measure can be computed from (precomputed always works).
    pub source: Option<DataKind>,
}

const ODDS_RATIO: MeasureInfo = MeasureInfo {
    abbreviation: "OR",
    name: "Odds Ratio",
    ratio: true,
    source: Some(DataKind::Binary),
};
const RISK_RATIO: MeasureInfo = MeasureInfo {
    abbreviation: "RR",
    name: "Risk Ratio",
    ratio: true,
    source: Some(DataKind::Binary),
};
const RISK_DIFFERENCE: MeasureInfo = MeasureInfo {
    abbreviation: "RD",
    name: "Risk Difference",
    ratio: false,
    source: Some(DataKind::Binary),
};
const HAZARD_RATIO: MeasureInfo = MeasureInfo {
    abbreviation: "HR",
    name: "Hazard Ratio",
    ratio: true,
    source: None,
};
const MEAN_DIFFERENCE: MeasureInfo = MeasureInfo {
    abbreviation: "MD",
    name: "Mean Difference",
    ratio: false,
    source: Some(DataKind::Continuous),
};
const STANDARDIZED_MEAN_DIFFERENCE: MeasureInfo = MeasureInfo {
    abbreviation: "SMD",
    name: "Standardized Mean Difference",
    ratio: false,
    source: Some(DataKind::Continuous),
};
const HEDGES_G: MeasureInfo = MeasureInfo {
    abbreviation: "g",
    name: "Hedges' g",
    ratio: false,
    source: Some(DataKind::Continuous),
};

/// Effect measure, dispatched through a per-variant formula table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectMeasure {
    OddsRatio,
    RiskRatio,
    RiskDifference,
    HazardRatio,
    MeanDifference,
    /// Cohen's d.
    StandardizedMeanDifference,
    HedgesG,
}

impl EffectMeasure {
    pub const ALL: [EffectMeasure; 7] = [
        Self::OddsRatio,
        Self::RiskRatio,
        Self::RiskDifference,
        Self::HazardRatio,
        Self::MeanDifference,
        Self::StandardizedMeanDifference,
        Self::HedgesG,
    ];

    pub fn info(&self) -> &'static MeasureInfo {
        match self {
            Self::OddsRatio => &ODDS_RATIO,
            Self::RiskRatio => &RISK_RATIO,
            Self::RiskDifference => &RISK_DIFFERENCE,
            Self::HazardRatio => &HAZARD_RATIO,
            Self::MeanDifference => &MEAN_DIFFERENCE,
            Self::StandardizedMeanDifference => &STANDARDIZED_MEAN_DIFFERENCE,
            Self::HedgesG => &HEDGES_G,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        self.info().abbreviation
    }

    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// OR, RR and HR are ratios; everything else is a difference.
    pub fn is_ratio(&self) -> bool {
        self.info().ratio
    }

    /// Value of "no effect": 1 for ratios, 0 for differences.
    pub fn null_value(&self) -> f64 {
        if self.is_ratio() {
            1.0
        } else {
            0.0
        }
    }

    /// Natural scale → pooling scale (ln for ratios).
    pub fn to_analysis_scale(&self, value: f64) -> f64 {
        if self.is_ratio() {
            value.ln()
        } else {
            value
        }
    }

    /// Pooling scale → natural scale (exp for ratios).
    pub fn from_analysis_scale(&self, estimate: f64) -> f64 {
        if self.is_ratio() {
            estimate.exp()
        } else {
            estimate
        }
    }

    /// Whether the measure can be computed from `kind` data.
    pub fn accepts(&self, kind: DataKind) -> bool {
        kind == DataKind::Precomputed || self.info().source == Some(kind)
    }
}

impl fmt::Display for EffectMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for EffectMeasure {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "or" | "odds_ratio" => Ok(Self::OddsRatio),
            "rr" | "risk_ratio" => Ok(Self::RiskRatio),
            "rd" | "risk_difference" => Ok(Self::RiskDifference),
            "hr" | "hazard_ratio" => Ok(Self::HazardRatio),
            "md" | "mean_difference" => Ok(Self::MeanDifference),
            "smd" | "standardized_mean_difference" | "cohens_d" => {
                Ok(Self::StandardizedMeanDifference)
            }
            "g" | "hedges_g" => Ok(Self::HedgesG),
            other => Err(InputError::InvalidOption {
                field: "measure".to_string(),
                message: format!("unknown effect measure '{other}'"),
            }),
        }
    }
}

/// 2×2 table counts: events and totals per arm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinaryCounts {
    pub events_t: i64,
    pub n_t: i64,
    pub events_c: i64,
    pub n_c: i64,
}

/// Group means, standard deviations and sizes per arm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousSummary {
    pub mean_t: f64,
    pub sd_t: f64,
    pub n_t: i64,
    pub mean_c: f64,
    pub sd_c: f64,
    pub n_c: i64,
}

/// An effect size reported by the study itself.
///
/// Ratio measures give `effect_size` on the natural scale (e.g. HR 0.8)
/// and `standard_error` on the log scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrecomputedEffect {
    pub effect_size: f64,
    pub standard_error: f64,
}

/// Raw study data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StudyData {
    Binary(BinaryCounts),
    Continuous(ContinuousSummary),
    Precomputed(PrecomputedEffect),
}

impl StudyData {
    pub fn kind(&self) -> DataKind {
        match self {
            Self::Binary(_) => DataKind::Binary,
            Self::Continuous(_) => DataKind::Continuous,
            Self::Precomputed(_) => DataKind::Precomputed,
        }
    }
}

/// One study as supplied by the extraction layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Study {
    pub study_id: String,
    /// Display label; defaults to `study_id`.
    #[serde(default)]
    pub label: Option<String>,
    /// Publication year, used for chronological ordering.
    #[serde(default)]
    pub year: Option<i32>,
    pub data: StudyData,
}

impl Study {
    pub fn binary(study_id: impl Into<String>, events_t: i64, n_t: i64, events_c: i64, n_c: i64) -> Self {
        Self {
            study_id: study_id.into(),
            label: None,
            year: None,
            data: StudyData::Binary(BinaryCounts {
                events_t,
                n_t,
                events_c,
                n_c,
            }),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn continuous(
        study_id: impl Into<String>,
        mean_t: f64,
        sd_t: f64,
        n_t: i64,
        mean_c: f64,
        sd_c: f64,
        n_c: i64,
    ) -> Self {
        Self {
            study_id: study_id.into(),
            label: None,
            year: None,
            data: StudyData::Continuous(ContinuousSummary {
                mean_t,
                sd_t,
                n_t,
                mean_c,
                sd_c,
                n_c,
            }),
        }
    }

    pub fn precomputed(study_id: impl Into<String>, effect_size: f64, standard_error: f64) -> Self {
        Self {
            study_id: study_id.into(),
            label: None,
            year: None,
            data: StudyData::Precomputed(PrecomputedEffect {
                effect_size,
                standard_error,
            }),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Label for display, falling back to the id.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.study_id)
    }
}

/// Per-study effect size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSizeResult {
    pub study_id: String,
    pub label: String,
    pub year: Option<i32>,
    pub measure: EffectMeasure,
    /// Natural-scale effect (OR, RR, HR as ratios).
    pub value: f64,
    /// Pooling-scale effect (ln for ratio measures).
    pub analysis_value: f64,
    /// Standard error on the pooling scale.
    pub standard_error: f64,
    /// Natural-scale confidence bounds.
    pub ci_lower: f64,
    pub ci_upper: f64,
    /// Inverse-variance weight 1/se².
    pub weight: f64,
    pub continuity_corrected: bool,
    /// Advisory confidence in [0.1, 0.9]; never gates computation.
    pub confidence: f64,
    pub warnings: Vec<AnalysisWarning>,
}

impl EffectSizeResult {
    /// Pooling input for this study.
    pub fn to_study_effect(&self) -> StudyEffect {
        StudyEffect {
            study_id: self.study_id.clone(),
            estimate: self.analysis_value,
            standard_error: self.standard_error,
        }
    }

    pub fn variance(&self) -> f64 {
        self.standard_error * self.standard_error
    }
}
