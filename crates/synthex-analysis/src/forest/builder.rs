//! ForestPlotDataBuilder: orders rows and derives axis layout.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;
use synthex_core::config::ForestConfig;
use synthex_core::constants;
use synthex_core::errors::{AnalysisError, AnalysisResult, InputError};

use super::axis::{linear_ticks, log_ticks};
use super::types::{AxisScale, ForestPlotData, ForestRow, PooledRow, StudyOrder, XAxis, YAxis};
use crate::effect_size::{EffectMeasure, EffectSizeResult};
use crate::pooling::PooledResult;

/// Rows reserved below the first study: pooled diamond and separator.
const POOLED_Y: usize = 0;
const SEPARATOR_Y: usize = 1;
const FIRST_STUDY_Y: usize = 2;

/// Builds `ForestPlotData` from effect sizes and a pooled result.
#[derive(Debug, Clone)]
pub struct ForestPlotDataBuilder {
    order: StudyOrder,
    target_ticks: usize,
}

impl Default for ForestPlotDataBuilder {
    fn default() -> Self {
        Self {
            order: StudyOrder::Original,
            target_ticks: constants::DEFAULT_TARGET_TICKS,
        }
    }
}

impl ForestPlotDataBuilder {
    pub fn new(order: StudyOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn from_config(config: &ForestConfig) -> Result<Self, InputError> {
        Ok(Self {
            order: config.effective_order().parse()?,
            target_ticks: config.effective_target_ticks(),
        })
    }

    pub fn with_target_ticks(mut self, target_ticks: usize) -> Self {
        self.target_ticks = target_ticks;
        self
    }

    pub fn order(&self) -> StudyOrder {
        self.order
    }

    /// Lay out one row per study plus the pooled row.
    ///
    /// Studies run bottom-to-top in the chosen order starting at y = 2,
    /// above the separator (y = 1) and pooled diamond (y = 0); the header
    /// sits above the last study.
    pub fn build(
        &self,
        effects: &[EffectSizeResult],
        pooled: &PooledResult,
    ) -> AnalysisResult<ForestPlotData> {
        if effects.is_empty() {
            return Err(AnalysisError::InsufficientStudies {
                operation: "forest plot",
                required: 1,
                found: 0,
            });
        }

        let weights: FxHashMap<&str, f64> = pooled
            .weights
            .iter()
            .map(|w| (w.study_id.as_str(), w.percent))
            .collect();

        let mut rows = Vec::with_capacity(effects.len());
        for e in effects {
            if e.measure != pooled.measure {
                return Err(InputError::MixedMeasures {
                    study_id: e.study_id.clone(),
                    expected: pooled.measure.name().to_string(),
                    found: e.measure.name().to_string(),
                }
                .into());
            }
            let weight_pct = *weights
                .get(e.study_id.as_str())
                .ok_or_else(|| InputError::UnknownStudy {
                    study_id: e.study_id.clone(),
                })?;
            rows.push(ForestRow {
                study_id: e.study_id.clone(),
                label: e.label.clone(),
                year: e.year,
                effect: e.value,
                ci_lower: e.ci_lower,
                ci_upper: e.ci_upper,
                weight_pct,
                y_position: 0,
            });
        }

        self.sort_rows(&mut rows);
        for (i, row) in rows.iter_mut().enumerate() {
            row.y_position = FIRST_STUDY_Y + i;
        }

        let header_position = FIRST_STUDY_Y + rows.len();
        let y_axis = YAxis {
            height: header_position + 1,
            order: self.order,
            pooled_position: POOLED_Y,
            separator_position: SEPARATOR_Y,
            header_position,
        };

        let pooled_row = PooledRow {
            label: pooled.model.label().to_string(),
            model: pooled.model,
            effect: pooled.effect,
            ci_lower: pooled.ci_lower,
            ci_upper: pooled.ci_upper,
            weight_pct: 100.0,
            y_position: POOLED_Y,
            prediction_interval: pooled.heterogeneity.prediction_interval.clone(),
        };

        let x_axis = self.x_axis(pooled.measure, &rows, &pooled_row);

        tracing::debug!(
            rows = rows.len(),
            order = %self.order,
            scale = %x_axis.scale,
            "built forest plot layout"
        );

        Ok(ForestPlotData {
            measure: pooled.measure,
            rows,
            pooled_row,
            x_axis,
            y_axis,
            heterogeneity_label: pooled.heterogeneity.summary_label(),
        })
    }

    fn sort_rows(&self, rows: &mut [ForestRow]) {
        // `sort_by` is stable, so equal keys keep insertion order.
        match self.order {
            StudyOrder::Original => {}
            StudyOrder::ByYear => rows.sort_by(|a, b| match (a.year, b.year) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }),
            StudyOrder::ByWeight => rows.sort_by(|a, b| b.weight_pct.total_cmp(&a.weight_pct)),
            StudyOrder::ByEffect => rows.sort_by(|a, b| a.effect.total_cmp(&b.effect)),
            StudyOrder::Alphabetical => {
                rows.sort_by_cached_key(|r| r.label.to_lowercase());
            }
        }
    }

    fn x_axis(&self, measure: EffectMeasure, rows: &[ForestRow], pooled: &PooledRow) -> XAxis {
        let scale = AxisScale::for_measure(measure);
        let null_value = measure.null_value();

        let mut bounds: Vec<f64> = rows
            .iter()
            .flat_map(|r| [r.ci_lower, r.ci_upper])
            .chain([pooled.ci_lower, pooled.ci_upper, null_value])
            .collect();
        if let Some(pi) = &pooled.prediction_interval {
            bounds.extend([pi.lower, pi.upper]);
        }
        let usable = |v: &f64| v.is_finite() && (scale == AxisScale::Linear || *v > 0.0);
        let min = bounds.iter().copied().filter(usable).fold(null_value, f64::min);
        let max = bounds.iter().copied().filter(usable).fold(null_value, f64::max);

        let ticks = match scale {
            AxisScale::Linear => linear_ticks(min, max, self.target_ticks),
            AxisScale::Log => log_ticks(min, max, self.target_ticks),
        };
        let (min, max) = match (ticks.first(), ticks.last()) {
            (Some(&first), Some(&last)) => (first.min(min), last.max(max)),
            _ => (min, max),
        };

        let label = match scale {
            AxisScale::Log => format!("{} (log scale)", measure.name()),
            AxisScale::Linear => measure.name().to_string(),
        };

        XAxis {
            scale,
            null_value,
            min,
            max,
            ticks,
            label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect_size::{EffectSizeCalculator, Study};
    use crate::pooling::PoolingEngine;

    fn fixture(order: StudyOrder) -> ForestPlotData {
        let studies = vec![
            Study::precomputed("b", 0.40, 0.20).with_label("Beta").with_year(2015),
            Study::precomputed("a", 0.10, 0.10).with_label("alpha"),
            Study::precomputed("c", -0.20, 0.30).with_label("Gamma").with_year(2009),
        ];
        let effects = EffectSizeCalculator::default()
            .compute_all(&studies, EffectMeasure::MeanDifference)
            .unwrap();
        let pooled = PoolingEngine::default().pool_effect_sizes(&effects).unwrap();
        ForestPlotDataBuilder::new(order).build(&effects, &pooled).unwrap()
    }

    fn ids(data: &ForestPlotData) -> Vec<&str> {
        data.rows.iter().map(|r| r.study_id.as_str()).collect()
    }

    #[test]
    fn test_orderings() {
        assert_eq!(ids(&fixture(StudyOrder::Original)), ["b", "a", "c"]);
        assert_eq!(ids(&fixture(StudyOrder::ByYear)), ["c", "b", "a"]);
        assert_eq!(ids(&fixture(StudyOrder::ByWeight)), ["a", "b", "c"]);
        assert_eq!(ids(&fixture(StudyOrder::ByEffect)), ["c", "a", "b"]);
        assert_eq!(ids(&fixture(StudyOrder::Alphabetical)), ["a", "b", "c"]);
    }

    #[test]
    fn test_y_layout() {
        let data = fixture(StudyOrder::Original);
        assert_eq!(data.pooled_row.y_position, 0);
        assert_eq!(data.y_axis.separator_position, 1);
        let ys: Vec<usize> = data.rows.iter().map(|r| r.y_position).collect();
        assert_eq!(ys, [2, 3, 4]);
        assert_eq!(data.y_axis.header_position, 5);
        assert_eq!(data.y_axis.height, 6);
    }

    #[test]
    fn test_linear_axis_spans_intervals() {
        let data = fixture(StudyOrder::Original);
        assert_eq!(data.x_axis.scale, AxisScale::Linear);
        assert_eq!(data.x_axis.null_value, 0.0);
        for row in &data.rows {
            assert!(data.x_axis.min <= row.ci_lower && data.x_axis.max >= row.ci_upper);
        }
        assert!(data.x_axis.ticks.contains(&0.0));
    }
}
