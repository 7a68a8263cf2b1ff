//! Funnel-plot data.

use super::types::{FunnelData, FunnelLimit, FunnelPoint};
use crate::pooling::{PooledResult, StudyEffect};
use crate::stats::z_critical;

/// Points per study, the pooled reference line, and pseudo-confidence
/// limits `pooled ± z·se` on `limit_points` SE values from 0 to the largest
/// observed SE.
pub fn funnel_data(
    studies: &[StudyEffect],
    pooled: &PooledResult,
    confidence_level: f64,
    limit_points: usize,
) -> FunnelData {
    let measure = pooled.measure;
    let points: Vec<FunnelPoint> = studies
        .iter()
        .map(|s| FunnelPoint {
            study_id: s.study_id.clone(),
            effect: measure.from_analysis_scale(s.estimate),
            estimate: s.estimate,
            standard_error: s.standard_error,
            precision: 1.0 / s.standard_error,
        })
        .collect();

    let max_se = studies
        .iter()
        .map(|s| s.standard_error)
        .fold(0.0, f64::max);
    let z = z_critical(confidence_level);

    let limits = if limit_points >= 2 && max_se > 0.0 && z.is_finite() {
        let steps = (limit_points - 1) as f64;
        (0..limit_points)
            .map(|i| {
                let se = max_se * i as f64 / steps;
                FunnelLimit {
                    standard_error: se,
                    lower: measure.from_analysis_scale(pooled.estimate - z * se),
                    upper: measure.from_analysis_scale(pooled.estimate + z * se),
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    FunnelData {
        points,
        reference: pooled.effect,
        reference_estimate: pooled.estimate,
        limits,
    }
}
