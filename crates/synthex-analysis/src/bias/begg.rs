//! Begg and Mazumdar's rank correlation test.

use super::types::BeggTest;
use crate::pooling::StudyEffect;
use crate::stats::{inverse_variance, kendall_tau_b, normal_two_sided_p};

pub const BEGG_MIN_STUDIES: usize = 3;

/// Deviations this close to the pooled estimate, relative to its scale, are ties.
const DEVIATION_TIE_TOLERANCE: f64 = 1e-12;

/// Correlate standardized deviations from the fixed-effect estimate with
/// study variances using Kendall's tau-b.
///
/// t_i = (y_i − ȳ) / √(v_i − 1/Σw), ȳ the fixed-effect estimate.
pub fn begg_test(studies: &[StudyEffect]) -> Result<BeggTest, &'static str> {
    if studies.len() < BEGG_MIN_STUDIES {
        return Err("requires at least 3 studies");
    }

    let estimates: Vec<f64> = studies.iter().map(|s| s.estimate).collect();
    let variances: Vec<f64> = studies.iter().map(StudyEffect::variance).collect();
    let fixed = inverse_variance(&estimates, &variances, 0.0);
    let pooled_variance = 1.0 / fixed.sum_weights;
    let tie_tolerance = DEVIATION_TIE_TOLERANCE * fixed.estimate.abs().max(1.0);

    let standardized: Vec<f64> = estimates
        .iter()
        .zip(&variances)
        .map(|(y, v)| {
            let adjusted = v - pooled_variance;
            let deviation = y - fixed.estimate;
            if adjusted > 0.0 && deviation.abs() > tie_tolerance {
                deviation / adjusted.sqrt()
            } else {
                0.0
            }
        })
        .collect();

    let kendall = kendall_tau_b(&standardized, &variances)
        .ok_or("rank correlation undefined: all variances or deviations tied")?;

    Ok(BeggTest {
        tau: kendall.tau_b,
        s: kendall.s,
        variance_s: kendall.variance_s,
        z: kendall.z,
        p_value: normal_two_sided_p(kendall.z),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotone_funnel_gives_perfect_correlation() {
        // Deviations grow with variance.
        let studies: Vec<StudyEffect> = (1..=8)
            .map(|i| {
                let se = 0.05 * i as f64;
                StudyEffect::new(format!("s{i}"), 0.1 + 2.0 * se, se)
            })
            .collect();
        let begg = begg_test(&studies).unwrap();
        assert!((begg.tau - 1.0).abs() < 1e-12);
        assert_eq!(begg.s, 28.0);
        assert!(begg.p_value < 0.01);
    }

    #[test]
    fn test_equal_variances_unavailable() {
        let studies = vec![
            StudyEffect::new("a", 0.1, 0.1),
            StudyEffect::new("b", 0.3, 0.1),
            StudyEffect::new("c", 0.2, 0.1),
        ];
        assert!(begg_test(&studies).is_err());
    }

    #[test]
    fn test_identical_effects_have_no_rank_signal() {
        let studies: Vec<StudyEffect> = (0..12)
            .map(|i| StudyEffect::new(format!("s{i}"), 0.3, 0.063 * 1.4_f64.powi(i)))
            .collect();
        assert!(begg_test(&studies).is_err());
    }
}
