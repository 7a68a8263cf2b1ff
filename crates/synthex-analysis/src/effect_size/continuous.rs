//! Continuous-outcome effect sizes from group means and SDs.

use synthex_core::errors::{AnalysisError, AnalysisResult, InputError};

use super::binary::RawEffect;
use super::types::ContinuousSummary;

/// SD ratios outside [1/limit, limit] question the pooled-SD assumption.
pub const SD_RATIO_LIMIT: f64 = 2.0;

/// Validate a continuous summary.
///
/// Zero variance in both arms leaves no standard error and is a hard error.
/// Standardized measures additionally reject n = 1 in both arms.
pub fn validate(study_id: &str, s: &ContinuousSummary) -> AnalysisResult<()> {
    for (field, v) in [
        ("mean_t", s.mean_t),
        ("sd_t", s.sd_t),
        ("mean_c", s.mean_c),
        ("sd_c", s.sd_c),
    ] {
        if !v.is_finite() {
            return Err(InputError::NonFiniteValue {
                study_id: study_id.to_string(),
                field,
            }
            .into());
        }
    }
    for (arm, n) in [("treatment", s.n_t), ("control", s.n_c)] {
        if n <= 0 {
            return Err(InputError::NonPositiveSampleSize {
                study_id: study_id.to_string(),
                arm,
                n,
            }
            .into());
        }
    }
    for (arm, sd) in [("treatment", s.sd_t), ("control", s.sd_c)] {
        if sd < 0.0 {
            return Err(InputError::NegativeStandardDeviation {
                study_id: study_id.to_string(),
                arm,
                sd,
            }
            .into());
        }
    }
    if s.sd_t == 0.0 && s.sd_c == 0.0 {
        return Err(AnalysisError::degenerate(
            study_id,
            "zero variance in both arms",
        ));
    }
    Ok(())
}

/// MD = mean_t − mean_c; SE = √(sd_t²/n_t + sd_c²/n_c).
pub fn mean_difference(study_id: &str, s: &ContinuousSummary) -> AnalysisResult<RawEffect> {
    validate(study_id, s)?;
    let estimate = s.mean_t - s.mean_c;
    let standard_error =
        (s.sd_t.powi(2) / s.n_t as f64 + s.sd_c.powi(2) / s.n_c as f64).sqrt();
    Ok(RawEffect {
        estimate,
        standard_error,
    })
}

/// Pooled SD = √(((n_t−1)sd_t² + (n_c−1)sd_c²) / (n_t+n_c−2)).
pub fn pooled_sd(s: &ContinuousSummary) -> f64 {
    let df = (s.n_t + s.n_c - 2) as f64;
    if df <= 0.0 {
        return f64::NAN;
    }
    (((s.n_t - 1) as f64 * s.sd_t.powi(2) + (s.n_c - 1) as f64 * s.sd_c.powi(2)) / df).sqrt()
}

/// Cohen's d = MD / pooled SD with
/// Var(d) = (n_t+n_c)/(n_t·n_c) + d²/(2(n_t+n_c)).
pub fn cohens_d(study_id: &str, s: &ContinuousSummary) -> AnalysisResult<RawEffect> {
    validate(study_id, s)?;
    if s.n_t == 1 && s.n_c == 1 {
        return Err(AnalysisError::degenerate(
            study_id,
            "single observation in both arms; pooled standard deviation has no degrees of freedom",
        ));
    }
    let sp = pooled_sd(s);
    if !(sp.is_finite() && sp > 0.0) {
        return Err(AnalysisError::degenerate(study_id, "pooled standard deviation is zero"));
    }
    let n_t = s.n_t as f64;
    let n_c = s.n_c as f64;
    let d = (s.mean_t - s.mean_c) / sp;
    let variance = (n_t + n_c) / (n_t * n_c) + d * d / (2.0 * (n_t + n_c));
    Ok(RawEffect {
        estimate: d,
        standard_error: variance.sqrt(),
    })
}

/// Small-sample correction J = 1 − 3/(4·df − 1), df = n_t + n_c − 2.
pub fn hedges_correction(n_t: i64, n_c: i64) -> f64 {
    let df = (n_t + n_c - 2) as f64;
    1.0 - 3.0 / (4.0 * df - 1.0)
}

/// Hedges' g = J·d; Var(g) = J²·Var(d).
pub fn hedges_g(study_id: &str, s: &ContinuousSummary) -> AnalysisResult<RawEffect> {
    let d = cohens_d(study_id, s)?;
    let j = hedges_correction(s.n_t, s.n_c);
    Ok(RawEffect {
        estimate: j * d.estimate,
        standard_error: j * d.standard_error,
    })
}

/// sd_t / sd_c when outside [0.5, 2]; infinite when one SD is zero.
pub fn questionable_sd_ratio(s: &ContinuousSummary) -> Option<f64> {
    let ratio = if s.sd_c == 0.0 {
        f64::INFINITY
    } else {
        s.sd_t / s.sd_c
    };
    if ratio > SD_RATIO_LIMIT || ratio < 1.0 / SD_RATIO_LIMIT {
        Some(ratio)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(mean_t: f64, sd_t: f64, n_t: i64, mean_c: f64, sd_c: f64, n_c: i64) -> ContinuousSummary {
        ContinuousSummary {
            mean_t,
            sd_t,
            n_t,
            mean_c,
            sd_c,
            n_c,
        }
    }

    #[test]
    fn test_mean_difference() {
        let s = summary(10.0, 2.0, 25, 8.0, 3.0, 36);
        let md = mean_difference("s", &s).unwrap();
        assert!((md.estimate - 2.0).abs() < 1e-12);
        // 4/25 + 9/36 = 0.16 + 0.25
        assert!((md.standard_error - 0.41f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_cohens_d_equal_sds() {
        let s = summary(12.0, 4.0, 20, 10.0, 4.0, 20);
        let d = cohens_d("s", &s).unwrap();
        assert!((d.estimate - 0.5).abs() < 1e-12);
        let var = 40.0 / 400.0 + 0.25 / 80.0;
        assert!((d.standard_error - f64::sqrt(var)).abs() < 1e-12);
    }

    #[test]
    fn test_hedges_shrinks_toward_zero() {
        let s = summary(12.0, 4.0, 10, 10.0, 4.0, 10);
        let d = cohens_d("s", &s).unwrap();
        let g = hedges_g("s", &s).unwrap();
        let j = 1.0 - 3.0 / (4.0 * 18.0 - 1.0);
        assert!((g.estimate - j * d.estimate).abs() < 1e-12);
        assert!((g.standard_error - j * d.standard_error).abs() < 1e-12);
        assert!(g.estimate.abs() < d.estimate.abs());
    }

    #[test]
    fn test_sd_ratio_flag() {
        assert!(questionable_sd_ratio(&summary(0.0, 5.0, 10, 0.0, 2.0, 10)).is_some());
        assert!(questionable_sd_ratio(&summary(0.0, 1.0, 10, 0.0, 2.5, 10)).is_some());
        assert!(questionable_sd_ratio(&summary(0.0, 2.0, 10, 0.0, 3.0, 10)).is_none());
        assert_eq!(
            questionable_sd_ratio(&summary(0.0, 1.0, 10, 0.0, 0.0, 10)),
            Some(f64::INFINITY)
        );
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(matches!(
            mean_difference("s", &summary(1.0, 0.0, 1, 0.0, 0.0, 1)),
            Err(AnalysisError::NumericDegeneracy { .. })
        ));
        assert!(matches!(
            mean_difference("s", &summary(1.0, 0.0, 10, 0.0, 0.0, 12)),
            Err(AnalysisError::NumericDegeneracy { .. })
        ));
        assert!(matches!(
            mean_difference("s", &summary(1.0, -1.0, 10, 0.0, 1.0, 12)),
            Err(AnalysisError::Input(InputError::NegativeStandardDeviation { .. }))
        ));
        assert!(matches!(
            cohens_d("s", &summary(1.0, 1.0, 0, 0.0, 1.0, 12)),
            Err(AnalysisError::Input(InputError::NonPositiveSampleSize { .. }))
        ));
    }

    #[test]
    fn test_single_observation_arms() {
        let s = summary(5.0, 2.0, 1, 3.0, 2.0, 1);
        let md = mean_difference("s", &s).unwrap();
        assert!((md.estimate - 2.0).abs() < 1e-12);
        assert!((md.standard_error - 8.0f64.sqrt()).abs() < 1e-12);

        assert!(matches!(
            cohens_d("s", &s),
            Err(AnalysisError::NumericDegeneracy { .. })
        ));
        assert!(matches!(
            hedges_g("s", &s),
            Err(AnalysisError::NumericDegeneracy { .. })
        ));
        assert!(matches!(
            mean_difference("s", &summary(5.0, 0.0, 1, 3.0, 0.0, 1)),
            Err(AnalysisError::NumericDegeneracy { .. })
        ));
    }
}
