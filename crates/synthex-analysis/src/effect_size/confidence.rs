//! Advisory confidence score for a single effect size.
//!
//! Starts at 0.5 and moves with sample-size adequacy, interval width on the
//! pooling scale, and assumption flags. Clamped to [0.1, 0.9]; typical
//! results fall in 0.3–0.7.

/// Inputs to the confidence score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceFactors {
    /// Total participants across arms, if known.
    pub total_n: Option<i64>,
    /// CI width on the pooling scale.
    pub ci_width: f64,
    pub continuity_corrected: bool,
    pub unequal_variances: bool,
}

const BASE: f64 = 0.5;
const FLAG_PENALTY: f64 = 0.1;

/// Compute the advisory confidence score.
pub fn effect_confidence(factors: &ConfidenceFactors) -> f64 {
    let mut score = BASE;

    score += match factors.total_n {
        None => 0.0,
        Some(n) if n < 30 => -0.1,
        Some(n) if n < 100 => -0.05,
        Some(n) if n < 300 => 0.0,
        Some(n) if n < 1000 => 0.05,
        Some(_) => 0.1,
    };

    let w = factors.ci_width;
    score += if !w.is_finite() || w > 2.0 {
        -0.1
    } else if w > 1.0 {
        -0.05
    } else if w < 0.25 {
        0.05
    } else {
        0.0
    };

    if factors.continuity_corrected {
        score -= FLAG_PENALTY;
    }
    if factors.unequal_variances {
        score -= FLAG_PENALTY;
    }

    score.clamp(0.1, 0.9)
}
