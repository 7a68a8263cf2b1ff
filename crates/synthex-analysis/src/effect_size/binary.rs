//! Binary-outcome effect sizes from 2×2 tables.
//!
//! Cells: a = events_t, b = n_t − a, c = events_c, d = n_c − c.
//! When any cell is zero, the correction is added to all four cells,
//! never only to the empty ones.

use synthex_core::errors::{AnalysisError, AnalysisResult, InputError};

use super::types::BinaryCounts;

/// Effect on the pooling scale with its standard error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawEffect {
    pub estimate: f64,
    pub standard_error: f64,
}

/// A validated 2×2 table, continuity-corrected if needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoByTwo {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    /// Whether the correction was added to every cell.
    pub corrected: bool,
}

impl TwoByTwo {
    /// Build the table, validating counts and applying the correction
    /// iff at least one cell is zero and `correction > 0`.
    pub fn from_counts(
        study_id: &str,
        counts: &BinaryCounts,
        correction: f64,
    ) -> Result<Self, InputError> {
        validate_arm(study_id, "treatment", counts.events_t, counts.n_t)?;
        validate_arm(study_id, "control", counts.events_c, counts.n_c)?;

        let a = counts.events_t as f64;
        let b = (counts.n_t - counts.events_t) as f64;
        let c = counts.events_c as f64;
        let d = (counts.n_c - counts.events_c) as f64;

        let has_zero = a == 0.0 || b == 0.0 || c == 0.0 || d == 0.0;
        if has_zero && correction > 0.0 {
            Ok(Self {
                a: a + correction,
                b: b + correction,
                c: c + correction,
                d: d + correction,
                corrected: true,
            })
        } else {
            Ok(Self {
                a,
                b,
                c,
                d,
                corrected: false,
            })
        }
    }

    pub fn has_zero_cell(&self) -> bool {
        self.a == 0.0 || self.b == 0.0 || self.c == 0.0 || self.d == 0.0
    }

    pub fn total(&self) -> f64 {
        self.a + self.b + self.c + self.d
    }
}

fn validate_arm(study_id: &str, arm: &'static str, events: i64, n: i64) -> Result<(), InputError> {
    if n <= 0 {
        return Err(InputError::NonPositiveSampleSize {
            study_id: study_id.to_string(),
            arm,
            n,
        });
    }
    if events < 0 {
        return Err(InputError::NegativeCount {
            study_id: study_id.to_string(),
            arm,
            events,
        });
    }
    if events > n {
        return Err(InputError::EventsExceedTotal {
            study_id: study_id.to_string(),
            arm,
            events,
            total: n,
        });
    }
    Ok(())
}

/// ln OR = ln((a·d)/(b·c)); SE = √(1/a + 1/b + 1/c + 1/d).
pub fn log_odds_ratio(study_id: &str, t: &TwoByTwo) -> AnalysisResult<RawEffect> {
    if t.has_zero_cell() {
        return Err(zero_cell(study_id));
    }
    let estimate = (t.a * t.d / (t.b * t.c)).ln();
    let standard_error = (1.0 / t.a + 1.0 / t.b + 1.0 / t.c + 1.0 / t.d).sqrt();
    checked(study_id, estimate, standard_error)
}

/// ln RR = ln((a/(a+b)) / (c/(c+d))); SE = √(1/a − 1/(a+b) + 1/c − 1/(c+d)).
pub fn log_risk_ratio(study_id: &str, t: &TwoByTwo) -> AnalysisResult<RawEffect> {
    if t.a == 0.0 || t.c == 0.0 {
        return Err(zero_cell(study_id));
    }
    let n1 = t.a + t.b;
    let n2 = t.c + t.d;
    let estimate = ((t.a / n1) / (t.c / n2)).ln();
    let variance = 1.0 / t.a - 1.0 / n1 + 1.0 / t.c - 1.0 / n2;
    checked(study_id, estimate, variance.max(0.0).sqrt())
}

/// RD = a/(a+b) − c/(c+d); SE = √(ab/(a+b)³ + cd/(c+d)³).
pub fn risk_difference(study_id: &str, t: &TwoByTwo) -> AnalysisResult<RawEffect> {
    let n1 = t.a + t.b;
    let n2 = t.c + t.d;
    let estimate = t.a / n1 - t.c / n2;
    let variance = t.a * t.b / n1.powi(3) + t.c * t.d / n2.powi(3);
    checked(study_id, estimate, variance.sqrt())
}

fn zero_cell(study_id: &str) -> AnalysisError {
    AnalysisError::degenerate(
        study_id,
        "zero cell in 2x2 table with continuity correction disabled",
    )
}

fn checked(study_id: &str, estimate: f64, standard_error: f64) -> AnalysisResult<RawEffect> {
    if !estimate.is_finite() {
        return Err(AnalysisError::degenerate(study_id, "effect estimate is not finite"));
    }
    if !(standard_error.is_finite() && standard_error > 0.0) {
        return Err(AnalysisError::degenerate(study_id, "standard error is zero"));
    }
    Ok(RawEffect {
        estimate,
        standard_error,
    })
}
