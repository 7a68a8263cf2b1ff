//! Egger's regression test for funnel asymmetry.

use super::types::EggerTest;
use crate::pooling::StudyEffect;
use crate::stats::t_two_sided_p;

/// Minimum studies for a regression with a residual degree of freedom.
pub const EGGER_MIN_STUDIES: usize = 3;

/// Relative size below which residuals and intercepts count as rounding noise.
const EXACT_FIT_TOLERANCE: f64 = 1e-10;

/// Regress y_i/se_i on 1/se_i by ordinary least squares and test the
/// intercept against Student-t with k − 2 degrees of freedom.
///
/// Errors carry the reason the test is unavailable.
pub fn egger_test(studies: &[StudyEffect]) -> Result<EggerTest, &'static str> {
    let k = studies.len();
    if k < EGGER_MIN_STUDIES {
        return Err("requires at least 3 studies");
    }

    let x: Vec<f64> = studies.iter().map(|s| 1.0 / s.standard_error).collect();
    let y: Vec<f64> = studies
        .iter()
        .map(|s| s.estimate / s.standard_error)
        .collect();

    let n = k as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let sxx: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();
    let sxy: f64 = x
        .iter()
        .zip(&y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();

    // Identical precisions leave the slope undetermined.
    if sxx <= f64::EPSILON * mean_x.powi(2) * n {
        return Err("all studies have the same standard error");
    }

    let slope = sxy / sxx;
    let mut intercept = mean_y - slope * mean_x;

    let df = k - 2;
    let rss: f64 = x
        .iter()
        .zip(&y)
        .map(|(xi, yi)| (yi - intercept - slope * xi).powi(2))
        .sum();
    let sum_y_squared: f64 = y.iter().map(|yi| yi * yi).sum();
    let y_scale = y.iter().fold(1.0_f64, |acc, yi| acc.max(yi.abs()));

    // Points on an exact line leave only rounding noise in the residuals.
    let exact_fit = rss <= EXACT_FIT_TOLERANCE * EXACT_FIT_TOLERANCE * sum_y_squared;
    if exact_fit && intercept.abs() <= EXACT_FIT_TOLERANCE * y_scale {
        intercept = 0.0;
    }

    let standard_error = if exact_fit {
        0.0
    } else {
        let sigma_squared = rss / df as f64;
        (sigma_squared * (1.0 / n + mean_x * mean_x / sxx)).sqrt()
    };

    if !(intercept.is_finite() && standard_error.is_finite()) {
        return Err("regression is numerically degenerate");
    }

    let t = if standard_error > 0.0 {
        intercept / standard_error
    } else if intercept == 0.0 {
        0.0
    } else {
        intercept.signum() * f64::INFINITY
    };
    let p_value = t_two_sided_p(t, df as f64);

    Ok(EggerTest {
        intercept,
        standard_error,
        slope,
        t,
        df,
        p_value,
    })
}
