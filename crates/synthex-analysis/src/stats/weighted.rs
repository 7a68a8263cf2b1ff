//! Inverse-variance weighted summaries.

/// Weighted mean of study estimates with weights 1/(v_i + τ²).
#[derive(Debug, Clone, PartialEq)]
pub struct InverseVarianceSummary {
    /// Σ(w_i·y_i) / Σw_i.
    pub estimate: f64,
    /// √(1/Σw_i).
    pub standard_error: f64,
    /// Σw_i.
    pub sum_weights: f64,
    /// Per-study weights in input order.
    pub weights: Vec<f64>,
}

impl InverseVarianceSummary {
    /// Weights normalized to percentages summing to 100.
    pub fn weight_percentages(&self) -> Vec<f64> {
        if self.sum_weights <= 0.0 || !self.sum_weights.is_finite() {
            return vec![0.0; self.weights.len()];
        }
        self.weights
            .iter()
            .map(|w| 100.0 * w / self.sum_weights)
            .collect()
    }
}

/// Compute the inverse-variance weighted summary.
///
/// `estimates` and `variances` must have equal length; variances are
/// within-study variances (se²), `tau_squared` the between-study variance
/// added to each (0 for the fixed-effect model).
pub fn inverse_variance(
    estimates: &[f64],
    variances: &[f64],
    tau_squared: f64,
) -> InverseVarianceSummary {
    debug_assert_eq!(estimates.len(), variances.len());
    let tau_squared = tau_squared.max(0.0);

    let weights: Vec<f64> = variances.iter().map(|v| 1.0 / (v + tau_squared)).collect();
    let sum_weights: f64 = weights.iter().sum();
    let weighted_sum: f64 = weights
        .iter()
        .zip(estimates)
        .map(|(w, y)| w * y)
        .sum();

    let (estimate, standard_error) = if sum_weights > 0.0 && sum_weights.is_finite() {
        (weighted_sum / sum_weights, (1.0 / sum_weights).sqrt())
    } else {
        (f64::NAN, f64::NAN)
    };

    InverseVarianceSummary {
        estimate,
        standard_error,
        sum_weights,
        weights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_variances_give_arithmetic_mean() {
        let s = inverse_variance(&[1.0, 2.0, 3.0], &[0.25, 0.25, 0.25], 0.0);
        assert!((s.estimate - 2.0).abs() < 1e-12);
        assert!((s.sum_weights - 12.0).abs() < 1e-12);
        assert!((s.standard_error - (1.0f64 / 12.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_precise_study_dominates() {
        let s = inverse_variance(&[0.0, 1.0], &[0.01, 1.0], 0.0);
        assert!(s.estimate < 0.02);
        let pct = s.weight_percentages();
        assert!(pct[0] > 99.0);
        assert!((pct.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_tau_squared_evens_out_weights() {
        let fixed = inverse_variance(&[0.0, 1.0], &[0.01, 1.0], 0.0);
        let random = inverse_variance(&[0.0, 1.0], &[0.01, 1.0], 0.5);
        let ratio_fixed = fixed.weights[0] / fixed.weights[1];
        let ratio_random = random.weights[0] / random.weights[1];
        assert!(ratio_random < ratio_fixed);
        assert!(random.standard_error > fixed.standard_error);
    }
}
