//! X-axis tick generation with human-readable rounding.

/// Round away binary noise (0.30000000000000004 → 0.3).
fn tidy(value: f64) -> f64 {
    let rounded = (value * 1e10).round() / 1e10;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Step from the 1–2–2.5–5 family closest above `raw`.
fn nice_step(raw: f64) -> f64 {
    let exponent = raw.log10().floor();
    let magnitude = 10f64.powf(exponent);
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 2.5 {
        2.5
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Evenly spaced ticks covering `[min, max]`, about `target` of them.
///
/// Ticks are multiples of the step, so 0 appears whenever the range spans it.
pub fn linear_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    let (mut lo, mut hi) = if min <= max { (min, max) } else { (max, min) };
    if hi - lo < f64::EPSILON {
        let pad = if lo.abs() > f64::EPSILON { lo.abs() * 0.5 } else { 1.0 };
        lo -= pad;
        hi += pad;
    }

    let intervals = target.max(2) - 1;
    let step = nice_step((hi - lo) / intervals as f64);
    let start = (lo / step).floor();
    let end = (hi / step).ceil();
    let count = (end - start) as usize;

    (0..=count)
        .map(|i| tidy((start + i as f64) * step))
        .collect()
}

/// Ticks for a log axis: 1–2–5 multiples of powers of ten covering
/// `[min, max]`, thinned to decades when there would be far more than
/// `target`. Always contains 1.
pub fn log_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !(min > 0.0 && max > 0.0) || !min.is_finite() || !max.is_finite() {
        return vec![1.0];
    }
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    let lo = lo.min(1.0);
    let hi = hi.max(1.0);

    let first_decade = lo.log10().floor() as i32;
    let last_decade = hi.log10().ceil() as i32;

    let candidates = |mantissas: &[f64]| -> Vec<f64> {
        let mut all = Vec::new();
        for decade in first_decade..=last_decade {
            for m in mantissas {
                all.push(tidy(m * 10f64.powi(decade)));
            }
        }
        // Keep the tightest candidates that still enclose [lo, hi].
        let below = all.iter().copied().filter(|v| *v <= lo).fold(f64::NAN, f64::max);
        let above = all.iter().copied().filter(|v| *v >= hi).fold(f64::NAN, f64::min);
        let lower = if below.is_nan() { lo } else { below };
        let upper = if above.is_nan() { hi } else { above };
        all.into_iter().filter(|v| *v >= lower && *v <= upper).collect()
    };

    let fine = candidates(&[1.0, 2.0, 5.0]);
    if fine.len() <= target.max(2) * 2 {
        fine
    } else {
        candidates(&[1.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_ticks_include_zero() {
        let ticks = linear_ticks(-0.37, 1.12, 5);
        assert!(ticks.contains(&0.0));
        assert!(ticks[0] <= -0.37);
        assert!(*ticks.last().unwrap() >= 1.12);
        assert_eq!(ticks, vec![-0.5, 0.0, 0.5, 1.0, 1.5]);
    }

    #[test]
    fn test_linear_ticks_are_tidy() {
        let ticks = linear_ticks(0.1, 0.7, 7);
        for t in &ticks {
            assert_eq!(*t, (t * 10.0).round() / 10.0);
        }
    }

    #[test]
    fn test_linear_degenerate_range() {
        let ticks = linear_ticks(0.0, 0.0, 5);
        assert!(ticks.len() >= 2);
        assert!(ticks.contains(&0.0));
    }

    #[test]
    fn test_log_ticks_cover_range() {
        let ticks = log_ticks(0.6, 4.3, 5);
        assert_eq!(ticks, vec![0.5, 1.0, 2.0, 5.0]);
    }

    #[test]
    fn test_log_ticks_thin_to_decades() {
        let ticks = log_ticks(0.001, 900.0, 5);
        assert_eq!(ticks, vec![0.001, 0.01, 0.1, 1.0, 10.0, 100.0, 1000.0]);
    }

    #[test]
    fn test_log_ticks_invalid_input() {
        assert_eq!(log_ticks(-1.0, 2.0, 5), vec![1.0]);
    }
}
