//! Property-based invariants across the engine.

use proptest::prelude::*;
use synthex_analysis::heterogeneity::HeterogeneityAssessor;
use synthex_analysis::pooling::{ModelChoice, PoolingEngine, PoolingOptions, StudyEffect};
use synthex_analysis::{EffectMeasure, EffectSizeCalculator, Study};

fn arb_effects() -> impl Strategy<Value = Vec<StudyEffect>> {
    prop::collection::vec((-3.0f64..3.0, 0.01f64..2.0), 2..40).prop_map(|pairs| {
        pairs
            .into_iter()
            .enumerate()
            .map(|(i, (y, se))| StudyEffect::new(format!("s{i}"), y, se))
            .collect()
    })
}

fn arb_arm() -> impl Strategy<Value = (i64, i64)> {
    (1i64..500).prop_flat_map(|n| (0..=n, Just(n)))
}

// ── Effect sizes ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn odds_ratio_arm_swap_inverts((e_t, n_t) in arb_arm(), (e_c, n_c) in arb_arm()) {
        let calc = EffectSizeCalculator::default();
        let forward = calc
            .compute(&Study::binary("f", e_t, n_t, e_c, n_c), EffectMeasure::OddsRatio)
            .unwrap();
        let swapped = calc
            .compute(&Study::binary("s", e_c, n_c, e_t, n_t), EffectMeasure::OddsRatio)
            .unwrap();
        prop_assert!((forward.analysis_value + swapped.analysis_value).abs() < 1e-9);
        prop_assert!((forward.value * swapped.value - 1.0).abs() < 1e-9);
        prop_assert_eq!(forward.continuity_corrected, swapped.continuity_corrected);
    }

    #[test]
    fn continuity_correction_iff_zero_cell((e_t, n_t) in arb_arm(), (e_c, n_c) in arb_arm()) {
        let r = EffectSizeCalculator::default()
            .compute(&Study::binary("s", e_t, n_t, e_c, n_c), EffectMeasure::OddsRatio)
            .unwrap();
        let has_zero = e_t == 0 || e_t == n_t || e_c == 0 || e_c == n_c;
        prop_assert_eq!(r.continuity_corrected, has_zero);
        prop_assert!(r.standard_error > 0.0 && r.standard_error.is_finite());
        prop_assert!((0.1..=0.9).contains(&r.confidence));
    }
}

// ── Pooling and heterogeneity ────────────────────────────────────────────

proptest! {
    #[test]
    fn i_squared_bounded(studies in arb_effects()) {
        let h = HeterogeneityAssessor::default()
            .assess(&studies, EffectMeasure::MeanDifference)
            .unwrap();
        prop_assert!((0.0..=100.0).contains(&h.i_squared));
        prop_assert!(h.tau_squared >= 0.0);
        prop_assert!(h.q >= 0.0);
        if let Some(p) = h.p_value {
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn weight_percentages_sum_to_100(studies in arb_effects()) {
        let r = PoolingEngine::default()
            .pool(&studies, EffectMeasure::MeanDifference)
            .unwrap();
        let total: f64 = r.weights.iter().map(|w| w.percent).sum();
        prop_assert!((total - 100.0).abs() < 1e-6);
        prop_assert!(r.weights.iter().all(|w| w.raw > 0.0));
    }

    #[test]
    fn random_se_not_smaller_than_fixed(studies in arb_effects()) {
        let fixed = PoolingEngine::new(PoolingOptions::default().with_model(ModelChoice::Fixed))
            .pool(&studies, EffectMeasure::MeanDifference)
            .unwrap();
        let random = PoolingEngine::new(PoolingOptions::default().with_model(ModelChoice::Random))
            .pool(&studies, EffectMeasure::MeanDifference)
            .unwrap();
        if random.tau_squared > 0.0 {
            prop_assert!(random.standard_error >= fixed.standard_error);
        } else {
            prop_assert!((random.standard_error - fixed.standard_error).abs() < 1e-12);
        }
    }

    #[test]
    fn pooled_estimate_within_study_range(studies in arb_effects()) {
        let r = PoolingEngine::default()
            .pool(&studies, EffectMeasure::MeanDifference)
            .unwrap();
        let min = studies.iter().map(|s| s.estimate).fold(f64::INFINITY, f64::min);
        let max = studies.iter().map(|s| s.estimate).fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(r.estimate >= min - 1e-9 && r.estimate <= max + 1e-9);
        prop_assert!(r.ci_lower <= r.effect && r.effect <= r.ci_upper);
    }
}
