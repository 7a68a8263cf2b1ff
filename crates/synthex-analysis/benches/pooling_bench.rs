//! Pooling and publication-bias benchmarks.
//!
//! Benchmarks: pooling, bias tests and the full pipeline at k = 10..1000.
//! Run with: cargo bench -p synthex-analysis --bench pooling_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use synthex_analysis::bias::PublicationBiasAssessor;
use synthex_analysis::pooling::{PoolingEngine, StudyEffect};
use synthex_analysis::{EffectMeasure, MetaAnalysis, Study};

const SIZES: [usize; 4] = [10, 50, 200, 1000];

/// Deterministic spread of effects and standard errors.
fn sample_effects(k: usize) -> Vec<StudyEffect> {
    (0..k)
        .map(|i| {
            let se = 0.05 + (i % 17) as f64 * 0.02;
            let y = 0.3 + ((i * 7919) % 101) as f64 / 200.0 - 0.25;
            StudyEffect::new(format!("study_{i}"), y, se)
        })
        .collect()
}

fn sample_studies(k: usize) -> Vec<Study> {
    (0..k)
        .map(|i| {
            let n = 50 + (i % 13) as i64 * 10;
            let events_t = 5 + (i % 11) as i64;
            let events_c = 3 + (i % 7) as i64;
            Study::binary(format!("study_{i}"), events_t, n, events_c, n).with_year(1990 + (i % 30) as i32)
        })
        .collect()
}

fn pooling(c: &mut Criterion) {
    let mut group = c.benchmark_group("pooling");
    group.sample_size(30);
    let engine = PoolingEngine::default();

    for k in SIZES {
        let studies = sample_effects(k);
        group.bench_with_input(BenchmarkId::from_parameter(k), &studies, |b, studies| {
            b.iter(|| engine.pool(black_box(studies), EffectMeasure::MeanDifference))
        });
    }
    group.finish();
}

fn publication_bias(c: &mut Criterion) {
    let mut group = c.benchmark_group("publication_bias");
    group.sample_size(20);
    let engine = PoolingEngine::default();
    let assessor = PublicationBiasAssessor::default();

    for k in SIZES {
        let studies = sample_effects(k);
        let Ok(pooled) = engine.pool(&studies, EffectMeasure::MeanDifference) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(k), &studies, |b, studies| {
            b.iter(|| assessor.assess(black_box(studies), &pooled))
        });
    }
    group.finish();
}

fn full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("meta_analysis");
    group.sample_size(10);
    let analysis = MetaAnalysis::default();

    for k in SIZES {
        let studies = sample_studies(k);
        group.bench_with_input(BenchmarkId::from_parameter(k), &studies, |b, studies| {
            b.iter(|| analysis.run(black_box(studies), EffectMeasure::OddsRatio))
        });
    }
    group.finish();
}

criterion_group!(benches, pooling, publication_bias, full_pipeline);
criterion_main!(benches);
