//! Benchmarks for threshold extraction.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use vthlab_core::{Trace, TraceKind, TraceSet};
use vthlab_extract::{VthConfig, extract_vth};

/// Build a 24-step trace set with `points` samples per step.
fn build_trace_set(points: usize) -> TraceSet {
    let num_steps = 24;
    let vgs: Vec<f64> = (0..points).map(|i| 5.0 * i as f64 / points as f64).collect();

    let mut vgs_steps = Vec::with_capacity(num_steps);
    let mut id_steps = Vec::with_capacity(num_steps);
    for step in 0..num_steps {
        let onset = 2.0 + 0.02 * step as f64;
        let id: Vec<f64> = vgs.iter().map(|v| ((v - onset) * 2e-3).max(0.0)).collect();
        vgs_steps.push(vgs.clone());
        id_steps.push(id);
    }

    let mut set = TraceSet::new();
    set.insert(Trace::new("V(v_g_d)", TraceKind::Voltage, vgs_steps));
    set.insert(Trace::new("Ix(xu1:D)", TraceKind::Current, id_steps));
    set
}

fn bench_extract_vth(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_vth");

    for points in [101, 1_001, 10_001] {
        let set = build_trace_set(points);
        let cfg = VthConfig::default();
        group.bench_with_input(
            BenchmarkId::from_parameter(points),
            &points,
            |bencher, _| {
                bencher.iter(|| extract_vth(black_box(&set), black_box(&cfg)).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_extract_vth);
criterion_main!(benches);
