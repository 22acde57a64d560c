/* benches/convolution.rs */
/*▫~•◦────────────────────────────────────────────────────────────────────────────────────‣
 * © 2025 ArcMoon Studios ◦ SPDX-License-Identifier MIT OR Apache-2.0 ◦ Author: Lord Xyn ✶
 *///◦────────────────────────────────────────────────────────────────────────────────────‣

use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion, PlotConfiguration,
};
use holoindex::{CircularConvolver, HolographicAccumulator, IndexConfig, IndexVector};

fn signal(n: usize, phase: f64) -> Vec<f64> {
    (0..n).map(|i| (i as f64 * 0.37 + phase).sin()).collect()
}

/// FFT circular convolution across vector lengths, including non powers of two
fn bench_convolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("circular_convolution");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));
    for &n in &[128usize, 500, 512, 2048] {
        let conv = CircularConvolver::new(n).unwrap();
        let a = signal(n, 0.0);
        let b = signal(n, 1.0);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, _| {
            bench.iter(|| black_box(conv.convolve(black_box(&a), black_box(&b)).unwrap()))
        });
    }
    group.finish();
}

/// One focus word with a run of neighbors through the holographic accumulator
fn bench_holographic(c: &mut Criterion) {
    let mut group = c.benchmark_group("holographic");
    let n = 512;
    let focus = IndexVector::Dense(signal(n, 0.5));
    let neighbors: Vec<IndexVector> = (0..6).map(|i| IndexVector::Dense(signal(n, i as f64))).collect();
    let mut acc = HolographicAccumulator::from_config(&IndexConfig::holographic(n).with_seed(9)).unwrap();
    group.bench_function("focus_with_six_neighbors", |b| {
        b.iter(|| {
            for (i, neighbor) in neighbors.iter().enumerate() {
                black_box(acc.contribute(&focus, neighbor, i as i32 + 1, i == 0).unwrap());
            }
        })
    });
    group.finish();
}

criterion_group!(benches, bench_convolve, bench_holographic);

criterion_main!(benches);
