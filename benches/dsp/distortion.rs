//! Benchmarks for waveshaping distortion.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use touch_synth::dsp::distortion::{self, CURVE_LEN};

use crate::BLOCK_SIZES;

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");

    let mut curve = vec![0.0f32; CURVE_LEN];
    distortion::fill_drive_curve(&mut curve, 0.6);

    // Curve regeneration happens on every preset change
    group.bench_function("fill_curve", |b| {
        b.iter(|| distortion::fill_drive_curve(black_box(&mut curve), black_box(0.6)))
    });

    for &size in BLOCK_SIZES {
        // Generate a test signal (sine-like values)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 * 0.1).sin())
            .collect();

        // Table lookup with interpolation
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("shape", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                distortion::shape_buffer(black_box(&mut buffer), black_box(&curve));
            })
        });

        // Evaluating the curve directly, for comparison
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("direct", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                for sample in buffer.iter_mut() {
                    *sample = distortion::drive_curve(*sample, black_box(0.6));
                }
            })
        });
    }

    group.finish();
}
