//! Benchmarks for automation timelines.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use touch_synth::dsp::param::AudioParam;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn advance_block(param: &mut AudioParam, start: f64, size: usize) -> f32 {
    let dt = 1.0 / SAMPLE_RATE as f64;
    let mut last = 0.0;
    for i in 0..size {
        last = param.advance(start + i as f64 * dt);
    }
    last
}

pub fn bench_param(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/param");

    for &size in BLOCK_SIZES {
        // Settled: the common case for most of a note
        let mut param = AudioParam::new(0.5);
        group.bench_with_input(BenchmarkId::new("settled", size), &size, |b, _| {
            b.iter(|| advance_block(black_box(&mut param), 1.0, size))
        });

        // An exponential release in flight
        group.bench_with_input(BenchmarkId::new("exponential", size), &size, |b, _| {
            b.iter(|| {
                let mut param = AudioParam::new(0.64);
                param.cancel_and_hold(0.0);
                param.exponential_ramp_to(0.001, 0.4);
                advance_block(black_box(&mut param), 0.0, size)
            })
        });

        // A glide toward a target (retune)
        group.bench_with_input(BenchmarkId::new("target", size), &size, |b, _| {
            b.iter(|| {
                let mut param = AudioParam::new(1.0 / 110.0);
                param.set_target_at(1.0 / 220.0, 0.0, 0.03);
                advance_block(black_box(&mut param), 0.0, size)
            })
        });
    }

    group.finish();
}
