//! Benchmarks for delay line operations.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use touch_synth::dsp::delay::DelayLine;

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    // Test with different delay times (in samples)
    let delay_times: &[f32] = &[
        436.4,   // one period of 110 Hz, a low string
        12000.0, // 250ms at 48kHz, the default echo
        48000.0, // 1 second at 48kHz
    ];

    for &size in BLOCK_SIZES {
        // Generate a test signal
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 * 0.1).sin())
            .collect();

        for &delay_samples in delay_times {
            let delay_ms = delay_samples / 48.0;

            let mut delay = DelayLine::new(96_000);
            let mut buffer = input.clone();
            group.bench_with_input(
                BenchmarkId::new(format!("render_{}ms", delay_ms as u32), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        delay.render(black_box(&mut buffer), black_box(delay_samples));
                    })
                },
            );
        }

        // Interpolated read with a gliding length (string retune)
        let mut delay = DelayLine::new(2_400);
        for &sample in &input {
            delay.write(sample);
        }
        group.bench_with_input(
            BenchmarkId::new("read_interpolated", size),
            &size,
            |b, _| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for i in 0..size {
                        let delay_time = 436.0 - (i as f32 / size as f32) * 218.0;
                        sum += delay.read_interpolated(black_box(delay_time));
                    }
                    sum
                })
            },
        );
    }

    group.finish();
}
