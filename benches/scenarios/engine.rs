//! Benchmarks for the full render path.
//!
//! A chord of held notes through the engine, effects and master, pulled
//! through a manual backend the way a device callback would.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use touch_synth::{Engine, EngineConfig, ManualBackend, PresetPatch, Waveform};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

const CHORD: &[f32] = &[130.81, 164.81, 196.0, 246.94, 293.66, 392.0];

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    let patches = [
        ("saw_chord", PresetPatch::waveform(Waveform::Sawtooth).with_distortion(0.3)),
        ("guitar_chord", PresetPatch::waveform(Waveform::Guitar)),
        ("piano_chord", PresetPatch::waveform(Waveform::Piano)),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, patch) in &patches {
            let (backend, handle) = ManualBackend::new(SAMPLE_RATE);
            let mut engine = Engine::new(EngineConfig::default(), backend);
            engine.update_preset(patch);
            for (id, &frequency) in CHORD.iter().enumerate() {
                engine.note_on(id as u32, frequency, None);
            }

            group.bench_with_input(BenchmarkId::new(*name, size), &size, |b, _| {
                b.iter(|| {
                    handle.render(black_box(&mut buffer));
                })
            });
            drop(engine);
        }
    }

    group.finish();
}
