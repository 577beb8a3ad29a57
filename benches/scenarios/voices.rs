//! Benchmarks for complete voices.
//!
//! Each family is built the way the engine builds it and rendered through
//! its envelope gain, one voice at a time.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use touch_synth::graph::node::RenderCtx;
use touch_synth::synth::{Envelope, Voice, VoiceKey};
use touch_synth::voices::{Source, SourceSpec};
use touch_synth::{InstrumentPreset, Waveform};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn build(waveform: Waveform, frequency: f32, row: Option<u32>) -> Voice {
    let preset = InstrumentPreset {
        vibrato_rate: 5.0,
        vibrato_depth: 0.2,
        detune: 7.0,
        ..InstrumentPreset::new("bench", waveform)
    };
    let family = waveform.family();
    let source = Source::build(SourceSpec {
        family,
        frequency,
        row_hint: row,
        sample_rate: SAMPLE_RATE,
        seed: 0xBEEF,
        preset: &preset,
    });
    let envelope = Envelope::for_family(family, &preset, source.drum_kind());
    Voice::new(1, VoiceKey::default(), source, envelope)
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let ctx = RenderCtx::new(SAMPLE_RATE, 0.0);

    let cases: &[(&str, Waveform, f32, Option<u32>)] = &[
        ("sawtooth_vibrato", Waveform::Sawtooth, 220.0, None),
        ("piano", Waveform::Piano, 261.63, None),
        ("guitar", Waveform::Guitar, 110.0, None),
        ("slide", Waveform::Slide, 196.0, None),
        ("kick", Waveform::Drums, 0.0, Some(0)),
        ("snare", Waveform::Drums, 0.0, Some(1)),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for &(name, waveform, frequency, row) in cases {
            let mut voice = build(waveform, frequency, row);
            voice.start(&ctx);
            let mut ctx = ctx;
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    voice.render(black_box(&mut buffer), black_box(&ctx));
                    ctx = ctx.advanced(size);
                })
            });
        }
    }

    group.finish();
}
