//! Sound sources for each synthesis family.
//!
//! Every note builds exactly one [`Source`], chosen once from the preset's
//! waveform tag. The source is the raw signal; the per-voice gain stage and
//! the shared effects chain are applied downstream.
//!
//! | family  | source                                  | pitch tracking      |
//! | ------- | --------------------------------------- | ------------------- |
//! | tonal   | one oscillator (+ detune, vibrato)      | glides              |
//! | piano   | three sine partials at 1×, 2×, 3×       | glides all partials |
//! | string  | Karplus-Strong resonator                | glides delay length |
//! | drums   | kick sweep or filtered noise burst      | none                |

mod drums;
mod piano;
mod string;
mod tonal;

pub use drums::{DrumKind, DrumVoice};
pub use piano::PianoVoice;
pub use string::{loop_gain, StringKind, StringResonator};
pub use tonal::TonalVoice;

use crate::dsp::oscillator::OscillatorWaveform;
use crate::graph::node::{GraphNode, RenderCtx};
use crate::preset::InstrumentPreset;

/// Smoothing time constant for pitch changes while a note is held.
pub const RETUNE_TIME_CONSTANT: f32 = 0.03;

/// Synthesis family resolved from a waveform tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Tonal(OscillatorWaveform),
    Piano,
    String(StringKind),
    Drums,
}

/// Everything a source needs at construction.
#[derive(Debug, Clone, Copy)]
pub struct SourceSpec<'a> {
    pub family: Family,
    pub frequency: f32,
    pub row_hint: Option<u32>,
    pub sample_rate: f32,
    pub seed: u32,
    pub preset: &'a InstrumentPreset,
}

pub enum Source {
    Tonal(TonalVoice),
    Piano(PianoVoice),
    String(StringResonator),
    Drum(DrumVoice),
}

impl Source {
    pub fn build(spec: SourceSpec<'_>) -> Self {
        let preset = spec.preset;
        match spec.family {
            Family::Tonal(waveform) => Source::Tonal(TonalVoice::new(
                waveform,
                spec.frequency,
                preset.detune,
                preset.vibrato_rate,
                preset.vibrato_depth,
            )),
            Family::Piano => Source::Piano(PianoVoice::new(spec.frequency)),
            Family::String(kind) => Source::String(StringResonator::new(
                kind,
                spec.frequency,
                preset.damping,
                spec.sample_rate,
                spec.seed,
            )),
            Family::Drums => Source::Drum(DrumVoice::new(
                DrumKind::from_row(spec.row_hint),
                spec.seed,
            )),
        }
    }

    /// Glide toward `frequency` from audio time `time`. Drums ignore pitch.
    pub fn retune(&mut self, frequency: f32, time: f64) {
        if !(frequency.is_finite() && frequency > 0.0) {
            return;
        }
        match self {
            Source::Tonal(voice) => voice.retune(frequency, time),
            Source::Piano(voice) => voice.retune(frequency, time),
            Source::String(voice) => voice.retune(frequency, time),
            Source::Drum(_) => {}
        }
    }

    pub fn drum_kind(&self) -> Option<DrumKind> {
        match self {
            Source::Drum(drum) => Some(drum.kind()),
            _ => None,
        }
    }
}

impl GraphNode for Source {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        match self {
            Source::Tonal(voice) => voice.render_block(out, ctx),
            Source::Piano(voice) => voice.render_block(out, ctx),
            Source::String(voice) => voice.render_block(out, ctx),
            Source::Drum(voice) => voice.render_block(out, ctx),
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        match self {
            Source::Tonal(voice) => voice.note_on(ctx),
            Source::Piano(voice) => voice.note_on(ctx),
            Source::String(voice) => voice.note_on(ctx),
            Source::Drum(voice) => voice.note_on(ctx),
        }
    }

    fn is_active(&self) -> bool {
        match self {
            Source::Tonal(voice) => voice.is_active(),
            Source::Piano(voice) => voice.is_active(),
            Source::String(voice) => voice.is_active(),
            Source::Drum(voice) => voice.is_active(),
        }
    }
}
