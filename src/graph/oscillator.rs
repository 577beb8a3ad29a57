use crate::dsp::oscillator::{OscillatorBlock, OscillatorWaveform};
use crate::dsp::param::AudioParam;
use crate::graph::lfo::LfoNode;
use crate::graph::node::{GraphNode, RenderCtx};

/*
Audio Oscillator
================

An oscillator is the fundamental sound source in a synthesizer. It generates
a repeating waveform at a specific frequency (pitch), producing the raw
audio material that gets shaped by filters, envelopes, and effects.

Waveform Types and Their Character:
-----------------------------------

Sine:     fundamental only. Smooth, flute-like. Used for piano partials and
          the kick drum sweep.
Sawtooth: all harmonics falling off as 1/n. Bright and buzzy.
Square:   odd harmonics falling off as 1/n. Hollow, clarinet-like.
Triangle: odd harmonics falling off as 1/n². Soft and mellow.

Frequency as an Automatable Parameter:
--------------------------------------
The frequency is an `AudioParam` evaluated once per sample (a-rate). That
lets a single node cover three different jobs:

  Touch glide:  frequency.set_target_at(new_hz, now, 0.03)
                 glides smoothly toward the finger's new pitch

  Kick sweep:   frequency.set_value_at(150.0, now)
                frequency.exponential_ramp_to(0.01, now + 0.5)
                 the classic 808-style pitch drop

  Fixed tone:   frequency.set_value(hz)

Detune and Vibrato:
-------------------
Detune is a fixed offset in cents (100 cents = 1 semitone):

  detuned = frequency × 2^(cents / 1200)

Vibrato is a sine LFO added to the frequency. Its depth scales with the
pitch being played so it sounds equally wide across the keyboard:

  f(t) = detuned + sin(2π · rate · t) × depth × detuned × 0.05

  depth 0.2 → ±1% of the pitch (about ±17 cents)

Example usage:
  let lead = OscNode::new(OscillatorWaveform::Saw, 220.0)
      .with_detune(7.0)
      .with_vibrato(5.0, 0.2);
*/

const MIN_FREQUENCY: f32 = 0.0;
const MAX_FREQUENCY: f32 = 20_000.0;
const VIBRATO_SCALE: f32 = 0.05;

struct Vibrato {
    lfo: LfoNode,
    depth: f32,
}

pub struct OscNode {
    osc: OscillatorBlock,
    frequency: AudioParam,
    /// Fixed detune ratio derived from cents.
    detune_ratio: f32,
    detune_cents: f32,
    vibrato: Option<Vibrato>,
}

impl OscNode {
    pub fn new(waveform: OscillatorWaveform, frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::new(waveform),
            frequency: AudioParam::with_range(frequency, MIN_FREQUENCY, MAX_FREQUENCY),
            detune_ratio: 1.0,
            detune_cents: 0.0,
            vibrato: None,
        }
    }

    pub fn sine(frequency: f32) -> Self {
        Self::new(OscillatorWaveform::Sine, frequency)
    }

    pub fn sawtooth(frequency: f32) -> Self {
        Self::new(OscillatorWaveform::Saw, frequency)
    }

    pub fn square(frequency: f32) -> Self {
        Self::new(OscillatorWaveform::Square, frequency)
    }

    pub fn triangle(frequency: f32) -> Self {
        Self::new(OscillatorWaveform::Triangle, frequency)
    }

    /// Set detune in cents (100 cents = 1 semitone).
    pub fn with_detune(mut self, cents: f32) -> Self {
        self.detune_cents = cents;
        self.detune_ratio = 2.0_f32.powf(cents / 1200.0);
        self
    }

    /// Add sinusoidal vibrato at `rate` Hz. A zero rate or depth leaves the
    /// oscillator untouched.
    pub fn with_vibrato(mut self, rate: f32, depth: f32) -> Self {
        self.vibrato = if rate > 0.0 && depth > 0.0 {
            Some(Vibrato {
                lfo: LfoNode::sine(rate),
                depth,
            })
        } else {
            None
        };
        self
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.osc.waveform()
    }

    pub fn detune_cents(&self) -> f32 {
        self.detune_cents
    }

    pub fn has_vibrato(&self) -> bool {
        self.vibrato.is_some()
    }

    /// Frequency produced at the last rendered sample, before detune.
    pub fn frequency(&self) -> f32 {
        self.frequency.value()
    }

    pub fn frequency_mut(&mut self) -> &mut AudioParam {
        &mut self.frequency
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let sr = ctx.sample_rate;
        for (i, sample) in out.iter_mut().enumerate() {
            let base = self.frequency.advance(ctx.time_at(i)) * self.detune_ratio;
            let freq = match self.vibrato.as_mut() {
                Some(vibrato) => {
                    base + vibrato.lfo.next_sample(sr) * vibrato.depth * base * VIBRATO_SCALE
                }
                None => base,
            };
            *sample = self.osc.next_sample(freq, sr);
        }
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.osc.reset();
        if let Some(vibrato) = self.vibrato.as_mut() {
            vibrato.lfo.reset();
        }
    }
}
