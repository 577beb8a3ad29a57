use crate::dsp::delay::DelayLine;
use crate::dsp::filter::{SVFilter, BUTTERWORTH_Q};
use crate::dsp::oscillator::Noise;
use crate::dsp::param::AudioParam;
use crate::graph::node::{GraphNode, RenderCtx};

use super::RETUNE_TIME_CONSTANT;

/*
Karplus-Strong String
=====================

A plucked string is a loop: a burst of noise circulates through a delay line
whose length is one period of the note. Each trip around the loop passes a
low-pass filter and a gain below 1.0, so high harmonics die first and the
whole tone decays, just like a real string losing energy.

  noise (one period) ──(+)──→ [ delay 1/f ] ──┬──→ out
                        ↑                     │
                        └── × g ←── LPF ←─────┘

Loop gain:
  string / guitar   g = 0.985 − 0.05 × damping    LPF 8 kHz
  slide             g = 0.995                     LPF 12 kHz

Stability: the loop low-pass is Butterworth (Q = 1/√2), so its magnitude
never exceeds 1, and the interpolating delay read only attenuates. With
g < 1 the energy per period strictly decreases. `loop_gain` additionally
clamps g below `MAX_LOOP_GAIN` whatever the damping input is.

Pitch changes retune the delay length with a 30 ms approach, which is what
gives the slide its glide.
*/

/// Lowest pitch the resonator can reach; sizes the delay line.
pub const MIN_STRING_FREQUENCY: f32 = 20.0;
const MAX_LOOP_GAIN: f32 = 0.999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    String,
    Guitar,
    Slide,
}

impl StringKind {
    fn loop_cutoff(self) -> f32 {
        match self {
            StringKind::String | StringKind::Guitar => 8_000.0,
            StringKind::Slide => 12_000.0,
        }
    }
}

/// Feedback gain of the resonator loop. Always below 1.0.
pub fn loop_gain(kind: StringKind, damping: f32) -> f32 {
    let gain = match kind {
        StringKind::String | StringKind::Guitar => {
            let damping = if damping.is_finite() {
                damping.clamp(0.0, 1.0)
            } else {
                0.0
            };
            0.985 - damping * 0.05
        }
        StringKind::Slide => 0.995,
    };
    gain.min(MAX_LOOP_GAIN)
}

pub struct StringResonator {
    kind: StringKind,
    line: DelayLine,
    /// Loop length in seconds.
    delay: AudioParam,
    target_delay: f32,
    loop_filter: SVFilter,
    feedback: f32,
    noise: Noise,
    excitation_remaining: usize,
}

impl StringResonator {
    pub fn new(
        kind: StringKind,
        frequency: f32,
        damping: f32,
        sample_rate: f32,
        seed: u32,
    ) -> Self {
        let capacity = (sample_rate / MIN_STRING_FREQUENCY).ceil() as usize;
        let max_delay = capacity as f32 / sample_rate;
        let period = 1.0 / frequency.max(MIN_STRING_FREQUENCY);

        let mut loop_filter = SVFilter::lowpass(kind.loop_cutoff());
        loop_filter.set_q(BUTTERWORTH_Q);

        Self {
            kind,
            line: DelayLine::new(capacity),
            delay: AudioParam::with_range(period, 0.0, max_delay),
            target_delay: period,
            loop_filter,
            feedback: loop_gain(kind, damping),
            noise: Noise::new(seed),
            excitation_remaining: 0,
        }
    }

    pub fn kind(&self) -> StringKind {
        self.kind
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Current loop length in seconds.
    pub fn delay_time(&self) -> f32 {
        self.delay.value()
    }

    /// Loop length the resonator is gliding toward.
    pub fn target_delay(&self) -> f32 {
        self.target_delay
    }

    pub fn retune(&mut self, frequency: f32, time: f64) {
        self.target_delay = 1.0 / frequency.max(MIN_STRING_FREQUENCY);
        self.delay
            .set_target_at(self.target_delay, time, RETUNE_TIME_CONSTANT);
    }
}

impl GraphNode for StringResonator {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let sr = ctx.sample_rate;
        for (i, sample) in out.iter_mut().enumerate() {
            let delay_samples = self.delay.advance(ctx.time_at(i)) * sr;
            let delayed = self.line.read_interpolated(delay_samples);

            let excitation = if self.excitation_remaining > 0 {
                self.excitation_remaining -= 1;
                self.noise.next_sample()
            } else {
                0.0
            };

            let returned = self.loop_filter.process(delayed, sr) * self.feedback;
            self.line.write(excitation + returned);
            *sample = delayed;
        }
    }

    /// Pluck: one period of white noise.
    fn note_on(&mut self, ctx: &RenderCtx) {
        self.line.reset();
        self.loop_filter.reset();
        self.excitation_remaining = (self.delay.value() * ctx.sample_rate).round() as usize;
    }
}
