//! Tonal voice: a single oscillator in the preset's shape.

use crate::dsp::oscillator::OscillatorWaveform;
use crate::graph::node::{GraphNode, RenderCtx};
use crate::graph::oscillator::OscNode;

use super::RETUNE_TIME_CONSTANT;

pub struct TonalVoice {
    osc: OscNode,
}

impl TonalVoice {
    pub fn new(
        waveform: OscillatorWaveform,
        frequency: f32,
        detune_cents: f32,
        vibrato_rate: f32,
        vibrato_depth: f32,
    ) -> Self {
        let osc = OscNode::new(waveform, frequency)
            .with_detune(detune_cents)
            .with_vibrato(vibrato_rate, vibrato_depth);
        Self { osc }
    }

    pub fn retune(&mut self, frequency: f32, time: f64) {
        self.osc
            .frequency_mut()
            .set_target_at(frequency, time, RETUNE_TIME_CONSTANT);
    }

    pub fn oscillator(&self) -> &OscNode {
        &self.osc
    }
}

impl GraphNode for TonalVoice {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.osc.render_block(out, ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.osc.note_on(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_preset_detune_and_vibrato() {
        let voice = TonalVoice::new(OscillatorWaveform::Saw, 330.0, 12.0, 5.0, 0.4);
        assert_eq!(voice.oscillator().detune_cents(), 12.0);
        assert!(voice.oscillator().has_vibrato());
        assert_eq!(voice.oscillator().waveform(), OscillatorWaveform::Saw);
    }

    #[test]
    fn retune_glides_rather_than_jumps() {
        let ctx = RenderCtx::new(48_000.0, 0.0);
        let mut voice = TonalVoice::new(OscillatorWaveform::Sine, 220.0, 0.0, 0.0, 0.0);
        voice.retune(440.0, 0.0);

        let mut buffer = vec![0.0f32; 48]; // 1 ms
        voice.render_block(&mut buffer, &ctx);
        let f = voice.oscillator().frequency();
        assert!(f > 220.0 && f < 240.0, "after 1 ms: {f}");
    }
}
