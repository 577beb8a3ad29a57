use crate::{
    dsp::oscillator::OscillatorBlock,
    graph::node::{GraphNode, RenderCtx},
};

/*
LFO (Low Frequency Oscillator)
==============================

An LFO is an oscillator that runs at sub-audio frequencies to modulate
parameters over time. Unlike audio oscillators (20 Hz - 20 kHz), LFOs
typically operate between 0.01 Hz - 20 Hz.

In this engine the LFO drives vibrato: `OscNode` pulls one LFO sample per
audio sample and adds it, scaled, to its frequency.

  Vibrato:    LFO → Pitch (5-7 Hz is the classic speed)

Output is bipolar, in [-1, 1].
*/

pub struct LfoNode {
    osc: OscillatorBlock,
    frequency: f32, // Hz
}

impl LfoNode {
    pub fn sine(frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::sine(),
            frequency,
        }
    }

    pub fn triangle(frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::triangle(),
            frequency,
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    #[inline]
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        self.osc.next_sample(self.frequency, sample_rate)
    }

    pub fn reset(&mut self) {
        self.osc.reset();
    }
}

impl GraphNode for LfoNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.osc.render(out, self.frequency, ctx.sample_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(mut lfo: LfoNode, len: usize) -> Vec<f32> {
        let ctx = RenderCtx::new(1_000.0, 0.0);
        let mut buffer = vec![0.0f32; len];
        lfo.render_block(&mut buffer, &ctx);
        buffer
    }

    #[test]
    fn sine_lfo_is_bipolar() {
        let buffer = render(LfoNode::sine(5.0), 1_000);
        let max = buffer.iter().cloned().fold(f32::MIN, f32::max);
        let min = buffer.iter().cloned().fold(f32::MAX, f32::min);
        assert!(max > 0.99 && min < -0.99, "range {min}..{max}");
    }

    #[test]
    fn triangle_lfo_stays_in_range() {
        let buffer = render(LfoNode::triangle(3.0), 1_000);
        assert!(buffer.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn reset_restarts_phase() {
        let mut lfo = LfoNode::sine(7.0);
        let first = lfo.next_sample(1_000.0);
        lfo.next_sample(1_000.0);
        lfo.reset();
        assert_eq!(lfo.next_sample(1_000.0), first);
    }
}
