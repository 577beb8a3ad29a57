use crate::{
    dsp::param::AudioParam,
    graph::node::{GraphNode, RenderCtx},
};

/*
Gain Stage
==========

Multiplies the incoming signal by an automatable gain, one value per sample:

  out[n] = in[n] × gain(t_n)

This is where envelopes live. The envelope controller schedules ramps on
the gain parameter (attack, decay, release) instead of running a state
machine, so a voice's loudness is fully described by its automation
timeline. The master volume is the same node with a 50 ms approach.

  gain
    0.8 ┐   ╱‾‾‾‾╲____________
        │  ╱                  ╲
        │ ╱                    ╲__
    0.0 └╱─────────────────────────‾‾───→ time
        attack  decay  sustain   release
*/

pub struct GainNode {
    gain: AudioParam,
}

impl GainNode {
    pub fn new(gain: f32) -> Self {
        Self {
            gain: AudioParam::with_range(gain, 0.0, f32::MAX),
        }
    }

    pub fn gain(&self) -> f32 {
        self.gain.value()
    }

    pub fn gain_mut(&mut self) -> &mut AudioParam {
        &mut self.gain
    }
}

impl GraphNode for GainNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if self.gain.is_settled() {
            crate::dsp::amplify::apply_gain(out, self.gain.value());
            return;
        }
        for (i, sample) in out.iter_mut().enumerate() {
            *sample *= self.gain.advance(ctx.time_at(i));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_gain_scales_signal() {
        let mut node = GainNode::new(0.5);
        let mut buffer = vec![1.0f32; 16];
        node.render_block(&mut buffer, &RenderCtx::new(1_000.0, 0.0));
        assert!(buffer.iter().all(|&s| s == 0.5));
    }

    #[test]
    fn linear_ramp_is_sample_accurate() {
        let mut node = GainNode::new(0.0);
        node.gain_mut().set_value_at(0.0, 0.0);
        node.gain_mut().linear_ramp_to(1.0, 0.1);

        let mut buffer = vec![1.0f32; 200];
        node.render_block(&mut buffer, &RenderCtx::new(1_000.0, 0.0));

        assert!((buffer[50] - 0.5).abs() < 1e-4);
        assert!((buffer[100] - 1.0).abs() < 1e-6);
        assert!((buffer[150] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn gain_never_goes_negative() {
        let mut node = GainNode::new(1.0);
        node.gain_mut().set_value(-3.0);
        assert_eq!(node.gain(), 0.0);
    }
}
