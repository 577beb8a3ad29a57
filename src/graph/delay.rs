use crate::{
    dsp::{delay::DelayLine, param::AudioParam},
    graph::node::{GraphNode, RenderCtx},
};

/*
Feedback Delay
==============

A delay line whose output is fed back into its own input through a gain:

  in ──(+)──→ [ delay τ ] ──┬──→ out (wet only)
        ↑                   │
        └──── × feedback ───┘

Each echo is `feedback` times quieter than the one before. With feedback
below 1.0 the echoes decay geometrically; at or above 1.0 they would grow
without bound, so the feedback parameter's range stops at
`MAX_DELAY_FEEDBACK`, whatever the caller asks for.

Delay time and feedback are a-rate `AudioParam`s so preset changes can be
smoothed. A gliding delay time produces a brief pitch bend on the echoes,
the tape-delay effect.

The node outputs only the wet signal. The effects chain adds the dry path.
*/

/// Hard upper bound for the delay feedback gain.
pub const MAX_DELAY_FEEDBACK: f32 = 0.9;

pub struct DelayNode {
    line: DelayLine,
    time: AudioParam,
    feedback: AudioParam,
}

impl DelayNode {
    /// Allocate a delay line long enough for `max_seconds` at `sample_rate`.
    pub fn new(max_seconds: f32, sample_rate: f32, time: f32, feedback: f32) -> Self {
        let max_seconds = max_seconds.max(crate::MIN_TIME);
        let capacity = (max_seconds * sample_rate).ceil() as usize;
        Self {
            line: DelayLine::new(capacity),
            time: AudioParam::with_range(time, 0.0, max_seconds),
            feedback: AudioParam::with_range(feedback, 0.0, MAX_DELAY_FEEDBACK),
        }
    }

    pub fn time(&self) -> f32 {
        self.time.value()
    }

    pub fn feedback(&self) -> f32 {
        self.feedback.value()
    }

    pub fn time_mut(&mut self) -> &mut AudioParam {
        &mut self.time
    }

    pub fn feedback_mut(&mut self) -> &mut AudioParam {
        &mut self.feedback
    }

    pub fn reset(&mut self) {
        self.line.reset();
    }
}

impl GraphNode for DelayNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let sr = ctx.sample_rate;
        for (i, sample) in out.iter_mut().enumerate() {
            let t = ctx.time_at(i);
            let delay_samples = self.time.advance(t) * sr;
            let feedback = self.feedback.advance(t);

            let wet = self.line.read_interpolated(delay_samples);
            self.line.write(*sample + wet * feedback);
            *sample = wet;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse_response(node: &mut DelayNode, len: usize) -> Vec<f32> {
        let mut buffer = vec![0.0f32; len];
        buffer[0] = 1.0;
        node.render_block(&mut buffer, &RenderCtx::new(1_000.0, 0.0));
        buffer
    }

    #[test]
    fn echoes_decay_by_feedback() {
        let mut node = DelayNode::new(1.0, 1_000.0, 0.1, 0.5);
        let buffer = impulse_response(&mut node, 400);

        assert!((buffer[100] - 1.0).abs() < 1e-6);
        assert!((buffer[200] - 0.5).abs() < 1e-6);
        assert!((buffer[300] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn feedback_is_bounded_below_unity() {
        let mut node = DelayNode::new(1.0, 1_000.0, 0.1, 5.0);
        assert_eq!(node.feedback(), MAX_DELAY_FEEDBACK);

        node.feedback_mut().set_target_at(2.0, 0.0, 0.01);
        let buffer = impulse_response(&mut node, 4_000);
        let tail = buffer[3_000..].iter().fold(0.0f32, |a, &x| a.max(x.abs()));
        assert!(node.feedback() <= MAX_DELAY_FEEDBACK);
        assert!(tail < 0.1, "echoes should keep decaying, tail {tail}");
    }

    #[test]
    fn time_is_clamped_to_capacity() {
        let node = DelayNode::new(0.5, 1_000.0, 3.0, 0.2);
        assert_eq!(node.time(), 0.5);
    }
}
