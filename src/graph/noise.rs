use crate::{
    dsp::oscillator::Noise,
    graph::node::{GraphNode, RenderCtx},
};

/*
Noise Burst
===========

White noise contains every frequency at equal energy. Shaped by a
high-pass filter and a short envelope it becomes percussion:

  snare:  200 ms burst → high-pass 1 kHz
  hat:     50 ms burst → high-pass 7 kHz

The burst length is fixed at construction in seconds and converted to
samples at `note_on`, when the sample rate is known. After the burst the
node outputs silence and reports itself inactive.
*/

pub struct NoiseNode {
    noise: Noise,
    duration: f32,
    remaining: usize,
}

impl NoiseNode {
    pub fn burst(duration: f32, seed: u32) -> Self {
        Self {
            noise: Noise::new(seed),
            duration: duration.max(0.0),
            remaining: 0,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }
}

impl GraphNode for NoiseNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        let audible = self.remaining.min(out.len());
        self.noise.render(&mut out[..audible]);
        out[audible..].fill(0.0);
        self.remaining -= audible;
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.remaining = (self.duration * ctx.sample_rate).round() as usize;
    }

    fn is_active(&self) -> bool {
        self.remaining > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_until_triggered() {
        let mut node = NoiseNode::burst(0.1, 1);
        let mut buffer = vec![1.0f32; 64];
        node.render_block(&mut buffer, &RenderCtx::new(1_000.0, 0.0));
        assert!(buffer.iter().all(|&s| s == 0.0));
        assert!(!node.is_active());
    }

    #[test]
    fn burst_lasts_its_duration() {
        let ctx = RenderCtx::new(1_000.0, 0.0);
        let mut node = NoiseNode::burst(0.05, 1);
        node.note_on(&ctx);

        let mut buffer = vec![0.0f32; 80];
        node.render_block(&mut buffer, &ctx);

        assert!(buffer[..50].iter().any(|&s| s != 0.0));
        assert!(buffer[50..].iter().all(|&s| s == 0.0));
        assert!(!node.is_active());
    }
}
