//! Additive piano voice.
//!
//! Three sine partials at 1×, 2× and 3× the fundamental with 1/n weights,
//! normalized so the sum never exceeds full scale. The piano's percussive
//! shape comes from its fixed envelope (5 ms attack, 2 s decay), not from
//! the partials themselves.

use crate::dsp::mix::sum_scaled_in_place;
use crate::graph::node::{GraphNode, RenderCtx};
use crate::graph::oscillator::OscNode;
use crate::MAX_BLOCK_SIZE;

use super::RETUNE_TIME_CONSTANT;

const PARTIALS: usize = 3;
// 1/n, scaled by 1 / (1 + 1/2 + 1/3)
const PARTIAL_GAINS: [f32; PARTIALS] = [6.0 / 11.0, 3.0 / 11.0, 2.0 / 11.0];

pub struct PianoVoice {
    partials: [OscNode; PARTIALS],
    scratch: Box<[f32]>,
}

impl PianoVoice {
    pub fn new(frequency: f32) -> Self {
        Self {
            partials: [
                OscNode::sine(frequency),
                OscNode::sine(frequency * 2.0),
                OscNode::sine(frequency * 3.0),
            ],
            scratch: vec![0.0; MAX_BLOCK_SIZE].into_boxed_slice(),
        }
    }

    /// Glide every partial, keeping the harmonic ratios.
    pub fn retune(&mut self, frequency: f32, time: f64) {
        for (n, partial) in self.partials.iter_mut().enumerate() {
            partial.frequency_mut().set_target_at(
                frequency * (n + 1) as f32,
                time,
                RETUNE_TIME_CONSTANT,
            );
        }
    }

    pub fn partial_frequencies(&self) -> [f32; PARTIALS] {
        [
            self.partials[0].frequency(),
            self.partials[1].frequency(),
            self.partials[2].frequency(),
        ]
    }
}

impl GraphNode for PianoVoice {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let mut offset = 0;
        for chunk in out.chunks_mut(self.scratch.len()) {
            let chunk_ctx = ctx.advanced(offset);
            chunk.fill(0.0);
            for (partial, &gain) in self.partials.iter_mut().zip(PARTIAL_GAINS.iter()) {
                let scratch = &mut self.scratch[..chunk.len()];
                partial.render_block(scratch, &chunk_ctx);
                sum_scaled_in_place(chunk, scratch, gain);
            }
            offset += chunk.len();
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        for partial in &mut self.partials {
            partial.note_on(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partials_are_harmonic() {
        let voice = PianoVoice::new(110.0);
        assert_eq!(voice.partial_frequencies(), [110.0, 220.0, 330.0]);
    }

    #[test]
    fn output_stays_within_full_scale() {
        let mut voice = PianoVoice::new(261.63);
        let mut buffer = vec![0.0f32; 4096];
        voice.render_block(&mut buffer, &RenderCtx::new(48_000.0, 0.0));
        assert!(buffer.iter().all(|s| s.abs() <= 1.0));
        assert!(buffer.iter().any(|s| s.abs() > 0.3));
    }

    #[test]
    fn retune_moves_all_partials() {
        let ctx = RenderCtx::new(48_000.0, 0.0);
        let mut voice = PianoVoice::new(100.0);
        voice.retune(200.0, 0.0);
        let mut buffer = vec![0.0f32; 512];
        for block in 0..60 {
            voice.render_block(&mut buffer, &ctx.advanced(512 * block));
        }
        let [f1, f2, f3] = voice.partial_frequencies();
        assert!((f1 - 200.0).abs() < 1.0);
        assert!((f2 - 400.0).abs() < 2.0);
        assert!((f3 - 600.0).abs() < 3.0);
    }
}
