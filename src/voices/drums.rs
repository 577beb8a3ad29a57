//! Percussion voices.
//!
//! Drums ignore pitch. The grid row picks the instrument:
//!
//! - row 0: kick, a sine swept from 150 Hz toward 0.01 Hz over 0.5 s
//! - row 1: snare, 200 ms of white noise through a 1 kHz high-pass
//! - any other row, or none: hat, 50 ms of noise through a 7 kHz high-pass
//!
//! Each drum knows its own length and reports itself finished once that
//! much audio time has passed since `note_on`, so the renderer drops it
//! without any control-side teardown.

use crate::graph::extensions::NodeExt;
use crate::graph::filter::FilterNode;
use crate::graph::node::{GraphNode, RenderCtx};
use crate::graph::noise::NoiseNode;
use crate::graph::oscillator::OscNode;
use crate::graph::through::Through;

const KICK_START_HZ: f32 = 150.0;
const KICK_END_HZ: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrumKind {
    Kick,
    Snare,
    Hat,
}

impl DrumKind {
    pub fn from_row(row: Option<u32>) -> Self {
        match row {
            Some(0) => DrumKind::Kick,
            Some(1) => DrumKind::Snare,
            _ => DrumKind::Hat,
        }
    }

    /// Seconds from trigger to silence.
    pub fn duration(self) -> f32 {
        match self {
            DrumKind::Kick => 0.5,
            DrumKind::Snare => 0.2,
            DrumKind::Hat => 0.05,
        }
    }
}

enum Body {
    Sweep(OscNode),
    Burst(Through<NoiseNode, FilterNode>),
}

pub struct DrumVoice {
    kind: DrumKind,
    body: Body,
    ends_at: Option<f64>,
    finished: bool,
}

impl DrumVoice {
    pub fn new(kind: DrumKind, seed: u32) -> Self {
        let body = match kind {
            DrumKind::Kick => Body::Sweep(OscNode::sine(KICK_START_HZ)),
            DrumKind::Snare => Body::Burst(
                NoiseNode::burst(kind.duration(), seed).through(FilterNode::highpass(1_000.0)),
            ),
            DrumKind::Hat => Body::Burst(
                NoiseNode::burst(kind.duration(), seed).through(FilterNode::highpass(7_000.0)),
            ),
        };
        Self {
            kind,
            body,
            ends_at: None,
            finished: false,
        }
    }

    pub fn kind(&self) -> DrumKind {
        self.kind
    }
}

impl GraphNode for DrumVoice {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if self.finished {
            out.fill(0.0);
            return;
        }
        match &mut self.body {
            Body::Sweep(osc) => osc.render_block(out, ctx),
            Body::Burst(burst) => burst.render_block(out, ctx),
        }
        if let Some(end) = self.ends_at {
            if ctx.time_at(out.len()) >= end {
                self.finished = true;
            }
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        match &mut self.body {
            Body::Sweep(osc) => {
                osc.note_on(ctx);
                let sweep = osc.frequency_mut();
                sweep.set_value_at(KICK_START_HZ, ctx.time);
                sweep.exponential_ramp_to(KICK_END_HZ, ctx.time + self.kind.duration() as f64);
            }
            Body::Burst(burst) => burst.note_on(ctx),
        }
        self.ends_at = Some(ctx.time + self.kind.duration() as f64);
        self.finished = false;
    }

    fn is_active(&self) -> bool {
        !self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48_000.0;

    fn run(voice: &mut DrumVoice, seconds: f32) -> Vec<f32> {
        let total = (seconds * SR) as usize;
        let mut out = Vec::with_capacity(total);
        let mut block = vec![0.0f32; 128];
        let mut ctx = RenderCtx::new(SR, 1.0);
        voice.note_on(&ctx);
        while out.len() < total {
            voice.render_block(&mut block, &ctx);
            out.extend_from_slice(&block);
            ctx = ctx.advanced(block.len());
        }
        out
    }

    #[test]
    fn kick_sweeps_down() {
        let mut kick = DrumVoice::new(DrumKind::Kick, 1);
        run(&mut kick, 0.1);
        match &kick.body {
            Body::Sweep(osc) => {
                let f = osc.frequency();
                assert!(f < KICK_START_HZ && f > 1.0, "after 100 ms: {f}");
            }
            Body::Burst(_) => unreachable!(),
        }
    }

    #[test]
    fn each_drum_finishes_after_its_duration() {
        for kind in [DrumKind::Kick, DrumKind::Snare, DrumKind::Hat] {
            let mut drum = DrumVoice::new(kind, 9);
            run(&mut drum, kind.duration() * 0.5);
            assert!(drum.is_active(), "{kind:?} ended early");

            let mut drum = DrumVoice::new(kind, 9);
            run(&mut drum, kind.duration() + 0.01);
            assert!(!drum.is_active(), "{kind:?} never ended");
        }
    }

    #[test]
    fn hat_is_bright() {
        let mut hat = DrumVoice::new(DrumKind::Hat, 3);
        let out = run(&mut hat, 0.04);
        // A 7 kHz high-pass leaves almost no DC
        let mean: f32 = out.iter().sum::<f32>() / out.len() as f32;
        assert!(mean.abs() < 0.01);
        assert!(out.iter().any(|s| s.abs() > 0.05));
    }
}
