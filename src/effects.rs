//! The shared effects chain.
//!
//! ```text
//! voices ─→ distortion ─→ low-pass ─┬──────────────────(+)─→ (+ loops) ─→ master ─→ out
//!                                   │                   ↑
//!                                   └─→ delay ⟲ feedback┘
//! ```
//!
//! One instance lives in the render context. Preset changes arrive as
//! [`EffectsSettings`] and are applied as smoothed retargets, except the
//! distortion curve, which is regenerated outright.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::mix::sum_in_place;
use crate::graph::delay::{DelayNode, MAX_DELAY_FEEDBACK};
use crate::graph::distortion::DistortionNode;
use crate::graph::filter::FilterNode;
use crate::graph::gain::GainNode;
use crate::graph::node::{GraphNode, RenderCtx};
use crate::preset::InstrumentPreset;
use crate::MAX_BLOCK_SIZE;

pub const MIN_CUTOFF: f32 = 20.0;
pub const MAX_CUTOFF: f32 = 18_000.0;
/// Cutoff added per unit of vertical touch expression.
pub const EXPRESSION_CUTOFF_RANGE: f32 = 4_000.0;

const FILTER_TIME_CONSTANT: f32 = 0.05;
const DELAY_TIME_CONSTANT: f32 = 0.1;
const FEEDBACK_TIME_CONSTANT: f32 = 0.05;
const MASTER_TIME_CONSTANT: f32 = 0.05;

/// Effect parameters derived from a preset, already clamped to safe ranges.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectsSettings {
    pub cutoff: f32,
    pub resonance: f32,
    pub drive: f32,
    pub delay_time: f32,
    pub delay_feedback: f32,
}

impl EffectsSettings {
    pub fn from_preset(preset: &InstrumentPreset) -> Self {
        Self {
            cutoff: clamp_cutoff(preset.filter_cutoff),
            resonance: preset.resonance.max(0.0),
            drive: preset.distortion.clamp(0.0, 1.0),
            delay_time: preset.delay_time.max(0.0),
            delay_feedback: preset.delay_feedback.clamp(0.0, MAX_DELAY_FEEDBACK),
        }
    }
}

impl Default for EffectsSettings {
    fn default() -> Self {
        Self::from_preset(&InstrumentPreset::default())
    }
}

/// Clamp a cutoff into the audible range the chain accepts.
pub fn clamp_cutoff(hz: f32) -> f32 {
    if hz.is_finite() {
        hz.clamp(MIN_CUTOFF, MAX_CUTOFF)
    } else {
        MAX_CUTOFF
    }
}

/// Cutoff for a base preset cutoff moved by vertical expression.
pub fn expression_cutoff(base: f32, mod_y: f32) -> f32 {
    let mod_y = if mod_y.is_finite() { mod_y } else { 0.0 };
    clamp_cutoff(base + mod_y * EXPRESSION_CUTOFF_RANGE)
}

pub struct EffectsChain {
    distortion: DistortionNode,
    filter: FilterNode,
    delay: DelayNode,
    master: GainNode,
    wet: Box<[f32]>,
}

impl EffectsChain {
    pub fn new(
        settings: EffectsSettings,
        sample_rate: f32,
        max_delay_seconds: f32,
        master_volume: f32,
    ) -> Self {
        Self {
            distortion: DistortionNode::new(settings.drive),
            filter: FilterNode::lowpass(settings.cutoff).with_q(settings.resonance),
            delay: DelayNode::new(
                max_delay_seconds,
                sample_rate,
                settings.delay_time,
                settings.delay_feedback,
            ),
            master: GainNode::new(master_volume.clamp(0.0, 1.0)),
            wet: vec![0.0; MAX_BLOCK_SIZE].into_boxed_slice(),
        }
    }

    /// Retarget every effect parameter from `time`.
    pub fn apply(&mut self, settings: &EffectsSettings, time: f64) {
        self.distortion.set_drive(settings.drive);
        self.filter
            .cutoff_mut()
            .set_target_at(clamp_cutoff(settings.cutoff), time, FILTER_TIME_CONSTANT);
        self.filter
            .q_mut()
            .set_target_at(settings.resonance.max(0.0), time, FILTER_TIME_CONSTANT);
        self.delay
            .time_mut()
            .set_target_at(settings.delay_time.max(0.0), time, DELAY_TIME_CONSTANT);
        self.delay.feedback_mut().set_target_at(
            settings.delay_feedback.clamp(0.0, MAX_DELAY_FEEDBACK),
            time,
            FEEDBACK_TIME_CONSTANT,
        );
    }

    /// Glide the filter cutoff (touch expression). Last writer wins.
    pub fn set_cutoff(&mut self, hz: f32, time: f64) {
        self.filter
            .cutoff_mut()
            .set_target_at(clamp_cutoff(hz), time, FILTER_TIME_CONSTANT);
    }

    pub fn set_master_volume(&mut self, level: f32, time: f64) {
        self.master
            .gain_mut()
            .set_target_at(level.clamp(0.0, 1.0), time, MASTER_TIME_CONSTANT);
    }

    /// Run the voice bus through distortion, filter and delay, in place.
    /// Loops are summed into the result before the master gain.
    pub fn process(&mut self, bus: &mut [f32], loops: &[f32], ctx: &RenderCtx) {
        debug_assert!(bus.len() <= self.wet.len());
        let n = bus.len();

        self.distortion.render_block(bus, ctx);
        self.filter.render_block(bus, ctx);

        let wet = &mut self.wet[..n];
        wet.copy_from_slice(bus);
        self.delay.render_block(wet, ctx);
        sum_in_place(bus, wet);

        sum_in_place(bus, &loops[..n.min(loops.len())]);
        self.master.render_block(bus, ctx);
    }

    pub fn drive(&self) -> f32 {
        self.distortion.drive()
    }

    pub fn cutoff(&self) -> f32 {
        self.filter.cutoff()
    }

    pub fn resonance(&self) -> f32 {
        self.filter.q()
    }

    pub fn delay_time(&self) -> f32 {
        self.delay.time()
    }

    pub fn delay_feedback(&self) -> f32 {
        self.delay.feedback()
    }

    pub fn master_volume(&self) -> f32 {
        self.master.gain()
    }

    pub fn reset(&mut self) {
        self.filter.reset();
        self.delay.reset();
    }
}
