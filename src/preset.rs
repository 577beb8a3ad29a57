//! Instrument presets.
//!
//! A preset is a plain value describing how new voices sound and how the
//! shared effects chain is set. Collaborators (preset catalogs, generators,
//! UI panels) hand the engine partial updates as a [`PresetPatch`]; the
//! engine merges them into its active preset.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::oscillator::OscillatorWaveform;
use crate::voices::{Family, StringKind};

/// Waveform tag selecting a synthesis family.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
    String,
    Piano,
    Guitar,
    Slide,
    Drums,
}

impl Waveform {
    pub const ALL: [Waveform; 9] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
        Waveform::String,
        Waveform::Piano,
        Waveform::Guitar,
        Waveform::Slide,
        Waveform::Drums,
    ];

    /// Synthesis family this tag builds. Every tag maps explicitly.
    pub fn family(self) -> Family {
        match self {
            Waveform::Sine => Family::Tonal(OscillatorWaveform::Sine),
            Waveform::Square => Family::Tonal(OscillatorWaveform::Square),
            Waveform::Sawtooth => Family::Tonal(OscillatorWaveform::Saw),
            Waveform::Triangle => Family::Tonal(OscillatorWaveform::Triangle),
            Waveform::Piano => Family::Piano,
            Waveform::String => Family::String(StringKind::String),
            Waveform::Guitar => Family::String(StringKind::Guitar),
            Waveform::Slide => Family::String(StringKind::Slide),
            Waveform::Drums => Family::Drums,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
            Waveform::String => "string",
            Waveform::Piano => "piano",
            Waveform::Guitar => "guitar",
            Waveform::Slide => "slide",
            Waveform::Drums => "drums",
        }
    }
}

/// Upper bound for delay feedback, shared with the delay node.
pub use crate::graph::delay::MAX_DELAY_FEEDBACK;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentPreset {
    pub name: String,
    pub waveform: Waveform,
    /// Hz, clamped to 20..=18000 where it is used.
    pub filter_cutoff: f32,
    /// Filter Q.
    pub resonance: f32,
    /// Seconds.
    pub attack: f32,
    /// Seconds from peak to sustain level.
    pub decay: f32,
    /// Fraction of the attack peak held while the note is down.
    pub sustain: f32,
    /// Seconds.
    pub release: f32,
    /// Cents.
    pub detune: f32,
    /// Hz.
    pub vibrato_rate: f32,
    pub vibrato_depth: f32,
    /// Drive, 0..=1.
    pub distortion: f32,
    /// 0..=0.9
    pub delay_feedback: f32,
    /// Seconds.
    pub delay_time: f32,
    /// Reserved.
    pub reverb_wet: f32,
    /// Reserved.
    pub feedback: f32,
    /// String damping, 0..=1.
    pub damping: f32,
}

impl Default for InstrumentPreset {
    fn default() -> Self {
        Self {
            name: "Init".to_string(),
            waveform: Waveform::Sine,
            filter_cutoff: 8_000.0,
            resonance: 1.0,
            attack: 0.02,
            decay: 0.2,
            sustain: 0.8,
            release: 0.4,
            detune: 0.0,
            vibrato_rate: 0.0,
            vibrato_depth: 0.0,
            distortion: 0.0,
            delay_feedback: 0.3,
            delay_time: 0.25,
            reverb_wet: 0.0,
            feedback: 0.0,
            damping: 0.5,
        }
    }
}

impl InstrumentPreset {
    pub fn new(name: impl Into<String>, waveform: Waveform) -> Self {
        Self {
            name: name.into(),
            waveform,
            ..Self::default()
        }
    }

    /// Merge the fields present in `patch`, then bring every field back into
    /// its valid range.
    pub fn apply(&mut self, patch: &PresetPatch) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = patch.$field.clone() {
                    self.$field = value;
                })*
            };
        }
        merge!(
            name,
            waveform,
            filter_cutoff,
            resonance,
            attack,
            decay,
            sustain,
            release,
            detune,
            vibrato_rate,
            vibrato_depth,
            distortion,
            delay_feedback,
            delay_time,
            reverb_wet,
            feedback,
            damping,
        );
        self.sanitize();
    }

    fn sanitize(&mut self) {
        fn finite_or(value: f32, fallback: f32) -> f32 {
            if value.is_finite() {
                value
            } else {
                fallback
            }
        }
        let defaults = Self::default();

        self.filter_cutoff = finite_or(self.filter_cutoff, defaults.filter_cutoff).max(0.0);
        self.resonance = finite_or(self.resonance, defaults.resonance).max(0.0);
        self.attack = finite_or(self.attack, defaults.attack).max(0.0);
        self.decay = finite_or(self.decay, defaults.decay).max(0.0);
        self.sustain = finite_or(self.sustain, defaults.sustain).clamp(0.0, 1.0);
        self.release = finite_or(self.release, defaults.release).max(0.0);
        self.detune = finite_or(self.detune, 0.0);
        self.vibrato_rate = finite_or(self.vibrato_rate, 0.0).max(0.0);
        self.vibrato_depth = finite_or(self.vibrato_depth, 0.0).max(0.0);
        self.distortion = finite_or(self.distortion, 0.0).clamp(0.0, 1.0);
        self.delay_feedback =
            finite_or(self.delay_feedback, defaults.delay_feedback).clamp(0.0, MAX_DELAY_FEEDBACK);
        self.delay_time = finite_or(self.delay_time, defaults.delay_time).max(0.0);
        self.reverb_wet = finite_or(self.reverb_wet, 0.0).clamp(0.0, 1.0);
        self.feedback = finite_or(self.feedback, 0.0).clamp(0.0, 1.0);
        self.damping = finite_or(self.damping, defaults.damping).clamp(0.0, 1.0);
    }
}

/// Partial preset update. Absent fields keep their current value.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetPatch {
    pub name: Option<String>,
    pub waveform: Option<Waveform>,
    pub filter_cutoff: Option<f32>,
    pub resonance: Option<f32>,
    pub attack: Option<f32>,
    pub decay: Option<f32>,
    pub sustain: Option<f32>,
    pub release: Option<f32>,
    pub detune: Option<f32>,
    pub vibrato_rate: Option<f32>,
    pub vibrato_depth: Option<f32>,
    pub distortion: Option<f32>,
    pub delay_feedback: Option<f32>,
    pub delay_time: Option<f32>,
    pub reverb_wet: Option<f32>,
    pub feedback: Option<f32>,
    pub damping: Option<f32>,
}

impl PresetPatch {
    /// Patch that replaces every field with `preset`'s.
    pub fn full(preset: &InstrumentPreset) -> Self {
        Self {
            name: Some(preset.name.clone()),
            waveform: Some(preset.waveform),
            filter_cutoff: Some(preset.filter_cutoff),
            resonance: Some(preset.resonance),
            attack: Some(preset.attack),
            decay: Some(preset.decay),
            sustain: Some(preset.sustain),
            release: Some(preset.release),
            detune: Some(preset.detune),
            vibrato_rate: Some(preset.vibrato_rate),
            vibrato_depth: Some(preset.vibrato_depth),
            distortion: Some(preset.distortion),
            delay_feedback: Some(preset.delay_feedback),
            delay_time: Some(preset.delay_time),
            reverb_wet: Some(preset.reverb_wet),
            feedback: Some(preset.feedback),
            damping: Some(preset.damping),
        }
    }

    pub fn waveform(waveform: Waveform) -> Self {
        Self {
            waveform: Some(waveform),
            ..Self::default()
        }
    }

    pub fn with_filter_cutoff(mut self, hz: f32) -> Self {
        self.filter_cutoff = Some(hz);
        self
    }

    pub fn with_resonance(mut self, q: f32) -> Self {
        self.resonance = Some(q);
        self
    }

    pub fn with_envelope(mut self, attack: f32, release: f32) -> Self {
        self.attack = Some(attack);
        self.release = Some(release);
        self
    }

    pub fn with_distortion(mut self, drive: f32) -> Self {
        self.distortion = Some(drive);
        self
    }

    pub fn with_delay(mut self, time: f32, feedback: f32) -> Self {
        self.delay_time = Some(time);
        self.delay_feedback = Some(feedback);
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = Some(damping);
        self
    }

    pub fn with_vibrato(mut self, rate: f32, depth: f32) -> Self {
        self.vibrato_rate = Some(rate);
        self.vibrato_depth = Some(depth);
        self
    }

    pub fn with_detune(mut self, cents: f32) -> Self {
        self.detune = Some(cents);
        self
    }
}

impl From<InstrumentPreset> for PresetPatch {
    fn from(preset: InstrumentPreset) -> Self {
        Self::full(&preset)
    }
}
