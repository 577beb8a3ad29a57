use crate::dsp::param::AudioParam;
use crate::preset::InstrumentPreset;
use crate::voices::{DrumKind, Family, StringKind};

/*
Envelope Controller
===================

An envelope shapes a voice's loudness over time. Here it is not a running
state machine: it schedules ramps on the voice's gain parameter, and the
gain stage renders them sample-accurately.

Per-Family Shapes
-----------------

  generic (tonal, string, guitar)
    0 ──linear──→ 0.8 over preset attack
      ──linear──→ 0.8 × sustain over preset decay, then held

  piano (fixed, ignores preset attack/decay)
    0 ──linear──→ 0.6 over 5 ms
      ──exponential──→ 0.01 over 2 s

  slide
    0 ──linear──→ 0.9 over 10 ms, then held

  drums
    0 ──linear──→ 1.0 over 1 ms
      ──exponential──→ 0.001 over the drum's length

  gain
   0.8 ┤  ╱‾‾‾╲______
       │ ╱           ╲        generic, released
       │╱              ╲__
     0 ┼───────────────────‾‾──→ time
        A   D    S     R

Release
-------
On note-off the pending ramps are cancelled and the gain is frozen at
whatever it reached, then ramps exponentially toward 0.001 over the
preset release. Exponential ramps cannot reach zero, and 0.001 (-60 dB) is
inaudible, so the voice is torn down `TEARDOWN_SLACK` after the ramp ends
rather than waiting for true silence. Drums skip release entirely.
*/

/// Extra time after the release ramp before a voice is torn down.
pub const TEARDOWN_SLACK: f64 = 0.1;

/// Audio time at which a voice whose last ramp starts at `from` and lasts
/// `length` seconds may be torn down.
pub fn teardown_at(from: f64, length: f32) -> f64 {
    from + length as f64 + TEARDOWN_SLACK
}

/// Gain the release ramp approaches.
pub const RELEASE_FLOOR: f32 = 0.001;
/// Shortest release, so note-off never clicks.
pub const MIN_RELEASE: f32 = 0.005;

const GENERIC_PEAK: f32 = 0.8;
const PIANO_PEAK: f32 = 0.6;
const PIANO_ATTACK: f32 = 0.005;
const PIANO_DECAY_FLOOR: f32 = 0.01;
const PIANO_DECAY: f32 = 2.0;
const SLIDE_PEAK: f32 = 0.9;
const SLIDE_ATTACK: f32 = 0.01;
const DRUM_PEAK: f32 = 1.0;
const DRUM_ATTACK: f32 = 0.001;
const DRUM_FLOOR: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Shape {
    Sustained {
        peak: f32,
        attack: f32,
        decay: f32,
        sustain: f32,
    },
    Piano,
    Drum {
        length: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    shape: Shape,
    release: f32,
}

impl Envelope {
    /// Envelope for a new voice of `family`. `drum` is the resolved drum
    /// instrument when the family is drums.
    pub fn for_family(family: Family, preset: &InstrumentPreset, drum: Option<DrumKind>) -> Self {
        let shape = match family {
            Family::Piano => Shape::Piano,
            Family::String(StringKind::Slide) => Shape::Sustained {
                peak: SLIDE_PEAK,
                attack: SLIDE_ATTACK,
                decay: 0.0,
                sustain: 1.0,
            },
            Family::Drums => Shape::Drum {
                length: drum.unwrap_or(DrumKind::Hat).duration(),
            },
            Family::Tonal(_) | Family::String(_) => Shape::Sustained {
                peak: GENERIC_PEAK,
                attack: preset.attack.max(0.0),
                decay: preset.decay.max(0.0),
                sustain: preset.sustain.clamp(0.0, 1.0),
            },
        };
        Self {
            shape,
            release: preset.release.max(MIN_RELEASE),
        }
    }

    /// Gain the attack ramps to.
    pub fn peak(&self) -> f32 {
        match self.shape {
            Shape::Sustained { peak, .. } => peak,
            Shape::Piano => PIANO_PEAK,
            Shape::Drum { .. } => DRUM_PEAK,
        }
    }

    /// Release length, or `None` for families that skip release.
    pub fn release_time(&self) -> Option<f32> {
        match self.shape {
            Shape::Drum { .. } => None,
            _ => Some(self.release),
        }
    }

    /// Schedule the attack (and decay) starting at `now`.
    pub fn attack(&self, gain: &mut AudioParam, now: f64) {
        gain.set_value(0.0);
        gain.set_value_at(0.0, now);
        match self.shape {
            Shape::Sustained {
                peak,
                attack,
                decay,
                sustain,
            } => {
                let peak_at = now + attack.max(crate::MIN_TIME) as f64;
                gain.linear_ramp_to(peak, peak_at);
                if sustain < 1.0 {
                    gain.linear_ramp_to(peak * sustain, peak_at + decay.max(crate::MIN_TIME) as f64);
                }
            }
            Shape::Piano => {
                let peak_at = now + PIANO_ATTACK as f64;
                gain.linear_ramp_to(PIANO_PEAK, peak_at);
                gain.exponential_ramp_to(PIANO_DECAY_FLOOR, peak_at + PIANO_DECAY as f64);
            }
            Shape::Drum { length } => {
                let peak_at = now + DRUM_ATTACK as f64;
                gain.linear_ramp_to(DRUM_PEAK, peak_at);
                gain.exponential_ramp_to(DRUM_FLOOR, now + length as f64);
            }
        }
    }

    /// Cancel pending ramps and fade out from the current gain.
    ///
    /// Returns `false` (and leaves the gain alone) for drums.
    pub fn release(&self, gain: &mut AudioParam, now: f64) -> bool {
        let Some(release) = self.release_time() else {
            return false;
        };
        gain.cancel_and_hold(now);
        gain.exponential_ramp_to(RELEASE_FLOOR, now + release as f64);
        true
    }
}
