use crate::graph::gain::GainNode;
use crate::graph::node::{GraphNode, RenderCtx};
use crate::synth::envelope::Envelope;
use crate::voices::{DrumKind, Source};

/// Caller-assigned note identifier (a pointer or touch id).
pub type NoteId = u32;

/// Identity of one built voice. A note id is reused across touches; the
/// key tells two voices for the same id apart.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceKey(pub(crate) u64);

impl VoiceKey {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceKind {
    Tonal,
    Piano,
    String,
    Kick,
    Snare,
    Hat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,      // Built, waiting for the render context to start it
    Active,    // Attack/decay/sustain
    Releasing, // Gain ramping toward the release floor
}

/// A single sounding voice: its source feeding its own gain stage.
///
/// Built on the control side, started and rendered on the render side.
pub struct Voice {
    id: NoteId,
    key: VoiceKey,
    source: Source,
    gain: GainNode,
    envelope: Envelope,
    state: VoiceState,
}

impl Voice {
    pub fn new(id: NoteId, key: VoiceKey, source: Source, envelope: Envelope) -> Self {
        Self {
            id,
            key,
            source,
            gain: GainNode::new(0.0),
            envelope,
            state: VoiceState::Idle,
        }
    }

    pub fn start(&mut self, ctx: &RenderCtx) {
        self.source.note_on(ctx);
        self.envelope.attack(self.gain.gain_mut(), ctx.time);
        self.state = VoiceState::Active;
    }

    pub fn retune(&mut self, frequency: f32, time: f64) {
        self.source.retune(frequency, time);
    }

    /// Begin the release ramp. Returns `false` when the voice has no
    /// release stage or is already releasing.
    pub fn release(&mut self, time: f64) -> bool {
        if self.state == VoiceState::Releasing {
            return false;
        }
        if self.envelope.release(self.gain.gain_mut(), time) {
            self.state = VoiceState::Releasing;
            true
        } else {
            false
        }
    }

    /// Render into `out`, overwriting it.
    pub fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.gain.render_block(out, ctx);
    }

    /// Self-terminating voices (drums) report when they are done.
    pub fn is_finished(&self) -> bool {
        self.state != VoiceState::Idle && !self.source.is_active()
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn key(&self) -> VoiceKey {
        self.key
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn gain(&self) -> f32 {
        self.gain.gain()
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn kind(&self) -> VoiceKind {
        match &self.source {
            Source::Tonal(_) => VoiceKind::Tonal,
            Source::Piano(_) => VoiceKind::Piano,
            Source::String(_) => VoiceKind::String,
            Source::Drum(drum) => match drum.kind() {
                DrumKind::Kick => VoiceKind::Kick,
                DrumKind::Snare => VoiceKind::Snare,
                DrumKind::Hat => VoiceKind::Hat,
            },
        }
    }
}
