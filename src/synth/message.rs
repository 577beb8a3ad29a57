use rtrb::{Consumer, Producer};

use crate::capture::{LoopId, LoopPlayer};
use crate::effects::EffectsSettings;
use crate::synth::voice::{Voice, VoiceKey};

/// Control → render messages.
///
/// Everything the render context allocates or frees travels inside a
/// message: voices and loop players are built on the control side and come
/// back as [`Retired`] once the render context is done with them.
pub enum Command {
    /// Start a freshly built voice at the block it arrives in.
    StartVoice(Box<Voice>),
    /// Glide a voice toward a new pitch.
    Retune { key: VoiceKey, frequency: f32 },
    /// Begin a voice's release ramp.
    Release { key: VoiceKey },
    /// Drop a voice immediately (teardown, replacement, drums).
    Remove { key: VoiceKey },
    /// Retarget the effects chain from a new preset.
    Effects(EffectsSettings),
    /// Expression-driven filter cutoff, Hz.
    FilterCutoff(f32),
    MasterVolume(f32),
    StartCapture,
    StopCapture,
    PlayLoop(Box<LoopPlayer>),
    StopLoop { id: LoopId },
}

/// Render → control: objects whose memory the control side frees.
pub enum Retired {
    Voice(Box<Voice>),
    Loop(Box<LoopPlayer>),
}

pub trait CommandReceiver {
    fn pop(&mut self) -> Option<Command>;
}

impl CommandReceiver for Consumer<Command> {
    fn pop(&mut self) -> Option<Command> {
        Consumer::pop(self).ok()
    }
}

/// Send side of the command ring.
pub struct CommandSender {
    tx: Producer<Command>,
}

impl CommandSender {
    pub fn new(tx: Producer<Command>) -> Self {
        Self { tx }
    }

    /// Queue a command. Returns `false` (and drops the command) when the
    /// render context has fallen behind and the ring is full.
    pub fn send(&mut self, command: Command) -> bool {
        match self.tx.push(command) {
            Ok(()) => true,
            Err(_) => {
                log::warn!("command ring full, dropping command");
                false
            }
        }
    }
}
