// Voice lifecycle: what a voice is, how its loudness is shaped, how the
// control side tracks it, and the messages that carry it to the render side.

pub mod envelope;
pub mod manager;
pub mod message;
pub mod voice;

pub use envelope::{teardown_at, Envelope, TEARDOWN_SLACK};
pub use manager::{ActiveNote, VoiceManager};
pub use message::{Command, Retired};
pub use voice::{NoteId, Voice, VoiceKey, VoiceKind, VoiceState};
