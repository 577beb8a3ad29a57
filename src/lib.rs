//! Polyphonic touch synthesizer.
//!
//! Notes are started, bent and released by id from the control side
//! ([`Engine`]); an audio backend pulls mono blocks from the render side.
//! The two sides only meet through lock-free rings.

pub mod capture; // Loop capture and playback
pub mod config;
pub mod dsp;
pub mod effects; // Master chain: drive, filter, delay, volume
pub mod engine;
pub mod error;
pub mod graph; // Composable audio graph nodes
pub mod io;
pub mod preset;
pub mod synth; // Voices, envelopes and the note table
pub mod voices; // Sound sources per instrument family

pub use capture::{Loop, LoopId};
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{CaptureError, EngineError};
pub use io::{AudioBackend, ManualBackend, ManualHandle};
pub use preset::{InstrumentPreset, PresetPatch, Waveform};
pub use synth::voice::NoteId;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
