//! Composable building blocks for constructing audio-processing graphs.
//!
//! Graph nodes wrap the low-level DSP primitives with what the engine needs
//! on top: automatable parameters evaluated at audio time, note-on arming
//! and block-based rendering. The `extensions` module adds the fluent
//! `.through()` helper so chains read left to right.

/// Feedback delay with bounded feedback gain.
pub mod delay;
/// Table-based drive waveshaper.
pub mod distortion;
/// Fluent combinators (`.through()`).
pub mod extensions;
/// Topology-preserving filter node with automatable cutoff and Q.
pub mod filter;
/// Automatable gain stage (envelopes, master volume).
pub mod gain;
/// Low frequency oscillators for vibrato.
pub mod lfo;
/// Core traits shared by all graph nodes.
pub mod node;
/// Fixed-length white noise bursts.
pub mod noise;
/// Audio-band oscillators with glide, detune and vibrato.
pub mod oscillator;
/// Serial chaining of two nodes (source → effect).
pub mod through;
