//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! making them safe to embed directly inside voice structs. They stay
//! focused on the signal-processing math so graph nodes can layer on
//! parameter automation and routing.

/// Gain stage multiplication helpers.
pub mod amplify;
/// Time-domain delay line with fractional reads.
pub mod delay;
/// Drive curve and table-based waveshaping.
pub mod distortion;
/// State-variable filter implementation with multiple responses.
pub mod filter;
/// Bus summing helpers.
pub mod mix;
/// Oscillator waveforms and noise sources.
pub mod oscillator;
/// Automatable parameters with ramps and smoothing.
pub mod param;

pub use param::AudioParam;
