//! Real-world scenario benchmarks.
//!
//! These model what a touch surface does to the synth: single voices per
//! family, and a held chord through the whole engine.

mod engine;
mod voices;

pub use engine::bench_engine;
pub use voices::bench_voices;
