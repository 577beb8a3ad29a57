use thiserror::Error;

/// Failures that keep the engine from starting or running.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("audio backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("audio stream error: {0}")]
    Stream(String),

    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f32),
}

/// Failures while turning a capture into a playable loop.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to encode capture: {0}")]
    Encode(#[source] hound::Error),

    #[error("failed to decode capture: {0}")]
    Decode(#[source] hound::Error),

    #[error("capture contains no audio")]
    Empty,
}
