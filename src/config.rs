#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Engine construction parameters.
///
/// Everything here is fixed for the lifetime of an initialized engine; the
/// ring and buffer sizes are allocated once in `initialize_if_needed`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Sample rate asked of the backend. Device backends fall back to the
    /// device default when they cannot run at it.
    pub sample_rate: f32,
    /// Control → render command ring size.
    pub command_capacity: usize,
    /// Render-side voice storage, reserved up front.
    pub max_voices: usize,
    /// Capture ring length in seconds of audio between two `poll` calls.
    pub capture_seconds: f32,
    /// Longest delay time the effects chain can be retargeted to.
    pub max_delay_seconds: f32,
    /// Master gain on first initialization.
    pub master_volume: f32,
    /// Seed for the noise sources (string excitation, snares, hats).
    pub noise_seed: u32,
    /// Samples kept for visualisation, `None` disables the monitor tap.
    pub monitor_capacity: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            command_capacity: 256,
            max_voices: 64,
            capture_seconds: 8.0,
            max_delay_seconds: 2.0,
            master_volume: 0.7,
            noise_seed: 0x1234_5678,
            monitor_capacity: None,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity.max(1);
        self
    }

    pub fn with_max_voices(mut self, max_voices: usize) -> Self {
        self.max_voices = max_voices.max(1);
        self
    }

    pub fn with_capture_seconds(mut self, seconds: f32) -> Self {
        self.capture_seconds = seconds.max(0.1);
        self
    }

    pub fn with_max_delay_seconds(mut self, seconds: f32) -> Self {
        self.max_delay_seconds = seconds.max(0.01);
        self
    }

    pub fn with_master_volume(mut self, volume: f32) -> Self {
        self.master_volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn with_noise_seed(mut self, seed: u32) -> Self {
        self.noise_seed = seed;
        self
    }

    pub fn with_monitor(mut self, capacity: usize) -> Self {
        self.monitor_capacity = Some(capacity.max(1));
        self
    }

    /// Ring length in samples for the capture tap.
    pub(crate) fn capture_capacity(&self, sample_rate: f32) -> usize {
        ((self.capture_seconds * sample_rate).ceil() as usize).max(crate::MAX_BLOCK_SIZE)
    }
}
