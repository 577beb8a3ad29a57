//! Capture and loop playback.
//!
//! The render context copies the master output into a lock-free ring while
//! recording. The control context drains it into a [`Recording`] on every
//! `poll`, and `stop_recording` turns the recording into a [`Loop`] by
//! running it through a [`CaptureCodec`]. Loops play back through
//! [`LoopPlayer`]s owned by the render context, summed into the master bus.

mod codec;

pub use codec::{CaptureCodec, WavCodec};

use std::sync::Arc;

/// Caller-visible loop identifier.
pub type LoopId = u32;

/// Decoded, playable audio.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopBuffer {
    sample_rate: u32,
    samples: Vec<f32>,
}

impl LoopBuffer {
    pub fn new(sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            samples,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// A captured take. Cheap to clone; the audio is shared.
#[derive(Debug, Clone)]
pub struct Loop {
    id: LoopId,
    buffer: Arc<LoopBuffer>,
}

impl Loop {
    pub fn new(id: LoopId, buffer: LoopBuffer) -> Self {
        Self {
            id,
            buffer: Arc::new(buffer),
        }
    }

    pub fn id(&self) -> LoopId {
        self.id
    }

    pub fn buffer(&self) -> &Arc<LoopBuffer> {
        &self.buffer
    }

    pub fn duration(&self) -> f64 {
        self.buffer.duration()
    }
}

/// Control-side accumulator for the capture ring.
#[derive(Debug, Default)]
pub struct Recording {
    samples: Vec<f32>,
    started_frame: u64,
}

impl Recording {
    pub fn new(started_frame: u64, capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            started_frame,
        }
    }

    pub fn push(&mut self, sample: f32) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Finish the take. Frames the render context had not yet captured when
    /// recording started (command latency, ring overruns) are filled with
    /// silence at the front, so the take spans the whole elapsed interval.
    pub fn finish(mut self, now_frame: u64) -> Vec<f32> {
        let elapsed = now_frame.saturating_sub(self.started_frame) as usize;
        if self.samples.len() < elapsed {
            let missing = elapsed - self.samples.len();
            self.samples.splice(0..0, std::iter::repeat(0.0).take(missing));
        }
        self.samples
    }
}

/// Render-side looping playback of one loop.
pub struct LoopPlayer {
    id: LoopId,
    buffer: Arc<LoopBuffer>,
    position: f64,
}

impl LoopPlayer {
    pub fn new(id: LoopId, buffer: Arc<LoopBuffer>) -> Self {
        Self {
            id,
            buffer,
            position: 0.0,
        }
    }

    pub fn id(&self) -> LoopId {
        self.id
    }

    /// Add the loop into `out`, wrapping at the end. Buffers recorded at a
    /// different rate are stepped (linear interpolation) to stay in tune.
    pub fn render_into(&mut self, out: &mut [f32], sample_rate: f32) {
        let samples = self.buffer.samples();
        let len = samples.len();
        if len == 0 {
            return;
        }
        let step = self.buffer.sample_rate() as f64 / sample_rate as f64;
        let len_f = len as f64;

        for sample in out.iter_mut() {
            let idx = self.position as usize;
            let frac = (self.position - idx as f64) as f32;
            let a = samples[idx % len];
            let b = samples[(idx + 1) % len];
            *sample += a + (b - a) * frac;

            self.position += step;
            if self.position >= len_f {
                self.position -= len_f;
            }
        }
    }
}
