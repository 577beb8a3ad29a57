// Purpose - where rendered audio goes: a device stream or the caller's hands

#[cfg(feature = "cpal")]
pub mod device;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::engine::renderer::Renderer;
use crate::error::EngineError;

#[cfg(feature = "cpal")]
pub use device::CpalBackend;

/// Something that can run a [`Renderer`].
///
/// `sample_rate` settles the rate the renderer will run at, honouring
/// `preferred` where the backend can. `launch` takes ownership of the
/// renderer and starts pulling audio from it; `halt` stops and drops it. A
/// failed `launch` leaves the engine uninitialized so a later call can retry.
pub trait AudioBackend {
    fn sample_rate(&mut self, preferred: f32) -> Result<f32, EngineError>;

    fn launch(&mut self, renderer: Renderer) -> Result<(), EngineError>;

    fn halt(&mut self) {}
}

type Slot = Arc<Mutex<Option<Renderer>>>;

/// Backend rendered on demand by the caller.
///
/// Used by tests and by embedders that own their own audio callback (a
/// plugin host, an offline bounce). The paired [`ManualHandle`] pulls
/// blocks from whatever renderer is currently launched.
pub struct ManualBackend {
    sample_rate: f32,
    slot: Slot,
}

impl ManualBackend {
    pub fn new(sample_rate: f32) -> (Self, ManualHandle) {
        let slot: Slot = Arc::new(Mutex::new(None));
        let handle = ManualHandle { slot: slot.clone() };
        (Self { sample_rate, slot }, handle)
    }
}

impl AudioBackend for ManualBackend {
    /// The caller drives rendering, so the rate given to `new` always wins.
    fn sample_rate(&mut self, _preferred: f32) -> Result<f32, EngineError> {
        Ok(self.sample_rate)
    }

    fn launch(&mut self, renderer: Renderer) -> Result<(), EngineError> {
        *self.slot.lock() = Some(renderer);
        Ok(())
    }

    fn halt(&mut self) {
        self.slot.lock().take();
    }
}

#[derive(Clone)]
pub struct ManualHandle {
    slot: Slot,
}

impl ManualHandle {
    /// Render the next `out.len()` frames. Returns `false` and writes
    /// silence when no renderer is running.
    pub fn render(&self, out: &mut [f32]) -> bool {
        match self.slot.lock().as_mut() {
            Some(renderer) => {
                renderer.render(out);
                true
            }
            None => {
                out.fill(0.0);
                false
            }
        }
    }

    /// Look at render-side state between blocks.
    pub fn inspect<R>(&self, f: impl FnOnce(&Renderer) -> R) -> Option<R> {
        self.slot.lock().as_ref().map(f)
    }

    pub fn is_running(&self) -> bool {
        self.slot.lock().is_some()
    }
}
