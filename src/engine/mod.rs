//! The engine facade: the control context.
//!
//! [`Engine`] is what collaborators talk to. It owns the voice table, the
//! deferred-action scheduler, the active preset and the capture state, and
//! talks to the [`Renderer`](renderer::Renderer) only through lock-free
//! rings. Every public operation is best-effort: unknown ids, an engine
//! that could not start, or a full command ring turn operations into no-ops
//! (logged), never panics.

pub mod clock;
pub mod renderer;
pub mod scheduler;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use rtrb::{Consumer, RingBuffer};

use crate::capture::{CaptureCodec, Loop, LoopId, LoopPlayer, Recording, WavCodec};
use crate::config::EngineConfig;
use crate::effects::{expression_cutoff, EffectsSettings};
use crate::error::EngineError;
use crate::io::AudioBackend;
use crate::preset::{InstrumentPreset, PresetPatch};
use crate::synth::envelope::{teardown_at, Envelope};
use crate::synth::manager::{ActiveNote, VoiceManager};
use crate::synth::message::{Command, CommandSender, Retired};
use crate::synth::voice::{NoteId, Voice, VoiceKey};
use crate::voices::{Family, Source, SourceSpec};

use self::clock::AudioClock;
use self::renderer::{RenderChannels, RenderSetup};
use self::scheduler::{Deferred, Scheduler};

type LoopEnded = Box<dyn FnOnce(LoopId) + Send>;

/// Control-side half of a running engine.
struct Runtime {
    clock: AudioClock,
    commands: CommandSender,
    retired: Consumer<Retired>,
    capture: Consumer<f32>,
    capture_overruns: Arc<AtomicU64>,
    monitor: Option<Consumer<f32>>,
}

impl Runtime {
    fn now(&self) -> f64 {
        self.clock.seconds()
    }

    fn send(&mut self, command: Command) -> bool {
        self.commands.send(command)
    }
}

pub struct Engine {
    config: EngineConfig,
    backend: Box<dyn AudioBackend>,
    codec: Box<dyn CaptureCodec>,

    preset: InstrumentPreset,
    master_volume: f32,

    manager: VoiceManager,
    scheduler: Scheduler,
    recording: Option<Recording>,
    playing: HashMap<LoopId, LoopEnded>,
    next_loop_id: LoopId,
    seed_counter: u32,

    runtime: Option<Runtime>,
}

impl Engine {
    pub fn new(config: EngineConfig, backend: impl AudioBackend + 'static) -> Self {
        let master_volume = config.master_volume;
        let manager = VoiceManager::with_capacity(config.max_voices);
        Self {
            config,
            backend: Box::new(backend),
            codec: Box::new(WavCodec),
            preset: InstrumentPreset::default(),
            master_volume,
            manager,
            scheduler: Scheduler::new(),
            recording: None,
            playing: HashMap::new(),
            next_loop_id: 0,
            seed_counter: 0,
            runtime: None,
        }
    }

    /// Replace the codec captures are round-tripped through.
    pub fn with_codec(mut self, codec: impl CaptureCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    /// Start the backend if it is not running yet.
    ///
    /// On failure the engine stays uninitialized and the next call retries.
    pub fn initialize_if_needed(&mut self) -> Result<(), EngineError> {
        if self.runtime.is_some() {
            return Ok(());
        }

        let sample_rate = self.backend.sample_rate(self.config.sample_rate)?;
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(EngineError::InvalidSampleRate(sample_rate));
        }

        let clock = AudioClock::new(sample_rate);
        let (command_tx, command_rx) = RingBuffer::new(self.config.command_capacity);
        let (retired_tx, retired_rx) =
            RingBuffer::new(self.config.command_capacity + self.config.max_voices);
        let (capture_tx, capture_rx) =
            RingBuffer::new(self.config.capture_capacity(sample_rate));
        let (monitor_tx, monitor_rx) = match self.config.monitor_capacity {
            Some(capacity) => {
                let (tx, rx) = RingBuffer::new(capacity);
                (Some(tx), Some(rx))
            }
            None => (None, None),
        };
        let capture_overruns = Arc::new(AtomicU64::new(0));

        let renderer = RenderSetup {
            effects: EffectsSettings::from_preset(&self.preset),
            max_delay_seconds: self.config.max_delay_seconds,
            master_volume: self.master_volume,
            max_voices: self.config.max_voices,
        }
        .build(
            clock.clone(),
            RenderChannels {
                commands: command_rx,
                retired: retired_tx,
                capture: capture_tx,
                capture_overruns: capture_overruns.clone(),
                monitor: monitor_tx,
            },
        );

        self.backend.launch(renderer)?;

        self.runtime = Some(Runtime {
            clock,
            commands: CommandSender::new(command_tx),
            retired: retired_rx,
            capture: capture_rx,
            capture_overruns,
            monitor: monitor_rx,
        });
        info!("engine initialized at {sample_rate} Hz");
        Ok(())
    }

    fn ensure_running(&mut self) -> bool {
        match self.initialize_if_needed() {
            Ok(()) => true,
            Err(err) => {
                warn!("engine unavailable: {err}");
                false
            }
        }
    }

    /// Merge `patch` into the active preset and retarget the effects chain.
    /// Voices already sounding keep the sound they were built with.
    pub fn update_preset(&mut self, patch: &PresetPatch) {
        self.preset.apply(patch);
        debug!("preset now {:?} ({})", self.preset.waveform, self.preset.name);
        let settings = EffectsSettings::from_preset(&self.preset);
        if let Some(runtime) = self.runtime.as_mut() {
            runtime.send(Command::Effects(settings));
        }
    }

    pub fn note_on(&mut self, id: NoteId, frequency: f32, row_hint: Option<u32>) {
        if !self.ensure_running() {
            return;
        }
        let family = self.preset.waveform.family();
        let pitched = !matches!(family, Family::Drums);
        if pitched && !(frequency.is_finite() && frequency > 0.0) {
            debug!("note_on {id}: ignoring frequency {frequency}");
            return;
        }

        let Some(sample_rate) = self.sample_rate() else {
            return;
        };

        let now = self.current_time();
        // One voice per id: the previous one is retired first
        if let Some(previous) = self.manager.remove(id) {
            self.retire_note(previous, now);
        }

        let key = self.manager.next_key();
        let seed = self.next_seed();
        let source = Source::build(SourceSpec {
            family,
            frequency,
            row_hint,
            sample_rate,
            seed,
            preset: &self.preset,
        });
        let drum = source.drum_kind();
        let envelope = Envelope::for_family(family, &self.preset, drum);
        let release = envelope.release_time();
        let voice = Box::new(Voice::new(id, key, source, envelope));

        if !self.send(Command::StartVoice(voice)) {
            return;
        }

        self.manager.insert(ActiveNote {
            id,
            key,
            family,
            drum,
            frequency,
            mod_x: 0.0,
            mod_y: 0.0,
            released_at: None,
            release,
        });

        if let Some(drum) = drum {
            // Drums end themselves on the render side; this frees the id
            self.scheduler
                .enqueue(teardown_at(now, drum.duration()), Deferred::Teardown { id, key });
        }
        debug!("note_on {id} key={} {family:?} {frequency:.2} Hz", key.get());
    }

    pub fn note_update(&mut self, id: NoteId, frequency: f32, mod_x: f32, mod_y: f32) {
        if self.runtime.is_none() {
            return;
        }
        let Some(note) = self.manager.get_mut(id) else {
            return;
        };
        let key = note.key;
        let retune = !note.is_drum() && frequency.is_finite() && frequency > 0.0;
        if retune {
            note.frequency = frequency;
        }
        note.mod_x = mod_x;
        note.mod_y = mod_y;

        if retune {
            self.send(Command::Retune { key, frequency });
        }
        let cutoff = expression_cutoff(self.preset.filter_cutoff, mod_y);
        self.send(Command::FilterCutoff(cutoff));
    }

    pub fn note_off(&mut self, id: NoteId) {
        let Some(now) = self.runtime.as_ref().map(Runtime::now) else {
            return;
        };
        let Some(note) = self.manager.get(id) else {
            return;
        };
        let key = note.key;

        if matches!(self.preset.waveform.family(), Family::Drums) {
            self.manager.remove(id);
            self.remove_voice(id, key, now);
            debug!("note_off {id}: removed under the drum kit");
            return;
        }

        let Some(note) = self.manager.mark_released(id, now) else {
            return;
        };
        let Some(release) = note.release else {
            // Drum voices end on their own schedule
            return;
        };
        self.send(Command::Release { key });
        let due = teardown_at(now, release);
        self.scheduler.enqueue(due, Deferred::Teardown { id, key });
        debug!("note_off {id}: releasing over {release:.3}s, teardown at {due:.3}");
    }

    /// Glide the master gain to `level`, clamped to [0, 1].
    pub fn set_master_volume(&mut self, level: f32) {
        if !level.is_finite() {
            return;
        }
        let level = level.clamp(0.0, 1.0);
        self.master_volume = level;
        if let Some(runtime) = self.runtime.as_mut() {
            runtime.send(Command::MasterVolume(level));
        }
    }

    pub fn start_recording(&mut self) {
        if self.recording.is_some() || !self.ensure_running() {
            return;
        }
        let Some(runtime) = self.runtime.as_mut() else {
            return;
        };
        // Leftovers from an earlier take
        while runtime.capture.pop().is_ok() {}

        let capacity = self.config.capture_capacity(runtime.clock.sample_rate());
        self.recording = Some(Recording::new(runtime.clock.frames(), capacity));
        runtime.send(Command::StartCapture);
        info!("recording started");
    }

    /// Stop capturing and turn the take into a loop.
    ///
    /// Returns `None` when nothing was recorded or the codec failed.
    pub fn stop_recording(&mut self) -> Option<Loop> {
        let mut recording = self.recording.take()?;
        let runtime = self.runtime.as_mut()?;
        runtime.send(Command::StopCapture);
        while let Ok(sample) = runtime.capture.pop() {
            recording.push(sample);
        }
        let sample_rate = runtime.clock.sample_rate();
        let samples = recording.finish(runtime.clock.frames());
        if samples.is_empty() {
            warn!("recording stopped with no audio");
            return None;
        }

        let buffer = self
            .codec
            .encode(&samples, sample_rate.round() as u32)
            .and_then(|bytes| self.codec.decode(&bytes));
        match buffer {
            Ok(buffer) => {
                self.next_loop_id += 1;
                let take = Loop::new(self.next_loop_id, buffer);
                info!("captured loop {} ({:.2}s)", take.id(), take.duration());
                Some(take)
            }
            Err(err) => {
                warn!("capture failed: {err}");
                None
            }
        }
    }

    /// Loop `take` into the master bus until `stop_loop`. Playing a loop
    /// that is already playing does nothing.
    pub fn play_loop(&mut self, take: &Loop, on_ended: impl FnOnce(LoopId) + Send + 'static) {
        if self.playing.contains_key(&take.id()) || !self.ensure_running() {
            return;
        }
        let player = Box::new(LoopPlayer::new(take.id(), take.buffer().clone()));
        if self.send(Command::PlayLoop(player)) {
            self.playing.insert(take.id(), Box::new(on_ended));
            debug!("loop {} playing", take.id());
        }
    }

    pub fn stop_loop(&mut self, id: LoopId) {
        let Some(on_ended) = self.playing.remove(&id) else {
            return;
        };
        self.send(Command::StopLoop { id });
        on_ended(id);
        debug!("loop {id} stopped");
    }

    /// Control-context tick: run due teardowns, collect captured audio and
    /// free whatever the render context has finished with.
    pub fn poll(&mut self) {
        let Some(runtime) = self.runtime.as_mut() else {
            return;
        };
        let now = runtime.now();

        if self.scheduler.next_due().is_some_and(|due| due <= now) {
            for action in self.scheduler.tick(now) {
                match action {
                    Deferred::Teardown { id, key } => {
                        if !runtime.send(Command::Remove { key }) {
                            // Retried on the next tick
                            self.scheduler.enqueue(now, action);
                            continue;
                        }
                        if self.manager.remove_if(id, key).is_some() {
                            debug!("note {id} torn down at {now:.3}");
                        }
                    }
                }
            }
        }

        match self.recording.as_mut() {
            Some(recording) => {
                while let Ok(sample) = runtime.capture.pop() {
                    recording.push(sample);
                }
            }
            None => while runtime.capture.pop().is_ok() {},
        }
        let overruns = runtime.capture_overruns.swap(0, Ordering::Relaxed);
        if overruns > 0 {
            warn!("capture ring overran {overruns} time(s); poll more often");
        }

        // Dropping here frees the memory off the audio thread
        while let Ok(retired) = runtime.retired.pop() {
            drop(retired);
        }
    }

    /// Tear everything down. The next mutating call starts a fresh engine.
    pub fn reset(&mut self) {
        self.backend.halt();
        self.runtime = None;
        self.manager.clear();
        self.scheduler.clear();
        self.recording = None;
        for (id, on_ended) in self.playing.drain() {
            on_ended(id);
        }
        info!("engine reset");
    }

    /// Fade out a note the table no longer holds and schedule its teardown.
    /// Notes without a release are dropped at once.
    fn retire_note(&mut self, note: ActiveNote, now: f64) {
        let (id, key) = (note.id, note.key);
        if note.is_released() {
            // Teardown already pending
            return;
        }
        match note.release {
            Some(release) => {
                self.send(Command::Release { key });
                self.scheduler
                    .enqueue(teardown_at(now, release), Deferred::Teardown { id, key });
            }
            None => self.remove_voice(id, key, now),
        }
    }

    /// Drop the render-side voice `key` now. If the ring is full the removal
    /// is left to the scheduler instead.
    fn remove_voice(&mut self, id: NoteId, key: VoiceKey, now: f64) {
        if self.send(Command::Remove { key }) {
            self.scheduler.cancel(key);
        } else {
            self.scheduler.enqueue(now, Deferred::Teardown { id, key });
        }
    }

    fn send(&mut self, command: Command) -> bool {
        match self.runtime.as_mut() {
            Some(runtime) => runtime.send(command),
            None => false,
        }
    }

    fn next_seed(&mut self) -> u32 {
        self.seed_counter = self.seed_counter.wrapping_add(0x9E37_79B9);
        self.config.noise_seed ^ self.seed_counter
    }

    pub fn is_initialized(&self) -> bool {
        self.runtime.is_some()
    }

    pub fn sample_rate(&self) -> Option<f32> {
        self.runtime.as_ref().map(|r| r.clock.sample_rate())
    }

    /// Audio time in seconds, 0 before initialization.
    pub fn current_time(&self) -> f64 {
        self.runtime.as_ref().map_or(0.0, Runtime::now)
    }

    pub fn preset(&self) -> &InstrumentPreset {
        &self.preset
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn active_note(&self, id: NoteId) -> Option<&ActiveNote> {
        self.manager.get(id)
    }

    pub fn active_note_count(&self) -> usize {
        self.manager.len()
    }

    pub fn is_loop_playing(&self, id: LoopId) -> bool {
        self.playing.contains_key(&id)
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    /// Take the monitor tap (configured with `EngineConfig::with_monitor`).
    pub fn take_monitor(&mut self) -> Option<Consumer<f32>> {
        self.runtime.as_mut().and_then(|r| r.monitor.take())
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.backend.halt();
    }
}
