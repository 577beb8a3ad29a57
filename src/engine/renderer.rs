use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rtrb::{Consumer, Producer};

use crate::capture::{LoopId, LoopPlayer};
use crate::dsp::mix::sum_in_place;
use crate::effects::{EffectsChain, EffectsSettings};
use crate::engine::clock::AudioClock;
use crate::graph::node::RenderCtx;
use crate::synth::message::{Command, CommandReceiver, Retired};
use crate::synth::voice::{Voice, VoiceKey};
use crate::MAX_BLOCK_SIZE;

const MAX_LOOPS: usize = 32;

/// Ring endpoints the renderer owns.
pub struct RenderChannels {
    pub commands: Consumer<Command>,
    pub retired: Producer<Retired>,
    pub capture: Producer<f32>,
    pub capture_overruns: Arc<AtomicU64>,
    pub monitor: Option<Producer<f32>>,
}

/// The render context.
///
/// Owns every sounding voice, every playing loop and the effects chain.
/// `render` never blocks and never allocates: buffers are sized up front
/// and dead objects are handed back to the control side for freeing.
pub struct Renderer {
    sample_rate: f32,
    clock: AudioClock,
    channels: RenderChannels,
    capturing: bool,

    voices: Vec<Box<Voice>>,
    max_voices: usize,
    loops: Vec<Box<LoopPlayer>>,
    effects: EffectsChain,

    bus: Box<[f32]>,
    voice_buf: Box<[f32]>,
    loop_buf: Box<[f32]>,
}

impl Renderer {
    pub fn new(
        clock: AudioClock,
        channels: RenderChannels,
        effects: EffectsChain,
        max_voices: usize,
    ) -> Self {
        Self {
            sample_rate: clock.sample_rate(),
            clock,
            channels,
            capturing: false,
            voices: Vec::with_capacity(max_voices),
            max_voices,
            loops: Vec::with_capacity(MAX_LOOPS),
            effects,
            bus: vec![0.0; MAX_BLOCK_SIZE].into_boxed_slice(),
            voice_buf: vec![0.0; MAX_BLOCK_SIZE].into_boxed_slice(),
            loop_buf: vec![0.0; MAX_BLOCK_SIZE].into_boxed_slice(),
        }
    }

    /// Fill `out` with mono audio.
    pub fn render(&mut self, out: &mut [f32]) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_chunk(chunk);
        }
    }

    fn render_chunk(&mut self, out: &mut [f32]) {
        let n = out.len();
        let ctx = RenderCtx::new(self.sample_rate, self.clock.seconds());

        self.drain_commands(&ctx);

        // Voices
        let bus = &mut self.bus[..n];
        bus.fill(0.0);
        for voice in self.voices.iter_mut() {
            let buf = &mut self.voice_buf[..n];
            voice.render(buf, &ctx);
            sum_in_place(bus, buf);
        }
        self.retire_finished();

        // Loops
        let loop_buf = &mut self.loop_buf[..n];
        loop_buf.fill(0.0);
        for player in self.loops.iter_mut() {
            player.render_into(loop_buf, self.sample_rate);
        }

        self.effects.process(&mut self.bus[..n], &self.loop_buf[..n], &ctx);
        out.copy_from_slice(&self.bus[..n]);

        self.tap(out);
        self.clock.advance(n);
    }

    fn drain_commands(&mut self, ctx: &RenderCtx) {
        while let Some(command) = CommandReceiver::pop(&mut self.channels.commands) {
            match command {
                Command::StartVoice(mut voice) => {
                    if self.voices.len() >= self.max_voices {
                        self.steal_voice();
                    }
                    voice.start(ctx);
                    self.voices.push(voice);
                }
                Command::Retune { key, frequency } => {
                    if let Some(voice) = self.voice_mut(key) {
                        voice.retune(frequency, ctx.time);
                    }
                }
                Command::Release { key } => {
                    if let Some(voice) = self.voice_mut(key) {
                        voice.release(ctx.time);
                    }
                }
                Command::Remove { key } => {
                    if let Some(idx) = self.voices.iter().position(|v| v.key() == key) {
                        let voice = self.voices.remove(idx);
                        self.retire(Retired::Voice(voice));
                    }
                }
                Command::Effects(settings) => self.effects.apply(&settings, ctx.time),
                Command::FilterCutoff(hz) => self.effects.set_cutoff(hz, ctx.time),
                Command::MasterVolume(level) => self.effects.set_master_volume(level, ctx.time),
                Command::StartCapture => self.capturing = true,
                Command::StopCapture => self.capturing = false,
                Command::PlayLoop(player) => {
                    let duplicate = self.loops.iter().any(|p| p.id() == player.id());
                    if duplicate || self.loops.len() >= MAX_LOOPS {
                        self.retire(Retired::Loop(player));
                    } else {
                        self.loops.push(player);
                    }
                }
                Command::StopLoop { id } => self.stop_loop(id),
            }
        }
    }

    /// Make room by dropping the oldest releasing voice, else the oldest.
    fn steal_voice(&mut self) {
        let idx = self
            .voices
            .iter()
            .position(|v| v.state() == crate::synth::voice::VoiceState::Releasing)
            .unwrap_or(0);
        if idx < self.voices.len() {
            let voice = self.voices.remove(idx);
            self.retire(Retired::Voice(voice));
        }
    }

    fn retire_finished(&mut self) {
        let mut i = 0;
        while i < self.voices.len() {
            if self.voices[i].is_finished() {
                let voice = self.voices.remove(i);
                self.retire(Retired::Voice(voice));
            } else {
                i += 1;
            }
        }
    }

    fn stop_loop(&mut self, id: LoopId) {
        if let Some(idx) = self.loops.iter().position(|p| p.id() == id) {
            let player = self.loops.remove(idx);
            self.retire(Retired::Loop(player));
        }
    }

    fn retire(&mut self, item: Retired) {
        // A full return ring means the item is freed here instead
        let _ = self.channels.retired.push(item);
    }

    fn tap(&mut self, out: &[f32]) {
        if self.capturing {
            for &sample in out {
                if self.channels.capture.push(sample).is_err() {
                    self.channels
                        .capture_overruns
                        .fetch_add(1, Ordering::Relaxed);
                    break;
                }
            }
        }
        if let Some(monitor) = self.channels.monitor.as_mut() {
            for &sample in out {
                if monitor.push(sample).is_err() {
                    break;
                }
            }
        }
    }

    fn voice_mut(&mut self, key: VoiceKey) -> Option<&mut Voice> {
        self.voices
            .iter_mut()
            .find(|v| v.key() == key)
            .map(|v| v.as_mut())
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn voices(&self) -> impl Iterator<Item = &Voice> {
        self.voices.iter().map(|v| v.as_ref())
    }

    pub fn voice(&self, key: VoiceKey) -> Option<&Voice> {
        self.voices().find(|v| v.key() == key)
    }

    pub fn loop_count(&self) -> usize {
        self.loops.len()
    }

    pub fn is_loop_playing(&self, id: LoopId) -> bool {
        self.loops.iter().any(|p| p.id() == id)
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn effects(&self) -> &EffectsChain {
        &self.effects
    }
}

/// Settings a fresh renderer starts from.
pub(crate) struct RenderSetup {
    pub effects: EffectsSettings,
    pub max_delay_seconds: f32,
    pub master_volume: f32,
    pub max_voices: usize,
}

impl RenderSetup {
    pub(crate) fn build(self, clock: AudioClock, channels: RenderChannels) -> Renderer {
        let effects = EffectsChain::new(
            self.effects,
            clock.sample_rate(),
            self.max_delay_seconds,
            self.master_volume,
        );
        Renderer::new(clock, channels, effects, self.max_voices)
    }
}
