//! Keyboard-driven front end for the engine.
//!
//! Terminals only report key presses, so every note is a tap: it sounds for
//! `GATE` and is then released, the way a short touch would be.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use rtrb::Consumer;
use touch_synth::{Engine, Loop, LoopId, NoteId, PresetPatch, Waveform};

use super::ui::{self, SpectrumAnalyzer, View, VIS_BUFFER_SIZE};

/// How long a tapped key holds its note.
const GATE: Duration = Duration::from_millis(350);

/// Home row, one scale degree per key.
const KEYS: [char; 8] = ['a', 's', 'd', 'f', 'g', 'h', 'j', 'k'];
const MAJOR_SCALE: [i32; 8] = [0, 2, 4, 5, 7, 9, 11, 12];

struct Held {
    id: NoteId,
    row: usize,
    until: Instant,
}

pub struct App {
    engine: Engine,
    monitor: Option<Consumer<f32>>,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,

    held: Vec<Held>,
    next_id: NoteId,
    octave: i32,
    mod_y: f32,
    waveform: Waveform,

    take: Option<Loop>,
    playing: Option<LoopId>,
    status: String,
    should_quit: bool,
}

impl App {
    pub fn new(mut engine: Engine) -> Self {
        let sample_rate = engine.sample_rate().unwrap_or(48_000.0);
        let monitor = engine.take_monitor();
        Self {
            engine,
            monitor,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            held: Vec::new(),
            next_id: 0,
            octave: 4,
            mod_y: 0.0,
            waveform: Waveform::Sine,
            take: None,
            playing: None,
            status: "ready".to_string(),
            should_quit: false,
        }
    }

    pub fn run(mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.engine.poll();
            self.release_expired();
            self.poll_audio();

            terminal.draw(|frame| ui::render(frame, &self.view()))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }
        self.engine.reset();
        Ok(())
    }

    fn poll_audio(&mut self) {
        let Some(monitor) = self.monitor.as_mut() else {
            return;
        };
        let mut fresh = false;
        while let Ok(sample) = monitor.pop() {
            self.audio_buffer.push(sample);
            fresh = true;
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
        if fresh {
            self.spectrum.update(&self.audio_buffer);
        }
    }

    fn release_expired(&mut self) {
        let now = Instant::now();
        let engine = &mut self.engine;
        self.held.retain(|held| {
            if held.until <= now {
                engine.note_off(held.id);
                false
            } else {
                true
            }
        });
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c) if KEYS.contains(&c) => {
                if let Some(row) = KEYS.iter().position(|&k| k == c) {
                    self.tap(row);
                }
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if let Some(&waveform) = Waveform::ALL.get(index) {
                    self.waveform = waveform;
                    self.engine.update_preset(&PresetPatch::waveform(waveform));
                    self.status = format!("instrument: {}", waveform.name());
                }
            }
            KeyCode::Up => self.bend(0.1),
            KeyCode::Down => self.bend(-0.1),
            KeyCode::Left => self.octave = (self.octave - 1).max(1),
            KeyCode::Right => self.octave = (self.octave + 1).min(7),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.engine.set_master_volume(self.engine.master_volume() + 0.05)
            }
            KeyCode::Char('-') => self.engine.set_master_volume(self.engine.master_volume() - 0.05),
            KeyCode::Char('r') => self.toggle_recording(),
            KeyCode::Char('p') => self.toggle_loop(),
            _ => {}
        }
    }

    fn tap(&mut self, row: usize) {
        self.next_id = self.next_id.wrapping_add(1);
        let id = self.next_id;
        let frequency = self.frequency(row);
        self.engine.note_on(id, frequency, Some(row as u32));
        if self.mod_y != 0.0 {
            self.engine.note_update(id, frequency, 0.0, self.mod_y);
        }
        self.held.push(Held {
            id,
            row,
            until: Instant::now() + GATE,
        });
    }

    fn bend(&mut self, delta: f32) {
        self.mod_y = (self.mod_y + delta).clamp(-1.0, 1.0);
        let notes: Vec<(NoteId, f32)> = self
            .held
            .iter()
            .map(|held| (held.id, self.frequency(held.row)))
            .collect();
        for (id, frequency) in notes {
            self.engine.note_update(id, frequency, 0.0, self.mod_y);
        }
    }

    fn frequency(&self, row: usize) -> f32 {
        let semitones = MAJOR_SCALE[row.min(MAJOR_SCALE.len() - 1)] + (self.octave - 4) * 12 - 9;
        440.0 * 2f32.powf(semitones as f32 / 12.0)
    }

    fn toggle_recording(&mut self) {
        if self.engine.is_recording() {
            match self.engine.stop_recording() {
                Some(take) => {
                    self.status = format!("captured loop {} ({:.1}s)", take.id(), take.duration());
                    if let Some(id) = self.playing.take() {
                        self.engine.stop_loop(id);
                    }
                    self.take = Some(take);
                }
                None => self.status = "nothing captured".to_string(),
            }
        } else {
            self.engine.start_recording();
            self.status = "recording".to_string();
        }
    }

    fn toggle_loop(&mut self) {
        if let Some(id) = self.playing.take() {
            self.engine.stop_loop(id);
            self.status = format!("loop {id} stopped");
            return;
        }
        if let Some(take) = self.take.as_ref() {
            self.engine
                .play_loop(take, |id| log::info!("loop {id} ended"));
            self.playing = Some(take.id());
            self.status = format!("loop {} playing", take.id());
        }
    }

    fn view(&self) -> View<'_> {
        View {
            waveform: self.waveform,
            octave: self.octave,
            mod_y: self.mod_y,
            master_volume: self.engine.master_volume(),
            active_notes: self.engine.active_note_count(),
            recording: self.engine.is_recording(),
            looping: self.playing.is_some_and(|id| self.engine.is_loop_playing(id)),
            status: &self.status,
            audio: &self.audio_buffer,
            spectrum: self.spectrum.data(),
        }
    }
}
