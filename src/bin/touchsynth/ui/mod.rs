//! TUI module for touchsynth
//!
//! Shows what the synth is doing and the audio it is producing.

mod spectrum;
mod waveform;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use touch_synth::Waveform;

pub use spectrum::SpectrumAnalyzer;

use spectrum::render_spectrum;
use waveform::render_waveform;

/// Audio visualization buffer size
pub const VIS_BUFFER_SIZE: usize = 1024;

/// Everything one frame draws.
pub struct View<'a> {
    pub waveform: Waveform,
    pub octave: i32,
    pub mod_y: f32,
    pub master_volume: f32,
    pub active_notes: usize,
    pub recording: bool,
    pub looping: bool,
    pub status: &'a str,
    pub audio: &'a [f32],
    pub spectrum: &'a [(f64, f64)],
}

pub fn render(frame: &mut Frame, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status bar
            Constraint::Min(8),    // Waveform
            Constraint::Length(10), // Spectrum
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    render_status(frame, chunks[0], view);
    render_waveform(frame, chunks[1], view.audio);
    render_spectrum(frame, chunks[2], view.spectrum);

    let help = Paragraph::new(
        " [A-K] Play  [1-9] Instrument  [←/→] Octave  [↑/↓] Filter  [R] Record  [P] Loop  [+/-] Volume  [Q] Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);
}

fn render_status(frame: &mut Frame, area: Rect, view: &View) {
    let dim = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let mut spans = vec![
        Span::styled(" instrument ", dim),
        Span::styled(view.waveform.name(), value),
        Span::styled("  octave ", dim),
        Span::styled(view.octave.to_string(), value),
        Span::styled("  filter ", dim),
        Span::styled(format!("{:+.1}", view.mod_y), value),
        Span::styled("  volume ", dim),
        Span::styled(format!("{:.0}%", view.master_volume * 100.0), value),
        Span::styled("  notes ", dim),
        Span::styled(view.active_notes.to_string(), value),
    ];
    if view.recording {
        spans.push(Span::styled(
            "  ● REC",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    if view.looping {
        spans.push(Span::styled("  ⟲ LOOP", Style::default().fg(Color::Green)));
    }
    spans.push(Span::styled(format!("  {}", view.status), dim));

    let block = Block::default().title(" touchsynth ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
