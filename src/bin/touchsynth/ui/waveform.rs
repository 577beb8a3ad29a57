//! Waveform oscilloscope widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Render the master output, scaled so quiet passages stay visible.
pub fn render_waveform(frame: &mut Frame, area: Rect, audio_buffer: &[f32]) {
    let peak = audio_buffer
        .iter()
        .fold(0.0f32, |m, s| m.max(s.abs()))
        .max(0.05) as f64;

    let block = Block::default()
        .title(format!(" Output  peak {:.2} ", peak))
        .borders(Borders::ALL);

    // Start on a rising zero crossing so periodic sounds hold still
    let trigger = audio_buffer
        .windows(2)
        .take(audio_buffer.len() / 2)
        .position(|w| w[0] <= 0.0 && w[1] > 0.0)
        .unwrap_or(0);
    let visible = &audio_buffer[trigger..];

    let data: Vec<(f64, f64)> = visible
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64 / visible.len().max(1) as f64, sample as f64))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-peak, peak])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
