//! Spectrum analyzer widget
//!
//! FFT of the monitor tap, sampled at log-spaced frequencies and drawn on a
//! log axis with a slowly falling peak hold.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Number of frequency points drawn
const SPECTRUM_BINS: usize = 64;
const FLOOR_DB: f64 = -100.0;
/// dB the peak hold falls per update
const PEAK_FALL_DB: f64 = 1.5;

pub struct SpectrumAnalyzer {
    /// Hann window coefficients
    window: Vec<f32>,
    /// FFT bin for each drawn point
    bin_indices: Vec<usize>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (log10 Hz, peak-held dB)
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let buffer_len = buffer_len.max(4);
        let fft = FftPlanner::new().plan_fft_forward(buffer_len);

        let denom = (buffer_len - 1) as f32;
        let window = (0..buffer_len)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();

        // 20 Hz to Nyquist (or 20 kHz), evenly spaced in log frequency
        let max_freq = (sample_rate as f64 / 2.0).clamp(40.0, 20_000.0);
        let (lo, hi) = (20f64.log10(), max_freq.log10());
        let half = buffer_len / 2;

        let mut bin_indices = Vec::with_capacity(SPECTRUM_BINS);
        let mut spectrum = Vec::with_capacity(SPECTRUM_BINS);
        for i in 0..SPECTRUM_BINS {
            let log_freq = lo + (hi - lo) * i as f64 / (SPECTRUM_BINS - 1) as f64;
            let freq = 10f64.powf(log_freq);
            let index = (freq * buffer_len as f64 / sample_rate as f64).round() as usize;
            bin_indices.push(index.clamp(1, half - 1));
            spectrum.push((log_freq, FLOOR_DB));
        }

        Self {
            window,
            bin_indices,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum,
        }
    }

    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let norm = 2.0 / self.window.len() as f32;
        for ((_, held), &index) in self.spectrum.iter_mut().zip(&self.bin_indices) {
            let magnitude = (self.scratch[index].norm() * norm).max(1e-6);
            let db = 20.0 * (magnitude as f64).log10();
            *held = db.max(*held - PEAK_FALL_DB).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let (lo, hi) = match (spectrum.first(), spectrum.last()) {
        (Some(&(lo, _)), Some(&(hi, _))) if hi > lo => (lo, hi),
        _ => (1.0, 4.0),
    };

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([lo, hi])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 0.0])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
