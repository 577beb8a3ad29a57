use std::f32::consts::{FRAC_1_SQRT_2, PI};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| type              | constructed by       | passes          | rejects      |
| ----------------- | -------------------- | --------------- | ------------ |
| low-pass          | LPF                  | below cutoff    | above cutoff |
| high-pass         | HPF                  | above cutoff    | below cutoff |
| band-pass         | LPF ∘ HPF (series)   | between cutoffs | outside      |

Resonance is expressed as Q. The TPT state-variable filter uses the damping
term k = 1/Q, so Q = 1/√2 is maximally flat (Butterworth): the low-pass
magnitude never exceeds unity, which the string resonator relies on to keep
its loop gain below the feedback gain.
*/

/// Q of a maximally flat (Butterworth) response.
pub const BUTTERWORTH_Q: f32 = FRAC_1_SQRT_2;

const MIN_Q: f32 = 0.05;
const MAX_CUTOFF_RATIO: f32 = 0.45; // of the sample rate, keeps tan() finite

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    cutoff_hz: f32,
    q: f32,
    filter_type: FilterType,

    // Cached coefficients, recomputed when cutoff/Q/sample rate change
    g: f32,
    k: f32,
    coeff_rate: f32,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            q: BUTTERWORTH_Q,
            filter_type,
            g: 0.0,
            k: 1.0 / BUTTERWORTH_Q,
            coeff_rate: 0.0,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz)
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::BandPass, cutoff_hz)
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn q(&self) -> f32 {
        self.q
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        if cutoff != self.cutoff_hz {
            self.cutoff_hz = cutoff;
            self.coeff_rate = 0.0;
        }
    }

    pub fn set_q(&mut self, q: f32) {
        let q = q.max(MIN_Q);
        if q != self.q {
            self.q = q;
            self.coeff_rate = 0.0;
        }
    }

    #[inline]
    fn prepare(&mut self, sample_rate: f32) {
        if self.coeff_rate == sample_rate {
            return;
        }
        let cutoff = self.cutoff_hz.clamp(1.0, sample_rate * MAX_CUTOFF_RATIO);
        self.g = (PI * cutoff / sample_rate).tan();
        self.k = 1.0 / self.q;
        self.coeff_rate = sample_rate;
    }

    #[inline]
    fn tick(&mut self, sample: f32) -> FilterOutputs {
        let (g, k) = (self.g, self.k);
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
        }
    }

    /// Filter a single sample.
    #[inline]
    pub fn process(&mut self, sample: f32, sample_rate: f32) -> f32 {
        self.prepare(sample_rate);
        let outputs = self.tick(sample);
        match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::HighPass => outputs.highpass,
            FilterType::BandPass => outputs.bandpass,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample, sample_rate);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::OscillatorBlock;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn sine(frequency: f32, len: usize) -> Vec<f32> {
        let mut osc = OscillatorBlock::sine();
        let mut buffer = vec![0.0f32; len];
        osc.render(&mut buffer, frequency, SAMPLE_RATE);
        buffer
    }

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(256);
        buffer[skip..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut filter = SVFilter::lowpass(500.0);
        let mut buffer = vec![1.0; 1024];
        filter.render(&mut buffer, SAMPLE_RATE);
        assert!(buffer[1023] > 0.99);
    }

    #[test]
    fn highpass_blocks_dc() {
        let mut filter = SVFilter::highpass(500.0);
        let mut buffer = vec![1.0; 1024];
        filter.render(&mut buffer, SAMPLE_RATE);
        assert!(buffer[1023].abs() < 0.001);
    }

    #[test]
    fn lowpass_attenuates_above_cutoff() {
        let mut filter = SVFilter::lowpass(500.0);
        let mut buffer = sine(5_000.0, 1024);
        filter.render(&mut buffer, SAMPLE_RATE);

        let peak = peak_after_transient(&buffer);
        assert!(peak < 0.05, "expected high freq attenuation, got {peak}");
    }

    #[test]
    fn butterworth_lowpass_never_boosts() {
        for freq in [50.0, 500.0, 4_000.0, 7_900.0, 8_000.0, 12_000.0] {
            let mut filter = SVFilter::lowpass(8_000.0);
            let mut buffer = sine(freq, 4096);
            filter.render(&mut buffer, SAMPLE_RATE);
            let peak = peak_after_transient(&buffer);
            assert!(peak <= 1.0 + 1e-3, "{freq} Hz peaked at {peak}");
        }
    }

    #[test]
    fn resonance_boosts_cutoff() {
        let mut flat = SVFilter::lowpass(1_000.0);
        let mut buffer = sine(1_000.0, 2048);
        flat.render(&mut buffer, SAMPLE_RATE);
        let flat_peak = peak_after_transient(&buffer);

        let mut resonant = SVFilter::lowpass(1_000.0);
        resonant.set_q(8.0);
        let mut buffer = sine(1_000.0, 2048);
        resonant.render(&mut buffer, SAMPLE_RATE);
        let resonant_peak = peak_after_transient(&buffer);

        assert!(
            resonant_peak > flat_peak * 2.0,
            "resonant={resonant_peak}, flat={flat_peak}"
        );
    }

    #[test]
    fn bandpass_emphasizes_cutoff() {
        let mut filter = SVFilter::bandpass(1_000.0);
        filter.set_q(2.0);
        let mut pass = sine(1_000.0, 2048);
        filter.render(&mut pass, SAMPLE_RATE);

        filter.reset();
        let mut off = sine(200.0, 2048);
        filter.render(&mut off, SAMPLE_RATE);

        assert!(peak_after_transient(&pass) > peak_after_transient(&off) * 2.0);
    }

    #[test]
    fn cutoff_above_nyquist_stays_finite() {
        let mut filter = SVFilter::lowpass(12_000.0);
        let mut buffer = sine(440.0, 512);
        filter.render(&mut buffer, 22_050.0);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn q_is_floored() {
        let mut filter = SVFilter::lowpass(1_000.0);
        filter.set_q(0.0);
        assert!(filter.q() >= MIN_Q);
    }
}
