/// Circular delay line with fractional (linearly interpolated) reads.
///
/// The buffer is allocated once at construction. Reads are relative to the
/// next write position, so `read(d)` followed by `write(x)` gives a delay of
/// exactly `d` samples.
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    pub fn new(max_delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_delay_samples.max(2) + 2],
            write_pos: 0,
        }
    }

    /// Longest delay this line can produce, in samples.
    pub fn max_delay(&self) -> f32 {
        (self.buffer.len() - 2) as f32
    }

    /// Read the sample written `delay_samples` writes ago (min 1).
    #[inline]
    pub fn read_interpolated(&self, delay_samples: f32) -> f32 {
        let len = self.buffer.len();
        let delay = delay_samples.clamp(1.0, self.max_delay());
        let whole = delay.floor();
        let frac = delay - whole;
        let whole = whole as usize;

        let newer = (self.write_pos + len - whole) % len;
        let older = (newer + len - 1) % len;

        let a = self.buffer[newer];
        let b = self.buffer[older];
        a + (b - a) * frac
    }

    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Plain delay: replaces each sample with the one `delay_samples` ago.
    pub fn render(&mut self, buffer: &mut [f32], delay_samples: f32) {
        for sample in buffer.iter_mut() {
            let delayed = self.read_interpolated(delay_samples);
            self.write(*sample);
            *sample = delayed;
        }
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_delay_shifts_impulse() {
        let mut line = DelayLine::new(64);
        let mut buffer = vec![0.0f32; 32];
        buffer[0] = 1.0;

        line.render(&mut buffer, 10.0);

        assert_eq!(buffer[10], 1.0);
        assert_eq!(buffer.iter().filter(|&&s| s != 0.0).count(), 1);
    }

    #[test]
    fn fractional_delay_splits_impulse() {
        let mut line = DelayLine::new(64);
        let mut buffer = vec![0.0f32; 32];
        buffer[0] = 1.0;

        line.render(&mut buffer, 4.25);

        assert!((buffer[4] - 0.75).abs() < 1e-6);
        assert!((buffer[5] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn delay_is_clamped_to_capacity() {
        let mut line = DelayLine::new(16);
        let mut buffer = vec![1.0f32; 64];
        line.render(&mut buffer, 1_000.0);
        assert!(buffer.iter().all(|s| s.is_finite()));
        assert_eq!(line.max_delay(), 16.0);
    }

    #[test]
    fn reset_clears_history() {
        let mut line = DelayLine::new(8);
        line.write(1.0);
        line.reset();
        assert_eq!(line.read_interpolated(1.0), 0.0);
    }
}
