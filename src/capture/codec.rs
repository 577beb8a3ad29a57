use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::capture::LoopBuffer;
use crate::error::CaptureError;

/// Container format for captured audio.
///
/// `stop_recording` pushes every capture through `encode` then `decode`, so
/// the loop that plays back is exactly what a caller would get by saving
/// the encoded bytes and loading them again.
pub trait CaptureCodec: Send {
    fn encode(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, CaptureError>;

    fn decode(&self, bytes: &[u8]) -> Result<LoopBuffer, CaptureError>;
}

/// Mono WAV, 32-bit float, held in memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct WavCodec;

impl CaptureCodec for WavCodec {
    fn encode(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, CaptureError> {
        if samples.is_empty() {
            return Err(CaptureError::Empty);
        }
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let mut bytes = Vec::with_capacity(44 + samples.len() * 4);
        {
            let mut writer =
                WavWriter::new(Cursor::new(&mut bytes), spec).map_err(CaptureError::Encode)?;
            for &sample in samples {
                writer.write_sample(sample).map_err(CaptureError::Encode)?;
            }
            writer.finalize().map_err(CaptureError::Encode)?;
        }
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<LoopBuffer, CaptureError> {
        let reader = WavReader::new(Cursor::new(bytes)).map_err(CaptureError::Decode)?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(CaptureError::Decode)?,
            SampleFormat::Int => {
                let scale = 1.0 / (1u64 << (spec.bits_per_sample.max(1) - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|s| s as f32 * scale))
                    .collect::<Result<_, _>>()
                    .map_err(CaptureError::Decode)?
            }
        };

        // Fold multichannel files down to mono
        let samples: Vec<f32> = if channels == 1 {
            interleaved
        } else {
            interleaved
                .chunks(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                .collect()
        };

        if samples.is_empty() {
            return Err(CaptureError::Empty);
        }
        Ok(LoopBuffer::new(spec.sample_rate, samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_round_trip_is_lossless() {
        let samples: Vec<f32> = (0..1_000).map(|i| ((i as f32) * 0.01).sin() * 0.5).collect();
        let bytes = WavCodec.encode(&samples, 48_000).expect("encode");
        let buffer = WavCodec.decode(&bytes).expect("decode");

        assert_eq!(buffer.sample_rate(), 48_000);
        assert_eq!(buffer.samples(), samples.as_slice());
    }

    #[test]
    fn empty_capture_is_rejected() {
        assert!(matches!(WavCodec.encode(&[], 48_000), Err(CaptureError::Empty)));
    }

    #[test]
    fn garbage_fails_to_decode() {
        let result = WavCodec.decode(b"definitely not a wav file");
        assert!(matches!(result, Err(CaptureError::Decode(_))));
    }

    #[test]
    fn integer_stereo_is_folded_to_mono() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 22_050,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut bytes = Vec::new();
        {
            let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec).expect("writer");
            for _ in 0..10 {
                writer.write_sample(16_384i16).expect("left");
                writer.write_sample(0i16).expect("right");
            }
            writer.finalize().expect("finalize");
        }

        let buffer = WavCodec.decode(&bytes).expect("decode");
        assert_eq!(buffer.samples().len(), 10);
        assert!((buffer.samples()[0] - 0.25).abs() < 1e-4);
    }
}
