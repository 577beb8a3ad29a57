use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{
    FromSample, SampleFormat, SampleRate, SizedSample, Stream, StreamConfig,
    SupportedStreamConfig,
};

use crate::engine::renderer::Renderer;
use crate::error::EngineError;
use crate::io::AudioBackend;
use crate::MAX_BLOCK_SIZE;

/// Default output device through cpal. Mono output is copied to every channel.
#[derive(Default)]
pub struct CpalBackend {
    device: Option<(cpal::Device, SupportedStreamConfig)>,
    stream: Option<Stream>,
}

impl CpalBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn open(
        &mut self,
        preferred: f32,
    ) -> Result<&(cpal::Device, SupportedStreamConfig), EngineError> {
        if self.device.is_none() {
            let host = cpal::default_host();
            let device = host.default_output_device().ok_or_else(|| {
                EngineError::BackendUnavailable("no default output device available".into())
            })?;
            let default = device.default_output_config().map_err(|e| {
                EngineError::BackendUnavailable(format!("failed to fetch default output config: {e}"))
            })?;
            let config = match config_at_rate(&device, &default, preferred) {
                Some(config) => config,
                None => {
                    log::info!(
                        "{preferred} Hz not supported, using {} Hz",
                        default.sample_rate().0
                    );
                    default
                }
            };
            log::info!(
                "output device: {} ({} Hz, {} channels, {:?})",
                device.name().unwrap_or_else(|_| "unknown".into()),
                config.sample_rate().0,
                config.channels(),
                config.sample_format()
            );
            self.device = Some((device, config));
        }
        self.device
            .as_ref()
            .ok_or_else(|| EngineError::BackendUnavailable("device not opened".into()))
    }
}

impl AudioBackend for CpalBackend {
    fn sample_rate(&mut self, preferred: f32) -> Result<f32, EngineError> {
        let (_, config) = self.open(preferred)?;
        Ok(config.sample_rate().0 as f32)
    }

    fn launch(&mut self, renderer: Renderer) -> Result<(), EngineError> {
        let (device, supported) = self
            .device
            .as_ref()
            .ok_or_else(|| EngineError::BackendUnavailable("device not opened".into()))?;
        let format = supported.sample_format();
        let config: StreamConfig = supported.clone().into();

        let stream = match format {
            SampleFormat::F32 => build_stream::<f32>(device, &config, renderer),
            SampleFormat::I16 => build_stream::<i16>(device, &config, renderer),
            SampleFormat::U16 => build_stream::<u16>(device, &config, renderer),
            SampleFormat::I32 => build_stream::<i32>(device, &config, renderer),
            other => Err(EngineError::BackendUnavailable(format!(
                "unsupported sample format {other:?}"
            ))),
        }?;

        stream
            .play()
            .map_err(|e| EngineError::Stream(e.to_string()))?;
        self.stream = Some(stream);
        Ok(())
    }

    fn halt(&mut self) {
        if self.stream.take().is_some() {
            log::info!("output stream stopped");
        }
    }
}

/// A supported output config running at `rate`, preferring f32 samples and
/// the default channel count.
fn config_at_rate(
    device: &cpal::Device,
    default: &SupportedStreamConfig,
    rate: f32,
) -> Option<SupportedStreamConfig> {
    if !(rate.is_finite() && rate >= 1.0) {
        return None;
    }
    let rate = rate.round() as u32;
    if default.sample_rate().0 == rate {
        return Some(default.clone());
    }
    let mut ranges: Vec<_> = device
        .supported_output_configs()
        .ok()?
        .filter(|range| range.min_sample_rate().0 <= rate && rate <= range.max_sample_rate().0)
        .collect();
    ranges.sort_by_key(|range| {
        (
            range.sample_format() != SampleFormat::F32,
            range.channels() != default.channels(),
        )
    });
    ranges
        .into_iter()
        .next()
        .map(|range| range.with_sample_rate(SampleRate(rate)))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut renderer: Renderer,
) -> Result<Stream, EngineError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _| {
                for frames in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                    let block = &mut mono[..frames.len() / channels];
                    renderer.render(block);

                    // Copy to output (mono to all channels)
                    for (frame, &s) in frames.chunks_mut(channels).zip(block.iter()) {
                        let value = T::from_sample(s);
                        frame.fill(value);
                    }
                }
            },
            |err| log::error!("audio stream error: {err}"),
            None,
        )
        .map_err(|e| EngineError::Stream(e.to_string()))
}
