use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::error::AudioError;
use crate::mixer::Mixer;

/// Default output device with its negotiated stream config.
pub struct OutputDevice {
    device: cpal::Device,
    config: cpal::StreamConfig,
}

impl OutputDevice {
    /// Open the default output device of the default host.
    ///
    /// Only f32 devices are accepted; the mixer renders f32 directly.
    ///
    /// # Errors
    /// Returns an error if no device exists or its format is not f32.
    pub fn open_default() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::StreamError(e.to_string()))?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(AudioError::UnsupportedFormat(format!(
                "{:?}",
                supported.sample_format()
            )));
        }

        Ok(Self {
            device,
            config: supported.into(),
        })
    }

    /// Sample rate the mixer must render at.
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Start the output stream; the cpal callback owns `mixer` from now on.
    ///
    /// # Errors
    /// Returns an error if the stream cannot be built or started.
    pub fn start(self, mut mixer: Mixer) -> Result<AudioOutput, AudioError> {
        let channels = usize::from(self.config.channels);
        let sample_rate = self.sample_rate();

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    mixer.fill(data, channels);
                },
                |err| {
                    log::error!("Audio output error: {err}");
                },
                None,
            )
            .map_err(|e| AudioError::StreamError(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamError(e.to_string()))?;
        log::info!("Audio playback started @ {sample_rate}Hz, {channels} ch");

        Ok(AudioOutput { _stream: stream })
    }
}

/// Running output stream. Dropping it stops playback.
pub struct AudioOutput {
    _stream: cpal::Stream,
}
