use speakwave_core::{AudioDecoder, DecodedAudio, ModemError, Result};
use std::io::Cursor;

#[cfg(feature = "playback")]
pub use device::CpalOutput;
#[cfg(not(feature = "playback"))]
pub use disabled::CpalOutput;

/// WAV decoder backed by hound
///
/// Accepts any integer or float PCM WAV, not just the modem's own 8-bit mono
/// output.
#[derive(Debug, Default)]
pub struct HoundDecoder;

impl AudioDecoder for HoundDecoder {
    fn decode(&mut self, container: &[u8]) -> Result<DecodedAudio> {
        let mut reader = hound::WavReader::new(Cursor::new(container))
            .map_err(|e| ModemError::Decode(e.to_string()))?;
        let spec = reader.spec();

        // Extract samples (handle both integer and 32-bit float formats)
        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|e| ModemError::Decode(e.to_string()))?
            }
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| ModemError::Decode(e.to_string()))?,
        };

        log::debug!(
            "decoded WAV: {} Hz, {} channels, {} bits, {} samples",
            spec.sample_rate,
            spec.channels,
            spec.bits_per_sample,
            samples.len()
        );

        Ok(DecodedAudio {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }
}

#[cfg(feature = "playback")]
mod device {
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{FromSample, Sample, SizedSample};
    use speakwave_core::resample::{mono_to_interleaved, resample_audio};
    use speakwave_core::{AudioOutput, DecodedAudio, ModemError, Result};
    use std::sync::mpsc;
    use std::time::Duration;

    /// Default output device of the default host
    ///
    /// The device handle is created by the caller and dropped with this value.
    pub struct CpalOutput {
        device: cpal::Device,
    }

    impl CpalOutput {
        pub fn open_default() -> Result<Self> {
            let host = cpal::default_host();
            let device = host
                .default_output_device()
                .ok_or_else(|| ModemError::Playback("no audio output device found".into()))?;
            log::info!(
                "audio output: {}",
                device.name().unwrap_or_else(|_| "Unknown".to_string())
            );
            Ok(Self { device })
        }

        fn run<T>(
            &self,
            config: &cpal::StreamConfig,
            output: Vec<f32>,
            timeout: Duration,
        ) -> Result<()>
        where
            T: SizedSample + FromSample<f32>,
        {
            let (done_tx, done_rx) = mpsc::channel();
            let mut position = 0usize;
            let mut finished = false;
            let stream = self
                .device
                .build_output_stream(
                    config,
                    move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                        if fill_buffer(data, &output, &mut position) && !finished {
                            finished = true;
                            let _ = done_tx.send(());
                        }
                    },
                    |err| log::error!("audio stream error: {}", err),
                    None,
                )
                .map_err(|e| ModemError::Playback(format!("failed to build audio stream: {}", e)))?;

            stream
                .play()
                .map_err(|e| ModemError::Playback(format!("failed to start audio stream: {}", e)))?;

            if done_rx.recv_timeout(timeout).is_err() {
                log::warn!("playback did not finish within {:.1}s", timeout.as_secs_f64());
            }
            // Let the last device buffer drain before the stream is dropped
            std::thread::sleep(Duration::from_millis(100));
            Ok(())
        }
    }

    /// Copy the next samples into a device buffer, converting to its format
    ///
    /// Pads with silence past the end and returns true once everything has
    /// been handed over.
    fn fill_buffer<T>(data: &mut [T], output: &[f32], position: &mut usize) -> bool
    where
        T: SizedSample + FromSample<f32>,
    {
        for out in data.iter_mut() {
            let sample = output.get(*position).copied().unwrap_or(0.0);
            *out = T::from_sample(sample);
            *position += 1;
        }
        *position >= output.len()
    }

    impl AudioOutput for CpalOutput {
        /// Blocks until the buffer has been handed to the device
        fn play(&mut self, audio: &DecodedAudio) -> Result<()> {
            let supported = self
                .device
                .default_output_config()
                .map_err(|e| ModemError::Playback(format!("failed to get audio config: {}", e)))?;
            let sample_format = supported.sample_format();
            let config: cpal::StreamConfig = supported.into();

            let device_rate = config.sample_rate.0;
            let device_channels = config.channels as usize;

            // Mix down to mono first, then fit the device rate and channel count
            let mono: Vec<f32> = audio
                .samples
                .chunks(audio.channels.max(1) as usize)
                .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
                .collect();
            let resampled = resample_audio(&mono, audio.sample_rate as usize, device_rate as usize);
            let output = mono_to_interleaved(&resampled, device_channels);
            log::debug!(
                "resampled {} Hz -> {} Hz, {} channel(s), {:?}, {} samples",
                audio.sample_rate,
                device_rate,
                device_channels,
                sample_format,
                output.len()
            );

            let timeout = Duration::from_secs_f64(audio.duration() + 1.0);
            match sample_format {
                cpal::SampleFormat::F32 => self.run::<f32>(&config, output, timeout),
                cpal::SampleFormat::F64 => self.run::<f64>(&config, output, timeout),
                cpal::SampleFormat::I8 => self.run::<i8>(&config, output, timeout),
                cpal::SampleFormat::I16 => self.run::<i16>(&config, output, timeout),
                cpal::SampleFormat::I32 => self.run::<i32>(&config, output, timeout),
                cpal::SampleFormat::U8 => self.run::<u8>(&config, output, timeout),
                cpal::SampleFormat::U16 => self.run::<u16>(&config, output, timeout),
                cpal::SampleFormat::U32 => self.run::<u32>(&config, output, timeout),
                other => Err(ModemError::Playback(format!(
                    "unsupported device sample format {:?}",
                    other
                ))),
            }
        }
    }

}

#[cfg(not(feature = "playback"))]
mod disabled {
    use speakwave_core::{AudioOutput, DecodedAudio, ModemError, Result};

    /// Stand-in used when the binary is built without the `playback` feature
    pub struct CpalOutput;

    impl CpalOutput {
        pub fn open_default() -> Result<Self> {
            Err(ModemError::Playback(
                "speakwave was built without the `playback` feature".into(),
            ))
        }
    }

    impl AudioOutput for CpalOutput {
        fn play(&mut self, _audio: &DecodedAudio) -> Result<()> {
            Err(ModemError::Playback(
                "speakwave was built without the `playback` feature".into(),
            ))
        }
    }
}
