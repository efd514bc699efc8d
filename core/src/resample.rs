//! Audio resampling helpers for handing modem audio to an output device
//! Uses linear interpolation; good enough for tones well below Nyquist

/// Spread mono audio over `channels` interleaved channels
///
/// # Arguments
/// * `samples` - Mono audio samples
/// * `channels` - Output channel count (1 returns a copy)
///
/// # Returns
/// Interleaved audio [C0, C1, ..., C0, C1, ...] with every channel equal
pub fn mono_to_interleaved(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    let mut interleaved = Vec::with_capacity(samples.len() * channels);
    for &sample in samples {
        interleaved.extend(std::iter::repeat(sample).take(channels));
    }
    interleaved
}

/// Resample audio to a target sample rate using linear interpolation
///
/// # Arguments
/// * `samples` - Input audio samples
/// * `from_rate` - Current sample rate in Hz
/// * `to_rate` - Target sample rate in Hz
///
/// # Returns
/// Resampled audio at the target sample rate
///
/// # Example
/// ```
/// use speakwave_core::resample::resample_audio;
/// let modem = vec![0.0, 0.5, 1.0, 0.5];
/// let device = resample_audio(&modem, 8000, 48000);
/// assert_eq!(device.len(), 24);
/// ```
pub fn resample_audio(samples: &[f32], from_rate: usize, to_rate: usize) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let new_length = ((samples.len() as f64) * ratio).ceil() as usize;
    let mut resampled = Vec::with_capacity(new_length);

    for i in 0..new_length {
        let src_idx = i as f64 / ratio;
        let src_idx_floor = (src_idx.floor() as usize).min(samples.len() - 1);
        let src_idx_ceil = src_idx_floor + 1;
        let fraction = (src_idx - src_idx_floor as f64) as f32;

        let interpolated = if src_idx_ceil < samples.len() {
            samples[src_idx_floor] * (1.0 - fraction) + samples[src_idx_ceil] * fraction
        } else {
            samples[src_idx_floor]
        };

        resampled.push(interpolated);
    }

    resampled
}
