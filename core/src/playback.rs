use crate::error::Result;

/// Audio buffer handed from a decoder to an output device
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub sample_rate: u32,
    pub channels: u16,
    /// Interleaved samples normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
}

impl DecodedAudio {
    /// Playback length in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        let frames = self.samples.len() / self.channels as usize;
        frames as f64 / self.sample_rate as f64
    }
}

/// Turns container bytes into a playable buffer
pub trait AudioDecoder {
    fn decode(&mut self, container: &[u8]) -> Result<DecodedAudio>;
}

/// Plays a decoded buffer starting immediately
///
/// Implementations own their device handle; nothing here is process-wide.
pub trait AudioOutput {
    fn play(&mut self, audio: &DecodedAudio) -> Result<()>;
}

/// Decode a container and play it
pub fn play_container<D, O>(decoder: &mut D, output: &mut O, container: &[u8]) -> Result<()>
where
    D: AudioDecoder + ?Sized,
    O: AudioOutput + ?Sized,
{
    let audio = decoder.decode(container)?;
    log::info!(
        "playing {:.2}s of audio ({} Hz, {} ch)",
        audio.duration(),
        audio.sample_rate,
        audio.channels
    );
    output.play(&audio)
}
