use crate::config::ModemConfig;
use crate::error::Result;
use crate::framing::FrameLayout;
use crate::fsk::FskModulator;
use crate::hdlc::HdlcEncoder;
use crate::wav::encode_wav;
use crate::WAV_HEADER_SIZE;

/// Bits-to-WAV pipeline
///
/// Synthesizes the framed FSK waveform and wraps it in a mono 8-bit WAV
/// container. Pure and deterministic: the same configuration and bits always
/// give the same bytes.
#[derive(Debug, Clone)]
pub struct Modulator {
    fsk: FskModulator,
}

impl Modulator {
    pub fn new(config: ModemConfig) -> Result<Self> {
        Ok(Self {
            fsk: FskModulator::new(config)?,
        })
    }

    pub fn with_layout(config: ModemConfig, layout: FrameLayout) -> Result<Self> {
        Ok(Self {
            fsk: FskModulator::with_layout(config, layout)?,
        })
    }

    pub fn config(&self) -> &ModemConfig {
        self.fsk.config()
    }

    pub fn layout(&self) -> FrameLayout {
        self.fsk.layout()
    }

    pub fn samples_per_symbol(&self) -> usize {
        self.fsk.samples_per_symbol()
    }

    /// Container length in bytes for a payload of `payload_bits` bits
    pub fn container_len(&self, payload_bits: usize) -> usize {
        WAV_HEADER_SIZE.saturating_add(self.fsk.frame_samples(payload_bits))
    }

    /// Raw 8-bit PCM samples for a bit sequence (empty for empty input)
    pub fn synthesize(&self, bits: &[u8]) -> Vec<u8> {
        self.fsk.synthesize(bits)
    }

    /// Encode bits into a WAV container
    ///
    /// Returns `Ok(None)` when there is nothing to send, which is different
    /// from a container holding zero samples.
    pub fn encode(&self, bits: &[u8]) -> Result<Option<Vec<u8>>> {
        if bits.is_empty() {
            log::debug!("empty bit sequence, no container produced");
            return Ok(None);
        }

        // Reject oversized frames before a single sample is produced
        let expected = self.fsk.checked_frame_samples(bits.len())?;
        let samples = self.fsk.synthesize(bits);
        debug_assert_eq!(samples.len(), expected);
        let container = encode_wav(&samples, self.config().sample_rate)?;
        log::debug!(
            "encoded {} bits into {} samples ({} byte container)",
            bits.len(),
            samples.len(),
            container.len()
        );
        Ok(Some(container))
    }

    /// HDLC-frame a byte message and encode the resulting bits
    ///
    /// An empty message produces no container.
    pub fn encode_message(&self, message: &[u8]) -> Result<Option<Vec<u8>>> {
        if message.is_empty() {
            log::debug!("empty message, no container produced");
            return Ok(None);
        }
        let bits = HdlcEncoder::new().encode_frame(message);
        self.encode(&bits)
    }
}
