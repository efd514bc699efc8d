use crate::config::{ModemConfig, PhaseMode};
use crate::error::Result;
use crate::framing::FrameLayout;
use crate::wav;
use crate::{PCM_AMPLITUDE, PCM_CENTER};
use std::f64::consts::PI;

// Manchester-coded binary FSK
//
// Every symbol is split into two halves played on different tones:
// - bit 1: high tone, then low tone
// - bit 0: low tone, then high tone
// So there is a tone transition in the middle of every symbol no matter what
// the payload is, which gives the receiver an edge to recover the clock from.
//
// Samples are unsigned 8-bit PCM centered at 128:
//   sample = trunc(128 + 127 * sin(phase))
// The sine is evaluated in f64 and narrowed by truncation toward zero; the
// result always lies in [1, 255].

/// Narrow an amplitude to unsigned 8-bit PCM
fn to_pcm8(value: f64) -> u8 {
    (PCM_CENTER + PCM_AMPLITUDE * value) as u8
}

/// Waveform synthesizer for framed Manchester FSK
#[derive(Debug, Clone)]
pub struct FskModulator {
    config: ModemConfig,
    layout: FrameLayout,
    samples_per_symbol: usize,
}

impl FskModulator {
    /// Validates the configuration; nothing is synthesized on error
    pub fn new(config: ModemConfig) -> Result<Self> {
        Self::with_layout(config, FrameLayout::default())
    }

    pub fn with_layout(config: ModemConfig, layout: FrameLayout) -> Result<Self> {
        config.validate()?;
        let samples_per_symbol = config.samples_per_symbol();
        log::debug!(
            "FSK modulator: {} Hz, {} baud, {} samples/symbol, tones {}/{} Hz, {:?}",
            config.sample_rate,
            config.symbol_rate,
            samples_per_symbol,
            config.freq_high,
            config.freq_low,
            config.phase_mode
        );
        Ok(Self {
            config,
            layout,
            samples_per_symbol,
        })
    }

    pub fn config(&self) -> &ModemConfig {
        &self.config
    }

    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    pub fn samples_per_symbol(&self) -> usize {
        self.samples_per_symbol
    }

    /// Number of PCM samples a payload of `payload_len` bits produces
    ///
    /// Saturates at `usize::MAX`; see `checked_frame_samples` for the
    /// container limit.
    pub fn frame_samples(&self, payload_len: usize) -> usize {
        self.layout
            .checked_frame_len(payload_len)
            .and_then(|symbols| symbols.checked_mul(self.samples_per_symbol))
            .unwrap_or(usize::MAX)
    }

    /// Sample count for a payload, checked against what one WAV container
    /// can hold. Nothing is allocated.
    pub fn checked_frame_samples(&self, payload_len: usize) -> Result<usize> {
        let samples = self.frame_samples(payload_len);
        wav::data_size(samples)?;
        Ok(samples)
    }

    /// Tone for local sample `i` of a symbol carrying `value`
    fn tone(&self, value: bool, i: usize) -> f64 {
        // `2 * i < sps` is `i < sps / 2` without losing the half sample
        // when sps is odd
        let first_half = 2 * i < self.samples_per_symbol;
        if first_half == value {
            self.config.freq_high
        } else {
            self.config.freq_low
        }
    }

    /// Append one symbol whose phase argument starts at zero
    pub fn modulate_symbol(&self, value: bool, out: &mut Vec<u8>) {
        let sample_rate = self.config.sample_rate as f64;
        for i in 0..self.samples_per_symbol {
            let freq = self.tone(value, i);
            let phase = (2.0 * PI) * (i as f64 / sample_rate) * freq;
            out.push(to_pcm8(phase.sin()));
        }
    }

    /// Append one symbol continuing from `phase`, which is updated in place
    fn modulate_symbol_continuous(&self, value: bool, phase: &mut f64, out: &mut Vec<u8>) {
        let sample_rate = self.config.sample_rate as f64;
        for i in 0..self.samples_per_symbol {
            out.push(to_pcm8(phase.sin()));
            let freq = self.tone(value, i);
            *phase = (*phase + 2.0 * PI * freq / sample_rate) % (2.0 * PI);
        }
    }

    /// Synthesize the framed waveform for a bit sequence
    ///
    /// An empty bit sequence produces no samples at all (not even the
    /// preamble).
    pub fn synthesize(&self, bits: &[u8]) -> Vec<u8> {
        if bits.is_empty() {
            return Vec::new();
        }

        // Only pre-size frames a container could hold
        let capacity = self.checked_frame_samples(bits.len()).unwrap_or(0);
        let mut samples = Vec::with_capacity(capacity);
        match self.config.phase_mode {
            PhaseMode::SymbolReset => {
                for symbol in self.layout.symbols(bits) {
                    self.modulate_symbol(symbol, &mut samples);
                }
            }
            PhaseMode::Continuous => {
                let mut phase = 0.0f64;
                for symbol in self.layout.symbols(bits) {
                    self.modulate_symbol_continuous(symbol, &mut phase, &mut samples);
                }
            }
        }

        log::trace!(
            "synthesized {} bits into {} samples",
            bits.len(),
            samples.len()
        );
        samples
    }
}
