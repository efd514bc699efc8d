use crate::error::{ModemError, Result};
use crate::{DEFAULT_FREQ_HIGH, DEFAULT_FREQ_LOW, DEFAULT_SAMPLE_RATE, DEFAULT_SYMBOL_RATE};

/// How the oscillator phase behaves across symbol boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhaseMode {
    /// Phase argument restarts at zero on every symbol.
    ///
    /// Matches the waveform existing receivers were tuned against, including
    /// the discontinuities at each symbol start and at each half-symbol swap.
    #[default]
    SymbolReset,
    /// Phase is accumulated sample by sample across the whole frame
    Continuous,
}

/// Modulator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ModemConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Symbols (bits) per second
    pub symbol_rate: u32,
    /// Tone used for the "high" half of a symbol (Hz)
    pub freq_high: f64,
    /// Tone used for the "low" half of a symbol (Hz)
    pub freq_low: f64,
    pub phase_mode: PhaseMode,
}

impl Default for ModemConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            symbol_rate: DEFAULT_SYMBOL_RATE,
            freq_high: DEFAULT_FREQ_HIGH,
            freq_low: DEFAULT_FREQ_LOW,
            phase_mode: PhaseMode::SymbolReset,
        }
    }
}

impl ModemConfig {
    pub fn new(sample_rate: u32, symbol_rate: u32, freq_high: f64, freq_low: f64) -> Self {
        Self {
            sample_rate,
            symbol_rate,
            freq_high,
            freq_low,
            phase_mode: PhaseMode::SymbolReset,
        }
    }

    pub fn with_phase_mode(mut self, phase_mode: PhaseMode) -> Self {
        self.phase_mode = phase_mode;
        self
    }

    /// Samples in one symbol period
    ///
    /// Integer division: a fractional remainder of `sample_rate / symbol_rate`
    /// is dropped, so 8000 Hz at 300 baud gives 26 samples per symbol.
    pub fn samples_per_symbol(&self) -> usize {
        if self.symbol_rate == 0 {
            return 0;
        }
        (self.sample_rate / self.symbol_rate) as usize
    }

    /// Check every rate and tone is usable before any synthesis happens
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(ModemError::Configuration(
                "sample rate must be positive".into(),
            ));
        }
        if self.symbol_rate == 0 {
            return Err(ModemError::Configuration(
                "symbol rate must be positive".into(),
            ));
        }
        check_frequency("high", self.freq_high)?;
        check_frequency("low", self.freq_low)?;

        if self.samples_per_symbol() == 0 {
            return Err(ModemError::Configuration(format!(
                "symbol rate {} exceeds sample rate {}",
                self.symbol_rate, self.sample_rate
            )));
        }

        let nyquist = self.sample_rate as f64 / 2.0;
        for freq in [self.freq_high, self.freq_low] {
            if freq >= nyquist {
                log::warn!(
                    "tone {} Hz is at or above Nyquist ({} Hz) and will alias",
                    freq,
                    nyquist
                );
            }
        }
        if self.sample_rate % self.symbol_rate != 0 {
            log::debug!(
                "sample rate {} not divisible by symbol rate {}, using {} samples per symbol",
                self.sample_rate,
                self.symbol_rate,
                self.samples_per_symbol()
            );
        }

        Ok(())
    }
}

fn check_frequency(name: &str, freq: f64) -> Result<()> {
    if !freq.is_finite() || freq <= 0.0 {
        return Err(ModemError::Configuration(format!(
            "{} tone frequency must be a positive number, got {}",
            name, freq
        )));
    }
    Ok(())
}
