use clap::Args;
use serde::Deserialize;
use speakwave_core::{FrameLayout, ModemConfig, PhaseMode};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Modem settings as stored in a JSON config file
///
/// Every field is optional in the file; missing ones take the built-in
/// defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModemSettings {
    pub sample_rate: u32,
    pub symbol_rate: u32,
    pub freq_high: f64,
    pub freq_low: f64,
    pub continuous_phase: bool,
    pub preamble_symbols: usize,
    pub postamble_symbols: usize,
}

impl Default for ModemSettings {
    fn default() -> Self {
        let config = ModemConfig::default();
        let layout = FrameLayout::default();
        Self {
            sample_rate: config.sample_rate,
            symbol_rate: config.symbol_rate,
            freq_high: config.freq_high,
            freq_low: config.freq_low,
            continuous_phase: false,
            preamble_symbols: layout.preamble_symbols,
            postamble_symbols: layout.postamble_symbols,
        }
    }
}

impl ModemSettings {
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn config(&self) -> ModemConfig {
        let phase_mode = if self.continuous_phase {
            PhaseMode::Continuous
        } else {
            PhaseMode::SymbolReset
        };
        ModemConfig::new(
            self.sample_rate,
            self.symbol_rate,
            self.freq_high,
            self.freq_low,
        )
        .with_phase_mode(phase_mode)
    }

    pub fn layout(&self) -> FrameLayout {
        FrameLayout::new(self.preamble_symbols, self.postamble_symbols)
    }
}

/// Modem options shared by every subcommand
#[derive(Debug, Clone, Default, Args)]
pub struct ModemArgs {
    /// JSON config file with modem settings (flags override it)
    #[arg(long, global = true, value_name = "FILE.JSON")]
    pub config: Option<PathBuf>,

    /// Output sample rate in Hz [default: 8000]
    #[arg(long, global = true)]
    pub sample_rate: Option<u32>,

    /// Symbols per second [default: 100]
    #[arg(long, global = true)]
    pub symbol_rate: Option<u32>,

    /// High tone frequency in Hz [default: 2000]
    #[arg(long, global = true)]
    pub freq_high: Option<f64>,

    /// Low tone frequency in Hz [default: 1000]
    #[arg(long, global = true)]
    pub freq_low: Option<f64>,

    /// Keep the oscillator phase continuous across symbols
    #[arg(long, global = true, conflicts_with = "symbol_reset")]
    pub continuous_phase: bool,

    /// Restart the oscillator phase at every symbol (the default)
    #[arg(long, global = true)]
    pub symbol_reset: bool,

    /// Preamble length in symbols [default: 20]
    #[arg(long, global = true)]
    pub preamble: Option<usize>,

    /// Postamble length in symbols [default: 5]
    #[arg(long, global = true)]
    pub postamble: Option<usize>,
}

impl ModemArgs {
    /// Defaults, then the config file, then command line flags
    pub fn resolve(&self) -> Result<ModemSettings, SettingsError> {
        let base = match &self.config {
            Some(path) => ModemSettings::from_file(path)?,
            None => ModemSettings::default(),
        };
        Ok(self.apply(base))
    }

    fn apply(&self, mut settings: ModemSettings) -> ModemSettings {
        if let Some(sample_rate) = self.sample_rate {
            settings.sample_rate = sample_rate;
        }
        if let Some(symbol_rate) = self.symbol_rate {
            settings.symbol_rate = symbol_rate;
        }
        if let Some(freq_high) = self.freq_high {
            settings.freq_high = freq_high;
        }
        if let Some(freq_low) = self.freq_low {
            settings.freq_low = freq_low;
        }
        if self.continuous_phase {
            settings.continuous_phase = true;
        }
        if self.symbol_reset {
            settings.continuous_phase = false;
        }
        if let Some(preamble) = self.preamble {
            settings.preamble_symbols = preamble;
        }
        if let Some(postamble) = self.postamble {
            settings.postamble_symbols = postamble;
        }
        settings
    }
}
