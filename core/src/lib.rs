//! Acoustic data modem: Manchester-coded binary FSK packed into 8-bit PCM WAV
//!
//! Each symbol carries one high-tone half and one low-tone half; the order of
//! the halves is the bit value. Frames are preamble + payload + postamble.

pub mod config;
pub mod encoder;
pub mod error;
pub mod framing;
pub mod fsk;
pub mod hdlc;
pub mod playback;
pub mod resample;
pub mod wav;

pub use config::{ModemConfig, PhaseMode};
pub use encoder::Modulator;
pub use error::{ModemError, Result};
pub use framing::FrameLayout;
pub use fsk::FskModulator;
pub use playback::{play_container, AudioDecoder, AudioOutput, DecodedAudio};
pub use wav::{encode_wav, WavHeader};

// Default modem configuration
pub const DEFAULT_SAMPLE_RATE: u32 = 8000;
pub const DEFAULT_SYMBOL_RATE: u32 = 100;
pub const DEFAULT_FREQ_HIGH: f64 = 2000.0; // Hz
pub const DEFAULT_FREQ_LOW: f64 = 1000.0; // Hz

// Frame configuration
pub const PREAMBLE_SYMBOLS: usize = 20;
pub const POSTAMBLE_SYMBOLS: usize = 5;

// Container configuration
pub const WAV_HEADER_SIZE: usize = 44;
pub const PCM_CENTER: f64 = 128.0;
pub const PCM_AMPLITUDE: f64 = 127.0;
