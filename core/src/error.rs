use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModemError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Container size mismatch: header declares {declared} bytes, buffer holds {actual}")]
    Encoding { declared: usize, actual: usize },

    #[error("Sample data too large for a RIFF container: {0} bytes")]
    DataTooLarge(usize),

    #[error("Malformed container: {0}")]
    MalformedContainer(String),

    #[error("Audio decode failure: {0}")]
    Decode(String),

    #[error("Audio playback failure: {0}")]
    Playback(String),
}

pub type Result<T> = std::result::Result<T, ModemError>;
