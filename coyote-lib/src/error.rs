use std::io;
use thiserror::Error;

/// The primary error type for the `coyote-lib` library.
#[derive(Error, Debug)]
pub enum CoyoteError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Waveform parameter {field} out of range: {value} (max {max})")]
    FieldOutOfRange { field: &'static str, value: u32, max: u32 },

    #[error("No waveform preset named {collection}/{name}")]
    PresetNotFound { collection: String, name: String },

    #[error("Invalid MAC address: {0}")]
    InvalidMacAddress(String),

    #[error("Invalid hex input: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("Insufficient data: expected at least {expected} bytes, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Settings parse error: {0}")]
    Json(#[from] serde_json::Error),
}
