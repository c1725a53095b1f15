//! Error types for key bindings and configuration

use thiserror::Error;

/// Failure while reading a key bindings file
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeymapError {
    #[error("line {line}: cannot parse `{text}`")]
    Syntax { line: usize, text: String },

    #[error("line {line}: no light with index {index}")]
    UnknownLight { line: usize, index: usize },
}

/// Rejected start-up configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("fps must be in 1..={max}, got {value}")]
    Fps { value: u32, max: u32 },

    #[error("speed must be in {min}..={max}, got {value}")]
    Speed { value: u32, min: u32, max: u32 },

    #[error("jitter amplitude must be a finite value >= 0, got {0}")]
    Jitter(f32),
}
