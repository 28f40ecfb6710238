//! Error types for configuration, audio and output sinks.

use std::path::PathBuf;

/// Invalid or unreadable pipeline configuration.
///
/// Raised by `validate()` at startup, never from inside a tick.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Transform size outside the supported power-of-two range
    #[error("FFT size must be a power of 2 in {min}..={max}, got {got}")]
    FftSize { got: usize, min: usize, max: usize },

    /// Zero-length snapshot buffer
    #[error("{name} buffer length must be > 0")]
    EmptyBuffer { name: &'static str },

    /// Snapshot buffer larger than the analyser can fill
    #[error("{name} buffer length {len} exceeds analyser capacity {capacity}")]
    BufferTooLong {
        name: &'static str,
        len: usize,
        capacity: usize,
    },

    /// Smoothing factor outside (0, 1]
    #[error("smoothing rate '{name}' must be in (0, 1], got {value}")]
    SmoothingRate { name: &'static str, value: f32 },

    /// Remap with identical input bounds
    #[error("degenerate range for '{name}': {min} == {max}")]
    DegenerateRange { name: String, min: f32, max: f32 },

    /// Any other rejected value
    #[error("invalid {name}: {reason}")]
    Invalid { name: String, reason: String },

    /// Tuning file could not be read
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Tuning file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration could not be written back out as TOML
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl ConfigError {
    pub(crate) fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Audio asset and playback failures.
#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    /// Malformed or missing audio asset
    #[error("failed to decode {label}: {reason}")]
    Decode { label: String, reason: String },

    /// No usable output device or configuration
    #[error("Audio device error: {0}")]
    Device(String),

    /// Stream could not be built or started
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// Snapshot read failed for this tick
    #[error("audio read failed: {0}")]
    Read(String),
}

/// Renderer sink failures (logged per tick, never fatal to the loop).
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Startup failures surfaced by the binary.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
