//! Error types for the lip-sync engine.
//!
//! Only input and configuration problems surface as errors.  Timing gaps and
//! unresolvable words are absorbed by the timeline builder and the G2P
//! fallbacks; engine failures are reported through the controller status.

/// Top-level error type for the viseme engine.
#[derive(Debug, thiserror::Error)]
pub enum LipSyncError {
    /// Nothing speakable left after cleaning the input text.
    #[error("empty input: no speakable text after cleaning")]
    EmptyInput,

    /// The speech engine refused or failed an operation.
    #[error("speech engine error: {0}")]
    Speech(String),

    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),

    /// Malformed JSON configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, LipSyncError>;
