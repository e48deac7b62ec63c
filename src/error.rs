use thiserror::Error;

/// Six-axis tracker error types
///
/// The tracking core itself is total; these only surface at the edges
/// (configuration, recorded sessions, device lookup).
#[derive(Error, Debug)]
pub enum SixAxisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Recorded session contains no frames")]
    EmptySession,

    #[error("Unknown npad: {0}")]
    UnknownNpad(String),
}

/// Result type for fallible six-axis operations
pub type Result<T> = std::result::Result<T, SixAxisError>;
