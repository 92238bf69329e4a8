use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while talking to the compute server.
///
/// Failures reported by the server itself arrive as [`CasError::Remote`] and
/// carry the server's text unmodified.
#[derive(Error, Debug)]
pub enum CasError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Failed to load configuration from {path}: {source}")]
    ConfigLoad {
        source: toml::de::Error,
        path: PathBuf,
    },

    #[error("Frame of {0} bytes exceeds the maximum message size")]
    FrameTooLarge(usize),

    #[error("Connection closed by server")]
    ConnectionClosed,

    #[error("Unexpected response to {action}: {detail}")]
    UnexpectedResponse { action: String, detail: String },

    #[error("Session unusable after an earlier protocol failure: {0}")]
    SessionBroken(String),

    #[error("Action {action} failed with status {status}: {message}")]
    Remote {
        action: String,
        status: i64,
        message: String,
    },

    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Table {0} holds no rows")]
    EmptyTable(String),

    #[error("Column information missing for table {0}")]
    MissingColumnInfo(String),
}

/// Type alias for Result with the crate error type
pub type Result<T> = std::result::Result<T, CasError>;
