//! Common error types for the Sonex engine
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation.

use thiserror::Error;

/// Common result type for Sonex operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the engine crates
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document (de)serialization errors
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generation provider failure (raw provider message)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when a provider failure indicates exhausted credits or a
    /// rejected authorization rather than a transient generation problem.
    ///
    /// Matches case-insensitively on "quota" and on a literal "401"
    /// anywhere in the message.
    pub fn is_quota(&self) -> bool {
        match self {
            Error::Provider(msg) => {
                let lower = msg.to_lowercase();
                lower.contains("quota") || lower.contains("401")
            }
            _ => false,
        }
    }
}
