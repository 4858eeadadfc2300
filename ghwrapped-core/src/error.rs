//! Error types for ghwrapped-core
//!
//! The profile engine itself never returns these; they cover configuration,
//! the GitHub collector and the narrative client.

use thiserror::Error;

/// Main error type for the ghwrapped-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport-level HTTP failure (connect, timeout, non-success status)
    #[error("HTTP error: {0}")]
    Http(String),

    /// GitHub GraphQL returned an `errors` payload or an unexpected shape
    #[error("GitHub error: {0}")]
    GitHub(String),

    /// LLM error
    #[error("LLM error: {0}")]
    Llm(String),
}

/// Result type alias for ghwrapped-core
pub type Result<T> = std::result::Result<T, Error>;
