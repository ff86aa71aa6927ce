//! Tacklesmith error types

use thiserror::Error;

/// Tacklesmith error type
#[derive(Error, Debug)]
pub enum Error {
    /// Concept generation failed; fatal to the run, no invention is produced
    #[error("Generation error: {0}")]
    Generation(String),

    /// Visual generation failed; non-fatal, the invention stays text-only
    #[error("Visual generation error: {0}")]
    Visual(String),

    /// Durable storage is exhausted and no degradation stage could recover
    #[error("Gallery storage is full: {0}")]
    StorageFull(String),

    /// Durable gallery data could not be decoded
    #[error("Gallery data is corrupt: {0}")]
    Corrupt(String),

    /// An imported snapshot is not a sequence of invention records
    #[error("Import format error: {0}")]
    ImportFormat(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Tacklesmith operations
pub type Result<T> = std::result::Result<T, Error>;
