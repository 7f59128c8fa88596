//! Error types for the Thumbsmith pipeline.
//!
//! Errors are organized by stage. Per-item failures (a URL that won't
//! download, an image that won't decode) are recovered locally by the
//! stage that hit them; only queue-protocol violations and workspace
//! setup failures abort a run.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Thumbsmith operations.
#[derive(Error, Debug)]
pub enum ThumbsmithError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Download failed (network error, non-2xx status, or write failure)
    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Writing a resized variant failed
    #[error("Persist error for {path}: {message}")]
    Persist { path: PathBuf, message: String },

    /// Shutdown-signal accounting broke: a worker exited abnormally or
    /// the pool could not be joined. Not recoverable by the caller.
    #[error("Queue protocol violation: {message}")]
    QueueProtocol { message: String },
}

/// Convenience type alias for Thumbsmith results.
pub type Result<T> = std::result::Result<T, ThumbsmithError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
