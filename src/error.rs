// Unified Error Handling Module
//
// Centralized error types for consistent error management across the engine

use std::io;
use thiserror::Error;

/// Main engine error type
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Fatal: the 2D drawing surface could not be acquired at construction.
    /// Nothing can render without it, so this surfaces immediately.
    #[error("2D surface unavailable: {0}")]
    ContextUnavailable(String),

    #[error("Image encode failed: {0}")]
    Encode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for convenience
pub type CanvasResult<T> = Result<T, CanvasError>;
