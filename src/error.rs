//! Error types for transcript reconstruction.
//!
//! This module defines all error types that can occur while loading transcript
//! data, resolving a page selection, and writing the output PDF.

/// Result type alias for transcript_press operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during transcript rendering.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The resolved page selection matched nothing in the source data.
    #[error("No matching pages found for the given selection")]
    EmptySelection,

    /// A page spec token could not be parsed (e.g. `--pages 3,x,10-12`).
    #[error("Invalid page spec token '{0}'")]
    InvalidPageSpec(String),

    /// A configuration file could not be read or parsed.
    #[error("Config error in {path}: {reason}")]
    Config {
        /// Path of the offending configuration file
        path: String,
        /// Reason the file was rejected
        reason: String,
    },

    /// The transcript source data is structurally unusable.
    #[error("Transcript source error: {0}")]
    Source(String),

    /// Font loading or parsing error
    #[error("Font error: {0}")]
    Font(String),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
