//! Core results and error types

use thiserror::Error;

/// Errors raised while reading or decoding a plan.
#[derive(Debug, Error)]
pub enum Error {
    /// The plan text is not a JSON plan document.
    #[error("invalid plan JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The plan file could not be read.
    #[error("could not read plan file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Core result type
pub type Result<T> = std::result::Result<T, Error>;
