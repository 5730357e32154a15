//! Error types for calor-effects.
//!
//! Everything the public API can fail at surfaces through [`CalorError`]; no
//! exception crosses the public API surface — the few callers that
//! cannot recover from a malformed input report a diagnostic instead of
//! propagating an error (manifest parse failures, unknown-call policy).

use thiserror::Error;

/// Main error type for calor-effects operations.
#[derive(Debug, Error)]
pub enum CalorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("manifest error: {0}")]
    Manifest(String),

    #[error("resolver error: {0}")]
    Resolve(String),

    #[error("analysis error: {0}")]
    Analysis(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl CalorError {
    pub fn manifest(msg: impl Into<String>) -> Self {
        CalorError::Manifest(msg.into())
    }

    pub fn analysis(msg: impl Into<String>) -> Self {
        CalorError::Analysis(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        CalorError::Config(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CalorError>;
