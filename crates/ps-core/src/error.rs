//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]` where configuration or I/O problems can surface.

use thiserror::Error;

/// Errors produced by `ps-core` (configuration loading and validation).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `ps-core`.
pub type CoreResult<T> = Result<T, CoreError>;
