//! Crate-wide error type.
//!
//! Every fallible operation returns [`Result`]. Callers decide whether an
//! error is surfaced (network, validation) or logged and swallowed
//! (storage, playback).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted document or HTTP body could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The HTTP request itself failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// The key-value storage refused a key or a write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The audio backend is gone or rejected a command.
    #[error("Audio error: {0}")]
    Audio(String),

    /// User input rejected before any request or dispatch.
    #[error("{0}")]
    Validation(String),
}
