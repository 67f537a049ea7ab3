//! Crate error type
//!
//! The simulation step itself never fails. These cover the fallible edges:
//! config and profile files, custom maps, audio backends.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid map: {message}")]
    InvalidMap { message: String },

    #[error("invalid tuning value `{field}`: {message}")]
    InvalidTuning { field: &'static str, message: String },

    #[error("file not found: {path}")]
    MissingFile { path: PathBuf },

    #[error("audio playback failed: {message}")]
    Audio { message: String },
}
