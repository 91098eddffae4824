//! Error types shared across the library.
//!
//! Every fallible public operation returns [`MicroError`]. There is no retry
//! or silent recovery anywhere: a failed resource load is reported to the
//! caller and is not cached, so a later request attempts the search and load
//! again.

use thiserror::Error;

/// Unified error type for resource loading, parsing and input queries.
#[derive(Debug, Error)]
pub enum MicroError {
    /// A resource or animation name does not match the identifier rules
    /// (an ASCII letter followed by letters or digits).
    #[error("invalid name `{0}`: names start with a letter followed by letters or digits")]
    InvalidName(String),

    /// No backing file (or device) exists for the requested name.
    #[error("no {kind} named `{name}` was found")]
    NotFound { kind: &'static str, name: String },

    /// The animation name is well formed but the image does not define it.
    #[error("image `{image}` has no animation named `{animation}`")]
    UnknownAnimation { image: String, animation: String },

    /// A backing file was located but the loader rejected it.
    #[error("failed to load `{path}`: {reason}")]
    Load { path: String, reason: String },

    /// A metadata or tile-map file is malformed. The message carries the
    /// file name and, where meaningful, the offending line or section.
    #[error("{file}: {message}")]
    Format { file: String, message: String },

    /// A value parsed correctly but falls outside its valid range.
    #[error("{0}")]
    Validation(String),

    /// Window, renderer or audio device initialization failed.
    #[error("initialization failed: {0}")]
    Init(String),
}

impl MicroError {
    /// Shorthand for a [`MicroError::Format`] with file context.
    pub fn format(file: impl Into<String>, message: impl Into<String>) -> Self {
        MicroError::Format {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`MicroError::Load`] with path context.
    pub fn load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        MicroError::Load {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
