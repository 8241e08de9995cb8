//! Error types for the stream, the health check and configuration.
//! None of these are ever handed to the UI; it only sees present/absent data.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Not JSON at all.
    Syntax,
    /// JSON, but missing fields or wrongly typed.
    Shape,
    /// The backend sent `{"error": ...}` instead of a snapshot.
    Remote,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DecodeErrorKind::Syntax => "malformed payload",
            DecodeErrorKind::Shape => "unexpected payload shape",
            DecodeErrorKind::Remote => "backend reported an error",
        };
        f.write_str(s)
    }
}

/// A payload that could not be turned into a snapshot. Carries the raw text.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {reason}")]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub reason: String,
    pub raw: String,
}

impl DecodeError {
    pub(crate) fn new(kind: DecodeErrorKind, reason: impl Into<String>, raw: &str) -> Self {
        Self {
            kind,
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }
}

/// Connection-level faults on the push stream.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connect failed: {0}")]
    Connect(String),

    #[error("server answered {0}")]
    Status(u16),

    #[error("read failed: {0}")]
    Read(String),

    #[error("stream ended by server")]
    EndOfStream,

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            TransportError::Status(status.as_u16())
        } else if err.is_connect() || err.is_timeout() || err.is_builder() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Read(err.to_string())
        }
    }
}

/// The one-shot health request failed; health stays absent.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("health endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("health request timed out")]
    Timeout,

    #[error("health endpoint answered {0}")]
    Status(u16),

    #[error("invalid health payload: {0}")]
    Invalid(#[from] DecodeError),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Unreachable(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid backend url {url:?}: {reason}")]
    BadUrl { url: String, reason: String },

    #[error("unsupported scheme {0:?} (expected http, https, ws or wss)")]
    Scheme(String),

    #[error("invalid interval {0:?}: must be a positive integer")]
    Interval(String),
}
