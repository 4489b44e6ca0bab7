//! Error types for the chat API client and session store.
//!
//! # Design
//! Every failure a screen can observe collapses into one enum. `Request`
//! covers both "the server answered with a non-2xx status" (status is
//! `Some`) and "no response arrived at all" (status is `None`); screens
//! display its message either way and never branch on the distinction.
//! `Decode` is reserved for malformed session tokens — it is logged and
//! degrades the derived identity, never the credential itself.

use std::fmt;

/// Errors surfaced by `ChatClient` and the session store.
#[derive(Debug)]
pub enum ApiError {
    /// A required field was missing or empty. Raised before any request is
    /// built, so no network traffic happens for invalid input.
    Validation(String),

    /// The server returned a non-2xx status (`status` is `Some`), or the
    /// request never produced a response (`status` is `None`). The message
    /// is the server-provided `message` field when one was present,
    /// otherwise an operation-specific fallback.
    Request {
        status: Option<u16>,
        message: String,
    },

    /// The session token could not be decoded. Non-fatal: the token stays
    /// usable as credential material, only the derived identity is lost.
    Decode(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),

    /// A success response body could not be deserialized into the expected
    /// type.
    DeserializationError(String),
}

impl ApiError {
    /// Wrap a transport-level failure (no response received) reported by
    /// the host executor.
    pub fn transport(message: impl Into<String>) -> Self {
        ApiError::Request {
            status: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "{msg}"),
            // Screens render this inline; the status code stays in Debug.
            ApiError::Request { message, .. } => write!(f, "{message}"),
            ApiError::Decode(msg) => write!(f, "failed to decode token: {msg}"),
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
