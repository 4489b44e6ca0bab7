//! Reusable request lifecycle for screens.
//!
//! Every screen drives one pending flag and one inline error message per
//! request; this wrapper replaces those ad hoc flags with a single shape
//! consumed uniformly. A late resolution landing after the screen has moved
//! on is a plain value assignment — it can only overwrite state, never
//! crash, so in-flight requests need no cancellation support.

use crate::error::ApiError;

/// Lifecycle of one screen-initiated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState<T> {
    /// Nothing in flight and nothing to show.
    Idle,
    /// A request was started and has not resolved.
    Loading,
    Success(T),
    /// Holds the display message from the failed call.
    Error(String),
}

impl<T> RequestState<T> {
    pub fn new() -> Self {
        RequestState::Idle
    }

    /// Mark a request as in flight. Starting over an existing state simply
    /// replaces it; duplicate submissions are not deduplicated here.
    pub fn start(&mut self) {
        *self = RequestState::Loading;
    }

    /// Feed the outcome of an API call back into the screen.
    pub fn resolve(&mut self, result: Result<T, ApiError>) {
        *self = match result {
            Ok(value) => RequestState::Success(value),
            Err(e) => RequestState::Error(e.to_string()),
        };
    }

    pub fn reset(&mut self) {
        *self = RequestState::Idle;
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            RequestState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        RequestState::Idle
    }
}
