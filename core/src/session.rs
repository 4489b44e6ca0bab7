//! Session store: single source of truth for "is the user authenticated,
//! and as whom".
//!
//! # Design
//! The session is an explicitly owned value the host's application context
//! holds and shares with its screens — never a hidden module-level
//! singleton. It is generic over [`TokenStorage`], so tests run against
//! [`crate::MemoryStorage`](crate::storage::MemoryStorage) and production
//! hosts plug in the platform's durable store.
//!
//! State machine: a new session is `Loading` until `load` completes, then
//! `Authenticated` or `Unauthenticated`; afterwards `set_token` moves
//! between the two. No other transitions exist — the backend issues a
//! single long-lived token per login, so there is no refresh state.
//!
//! Invariant: `user_email` always reflects the last successful decode of
//! the current token. It is cleared whenever the token is cleared or fails
//! to decode; a decode failure alone never discards the token, which stays
//! usable as credential material.

use crate::storage::{StorageError, TokenStorage};
use crate::token;

/// Where the session currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Startup load has not completed; dependent UI must not render yet.
    Loading,
    /// A token is held. `user_email` is the decoded `sub` claim, or `None`
    /// when the token did not decode.
    Authenticated {
        token: String,
        user_email: Option<String>,
    },
    Unauthenticated,
}

/// Process-wide session store, owned by the host's application context.
#[derive(Debug)]
pub struct Session<S: TokenStorage> {
    state: SessionState,
    storage: S,
}

impl<S: TokenStorage> Session<S> {
    /// A fresh session starts loading; call [`Session::load`] before
    /// rendering anything that depends on authentication.
    pub fn new(storage: S) -> Self {
        Self {
            state: SessionState::Loading,
            storage,
        }
    }

    /// One-shot startup restore from durable storage.
    ///
    /// No persisted token means `Unauthenticated` with no decode attempted.
    /// A persisted token is accepted as credential material even when its
    /// subject claim fails to decode — that failure is logged and only the
    /// derived identity is lost. A storage read failure is likewise logged
    /// and treated as "nothing persisted".
    pub fn load(&mut self) {
        let stored = match self.storage.load() {
            Ok(stored) => stored,
            Err(e) => {
                log::warn!("error reading persisted token: {e}");
                None
            }
        };
        self.state = match stored {
            None => SessionState::Unauthenticated,
            Some(token) => {
                let user_email = decode_subject(&token);
                SessionState::Authenticated { token, user_email }
            }
        };
    }

    /// Set or clear the current token, persisting the change first.
    ///
    /// Calling this before [`Session::load`] has completed is a caller
    /// error, like invoking an authenticated client operation without a
    /// token: only `load` exits `Loading`, and hosts gate login/logout
    /// actions behind the startup restore.
    ///
    /// The storage write happens before any state change and its failure is
    /// returned to the caller with the session untouched — otherwise a
    /// restart could silently log the user out after a login that looked
    /// successful.
    pub fn set_token(&mut self, token: Option<&str>) -> Result<(), StorageError> {
        match token {
            Some(token) => {
                self.storage.store(token)?;
                let user_email = decode_subject(token);
                self.state = SessionState::Authenticated {
                    token: token.to_string(),
                    user_email,
                };
            }
            None => {
                self.storage.clear()?;
                self.state = SessionState::Unauthenticated;
            }
        }
        Ok(())
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Loading
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    /// The bearer token to attach to authenticated API calls.
    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    /// The account email derived from the token's subject claim.
    pub fn user_email(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { user_email, .. } => user_email.as_deref(),
            _ => None,
        }
    }
}

fn decode_subject(token: &str) -> Option<String> {
    match token::subject(token) {
        Ok(sub) => Some(sub),
        Err(e) => {
            log::warn!("error decoding token: {e}");
            None
        }
    }
}
