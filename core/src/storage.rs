//! Durable token storage seam.
//!
//! # Design
//! The persisted local state is exactly one string: the bearer token. Hosts
//! implement [`TokenStorage`] over whatever key-value store the platform
//! provides (mobile secure storage, browser local storage, a file). The
//! session store is generic over this trait, so tests substitute
//! [`MemoryStorage`] without process-wide side effects.

use std::fmt;

/// Storage key hosts backed by a shared key-value store should use, so the
/// persisted token survives a reinstall of the client over an older build.
pub const TOKEN_KEY: &str = "jwtToken";

/// A durable storage operation failed. Carries the host's own description;
/// the core does not interpret it.
#[derive(Debug)]
pub struct StorageError(pub String);

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token storage failed: {}", self.0)
    }
}

impl std::error::Error for StorageError {}

/// Host-provided persistence for the bearer token.
pub trait TokenStorage {
    /// Read the persisted token, if any. Called once at startup.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Persist `token`, replacing any previous value.
    fn store(&mut self, token: &str) -> Result<(), StorageError>;

    /// Remove the persisted token. Removing an absent value is not an error.
    fn clear(&mut self) -> Result<(), StorageError>;
}

// Lets a caller lend its storage to one session and reuse it afterwards,
// e.g. tests simulating separate process runs over one backing store.
impl<S: TokenStorage + ?Sized> TokenStorage for &mut S {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn store(&mut self, token: &str) -> Result<(), StorageError> {
        (**self).store(token)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        (**self).clear()
    }
}

/// In-memory [`TokenStorage`]: the test double, also usable by hosts that
/// deliberately forget the session on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    token: Option<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a token already persisted, as if a prior run stored one.
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
        }
    }
}

impl TokenStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.token.clone())
    }

    fn store(&mut self, token: &str) -> Result<(), StorageError> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.token = None;
        Ok(())
    }
}
