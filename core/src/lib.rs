//! Session and API client core for the chat client.
//!
//! # Overview
//! Two collaborating pieces: a [`Session`] store holding the bearer token
//! and the identity derived from it, and a [`ChatClient`] that builds
//! `HttpRequest` values and parses `HttpResponse` values without touching
//! the network (host-does-IO pattern). The host app executes the actual
//! HTTP round-trips, making the core fully deterministic and testable.
//!
//! # Design
//! - `ChatClient` is stateless — it holds only the injected `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//!   Authenticated builds attach the bearer token they are given.
//! - `Session` is an owned value, generic over [`TokenStorage`]; no hidden
//!   singleton, no competing copies.
//! - All failures normalize into [`ApiError`]; screens render its message
//!   through [`RequestState`] and nothing is fatal to the process.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod request_state;
pub mod session;
pub mod storage;
pub mod token;
pub mod types;

pub use client::ChatClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request_state::RequestState;
pub use session::{Session, SessionState};
pub use storage::{MemoryStorage, StorageError, TokenStorage, TOKEN_KEY};
pub use types::{
    CreateGroup, Group, GroupMessage, Login, LoginResponse, Message, PendingRequest, RegisterUser,
    SendMessage, User,
};
