//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! ever touching the network — the host application (the mobile UI shell) is
//! responsible for executing the actual I/O. This separation keeps the core
//! deterministic and easy to test, and lets every host inject its own
//! transport and base URL instead of relying on an ambient client.
//!
//! All fields use owned types (`String`, `Vec`) so values can be handed to
//! any host runtime without lifetime concerns.

/// HTTP method for a request. The chat backend uses no verbs beyond these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An HTTP request described as plain data.
///
/// Built by `ChatClient::build_*` methods. The host is responsible for
/// executing this request against the network and returning the
/// corresponding `HttpResponse`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the host after executing an `HttpRequest`, then passed to
/// `ChatClient::parse_*` methods for status checking and deserialization.
/// A transport-level failure produces no response at all; hosts report those
/// through [`crate::ApiError::transport`] instead.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
