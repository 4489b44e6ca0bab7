//! Bearer token subject extraction.
//!
//! # Design
//! The backend issues one long-lived JWT per login and the client treats it
//! as an opaque credential — no signature verification, no expiry handling.
//! The only reason to look inside is the `sub` claim, which carries the
//! account email used for display identity. Any malformation is a
//! [`ApiError::Decode`]: callers log it and carry on with the token intact.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
}

/// Extract the `sub` claim from a compact JWS without verifying it.
pub fn subject(token: &str) -> Result<String, ApiError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(ApiError::Decode(
            "token is not a three-segment compact JWS".to_string(),
        ));
    }
    let payload = URL_SAFE_NO_PAD
        .decode(segments[1])
        .map_err(|e| ApiError::Decode(format!("payload is not base64url: {e}")))?;
    let claims: Claims = serde_json::from_slice(&payload)
        .map_err(|e| ApiError::Decode(format!("payload is not a JSON claim set: {e}")))?;
    match claims.sub {
        Some(sub) if !sub.is_empty() => Ok(sub),
        _ => Err(ApiError::Decode("missing sub claim".to_string())),
    }
}
