//! Admin authentication against the identity provider
//!
//! Admin routes carry `Authorization: Bearer <token>`. The token is handed
//! to a `TokenVerifier`; only claims with `admin: true` pass.

pub mod verifier;

pub use verifier::{AuthError, Claims, HttpTokenVerifier, StaticTokenVerifier, TokenVerifier};

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;

/// Cookie the admin console stores its ID token in
pub const SESSION_COOKIE: &str = "__session";

/// Token from an `Authorization: Bearer` header, if well formed.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Token from the session cookie, if present.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value)
}
