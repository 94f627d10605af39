//! Custom Axum extractors

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, FromRequestParts, Path};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use uuid::Uuid;

use super::error::ApiError;
use crate::auth::{bearer_token, Claims};
use crate::models::ValidationError;
use crate::state::AppState;

/// Extract and validate a document id from path
pub struct ValidId(pub Uuid);

impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        let uuid = Uuid::parse_str(&id).map_err(|_| {
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "id",
                reason: "invalid UUID format",
            })
        })?;

        Ok(Self(uuid))
    }
}

/// Caller holding a verified token with the `admin` claim.
///
/// Missing or rejected token is 401, a valid non-admin token is 403.
#[derive(Debug)]
pub struct AdminUser(pub Claims);

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthorized {
            message: "missing bearer token",
        })?;

        let claims = state.verifier.verify(token).await?;
        if !claims.admin {
            tracing::debug!(uid = %claims.uid, "non-admin token on admin route");
            return Err(ApiError::Forbidden {
                reason: "admin privileges required".into(),
            });
        }

        Ok(Self(claims))
    }
}

/// Optional admin identity for public routes that reveal more to admins.
#[derive(Debug, Default)]
pub struct MaybeAdmin(pub Option<Claims>);

impl MaybeAdmin {
    pub fn is_admin(&self) -> bool {
        self.0.as_ref().is_some_and(|claims| claims.admin)
    }
}

impl FromRequestParts<Arc<AppState>> for MaybeAdmin {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(Self(None));
        };
        Ok(Self(verified_admin(state, token).await))
    }
}

/// Claims for `token` when it verifies and carries the admin claim.
pub async fn verified_admin(state: &AppState, token: &str) -> Option<Claims> {
    match state.verifier.verify(token).await {
        Ok(claims) if claims.admin => Some(claims),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring unverified token");
            None
        }
    }
}

/// Best-effort client address used as the rate-limit key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(Self(client_ip(&parts.headers, peer)))
    }
}

/// First `X-Forwarded-For` hop, then `X-Real-IP`, then the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(first) = header("x-forwarded-for")
        .and_then(|list| list.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return first.to_owned();
    }
    if let Some(real) = header("x-real-ip") {
        return real.to_owned();
    }
    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn forwarded_for_wins() {
        let h = headers(&[
            ("x-forwarded-for", "203.0.113.7, 10.0.0.1"),
            ("x-real-ip", "198.51.100.2"),
        ]);
        assert_eq!(client_ip(&h, None), "203.0.113.7");
    }

    #[test]
    fn real_ip_then_peer() {
        let h = headers(&[("x-real-ip", "198.51.100.2")]);
        assert_eq!(client_ip(&h, None), "198.51.100.2");

        let peer = SocketAddr::from(([192, 0, 2, 1], 5000));
        assert_eq!(client_ip(&HeaderMap::new(), Some(peer)), "192.0.2.1");
    }

    #[test]
    fn unknown_without_any_source() {
        let h = headers(&[("x-forwarded-for", " ")]);
        assert_eq!(client_ip(&h, None), "unknown");
    }
}
