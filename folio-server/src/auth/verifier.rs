//! Token verification backends

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Verified identity claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(alias = "sub", alias = "user_id")]
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Elevated-privilege flag set on the account by the identity provider
    #[serde(default)]
    pub admin: bool,
}

impl Claims {
    pub fn admin(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            admin: true,
        }
    }

    pub fn user(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            admin: false,
        }
    }
}

/// Token verification failure
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider rejected the token (expired, revoked, malformed)
    #[error("invalid or expired token")]
    InvalidToken,

    /// The provider could not be reached or answered unexpectedly
    #[error("identity provider error: {0}")]
    Provider(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        Self::Provider(e.to_string())
    }
}

/// Checks a bearer token and returns its claims.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

/// Verification request body
#[derive(Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

/// Verifies tokens by calling the identity provider's HTTP endpoint.
///
/// The endpoint receives `{"token": "..."}` and answers 2xx with the decoded
/// claims, or 400/401/403 when the token is not acceptable.
pub struct HttpTokenVerifier {
    client: reqwest::Client,
    verify_url: String,
    api_key: Option<String>,
}

/// Upper bound on one verification round trip
const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

impl HttpTokenVerifier {
    pub fn new(verify_url: impl Into<String>, api_key: Option<String>) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder().timeout(VERIFY_TIMEOUT).build()?;
        Ok(Self {
            client,
            verify_url: verify_url.into(),
            api_key,
        })
    }
}

#[async_trait]
impl TokenVerifier for HttpTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut request = self.client.post(&self.verify_url).json(&VerifyRequest { token });
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        match response.status() {
            s if s.is_success() => Ok(response.json::<Claims>().await?),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AuthError::InvalidToken)
            }
            s => Err(AuthError::Provider(format!(
                "verification endpoint returned {}",
                s
            ))),
        }
    }
}

/// Fixed token table. Used by tests and the development admin token.
#[derive(Debug, Default, Clone)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, Claims>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token and the claims it resolves to.
    pub fn with_token(mut self, token: impl Into<String>, claims: Claims) -> Self {
        self.tokens.insert(token.into(), claims);
        self
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.tokens.get(token).cloned().ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::{HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use crate::testing::spawn_upstream;

    #[tokio::test]
    async fn static_verifier_resolves_known_tokens() {
        let verifier = StaticTokenVerifier::new()
            .with_token("root", Claims::admin("u1"))
            .with_token("guest", Claims::user("u2"));

        assert!(verifier.verify("root").await.unwrap().admin);
        assert!(!verifier.verify("guest").await.unwrap().admin);
        assert!(matches!(
            verifier.verify("nope").await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn claims_accept_provider_aliases() {
        let claims: Claims =
            serde_json::from_str(r#"{"sub": "abc", "email": "a@b.co", "admin": true}"#).unwrap();
        assert_eq!(claims.uid, "abc");
        assert!(claims.admin);

        let claims: Claims = serde_json::from_str(r#"{"user_id": "xyz"}"#).unwrap();
        assert_eq!(claims.uid, "xyz");
        assert!(!claims.admin);
    }

    /// Identity provider stand-in: wants `x-api-key: site-key`, then
    /// answers according to the token.
    async fn verify_endpoint(headers: HeaderMap, Json(body): Json<Value>) -> Response {
        if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("site-key") {
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
        match body["token"].as_str() {
            Some("admin-token") => {
                Json(json!({"sub": "u1", "email": "a@example.com", "admin": true})).into_response()
            }
            Some("user-token") => Json(json!({"uid": "u2"})).into_response(),
            Some("malformed") => StatusCode::BAD_REQUEST.into_response(),
            Some("expired") => StatusCode::UNAUTHORIZED.into_response(),
            Some("revoked") => StatusCode::FORBIDDEN.into_response(),
            _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }

    async fn provider(api_key: Option<&str>) -> HttpTokenVerifier {
        let router = Router::new().route("/verify", post(verify_endpoint));
        let base = spawn_upstream(router).await;
        HttpTokenVerifier::new(format!("{}/verify", base), api_key.map(str::to_owned)).unwrap()
    }

    #[tokio::test]
    async fn http_verifier_decodes_claims() {
        let verifier = provider(Some("site-key")).await;

        let admin = verifier.verify("admin-token").await.unwrap();
        assert_eq!(admin.uid, "u1");
        assert_eq!(admin.email.as_deref(), Some("a@example.com"));
        assert!(admin.admin);

        let user = verifier.verify("user-token").await.unwrap();
        assert_eq!(user, Claims::user("u2"));
    }

    #[tokio::test]
    async fn rejected_tokens_are_invalid_not_provider_errors() {
        let verifier = provider(Some("site-key")).await;
        for token in ["malformed", "expired", "revoked"] {
            assert!(
                matches!(verifier.verify(token).await, Err(AuthError::InvalidToken)),
                "{token}"
            );
        }
        assert!(matches!(
            verifier.verify("crash").await,
            Err(AuthError::Provider(_))
        ));
    }

    #[tokio::test]
    async fn api_key_is_sent_as_header() {
        let keyless = provider(None).await;
        assert!(matches!(
            keyless.verify("admin-token").await,
            Err(AuthError::Provider(msg)) if msg.contains("503")
        ));
    }
}
