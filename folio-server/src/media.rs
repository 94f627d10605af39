//! Image hosting on a third-party media CDN
//!
//! The admin console uploads files straight to the host using parameters
//! signed here, so image bytes never pass through this server. Deletion is
//! a signed server-side call.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::ValidationError;

/// Default host API base
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Maximum length of folder names and public ids
const MAX_ASSET_PATH_LEN: usize = 200;

/// Parameters the browser sends along with a direct upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedUpload {
    pub upload_url: String,
    pub api_key: String,
    pub cloud_name: String,
    pub folder: String,
    pub timestamp: i64,
    pub signature: String,
    pub signature_algorithm: &'static str,
}

/// Media host failure
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("media host request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("media host returned status {status}: {body}")]
    Host { status: u16, body: String },

    #[error("asset '{0}' not found")]
    NotFound(String),

    #[error("media host refused the request: {0}")]
    Rejected(String),
}

/// Signs uploads and deletes hosted assets.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Signed parameters for a direct upload into `folder` (default folder if `None`).
    fn sign_upload(&self, folder: Option<&str>) -> SignedUpload;

    /// Remove an asset by its public id.
    async fn destroy(&self, public_id: &str) -> Result<(), MediaError>;
}

/// Credentials for the media host account
#[derive(Debug, Clone)]
pub struct MediaCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub default_folder: String,
}

/// Cloudinary-style media host client
pub struct CloudMediaHost {
    client: reqwest::Client,
    credentials: MediaCredentials,
    api_base: String,
}

/// Host's answer to a destroy call
#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

impl CloudMediaHost {
    pub fn new(credentials: MediaCredentials) -> Result<Self, MediaError> {
        Self::with_api_base(credentials, DEFAULT_API_BASE)
    }

    /// Point the client at a different API base (self-hosted proxy, tests).
    pub fn with_api_base(
        credentials: MediaCredentials,
        api_base: impl Into<String>,
    ) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            credentials,
            api_base: api_base.into().trim_end_matches('/').to_owned(),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{}",
            self.api_base, self.credentials.cloud_name, action
        )
    }
}

#[async_trait]
impl MediaHost for CloudMediaHost {
    fn sign_upload(&self, folder: Option<&str>) -> SignedUpload {
        let folder = folder
            .unwrap_or(&self.credentials.default_folder)
            .to_owned();
        let timestamp = Utc::now().timestamp();
        let ts = timestamp.to_string();
        let signature = sign(
            &[("folder", folder.as_str()), ("timestamp", ts.as_str())],
            &self.credentials.api_secret,
        );

        SignedUpload {
            upload_url: self.endpoint("upload"),
            api_key: self.credentials.api_key.clone(),
            cloud_name: self.credentials.cloud_name.clone(),
            folder,
            timestamp,
            signature,
            signature_algorithm: "sha256",
        }
    }

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(
            &[("public_id", public_id), ("timestamp", timestamp.as_str())],
            &self.credentials.api_secret,
        );

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .form(&[
                ("public_id", public_id),
                ("timestamp", timestamp.as_str()),
                ("api_key", self.credentials.api_key.as_str()),
                ("signature", signature.as_str()),
                ("signature_algorithm", "sha256"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Host {
                status: status.as_u16(),
                body,
            });
        }

        let DestroyResponse { result } = response.json().await?;
        match result.as_str() {
            "ok" => {
                tracing::info!(public_id, "media asset deleted");
                Ok(())
            }
            "not found" => Err(MediaError::NotFound(public_id.to_owned())),
            other => Err(MediaError::Rejected(other.to_owned())),
        }
    }
}

/// Hex SHA-256 over `k=v` pairs sorted by key, joined with `&`, followed by the secret.
pub fn sign(params: &[(&str, &str)], secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by_key(|(k, _)| *k);

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!("{:x}", Sha256::digest(format!("{}{}", joined, secret).as_bytes()))
}

/// Check a folder name or public id: path-like, no traversal, bounded length.
pub fn validate_asset_path(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if value.len() > MAX_ASSET_PATH_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_ASSET_PATH_LEN,
        });
    }

    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '/' | '.');
    if !value.chars().all(allowed)
        || value.starts_with('/')
        || value.split('/').any(|seg| seg.is_empty() || seg == "..")
    {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must be slash-separated segments of letters, digits, '_', '-' or '.'",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use axum::response::{IntoResponse, Response};
    use axum::routing::post;
    use axum::{Form, Json, Router};
    use reqwest::StatusCode;
    use serde_json::json;

    use crate::testing::spawn_upstream;

    fn host() -> CloudMediaHost {
        CloudMediaHost::new(MediaCredentials {
            cloud_name: "demo".into(),
            api_key: "key123".into(),
            api_secret: "secret".into(),
            default_folder: "portfolio".into(),
        })
        .unwrap()
    }

    #[test]
    fn signature_is_order_independent() {
        let a = sign(&[("timestamp", "100"), ("folder", "x")], "s");
        let b = sign(&[("folder", "x"), ("timestamp", "100")], "s");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_matches_known_digest() {
        // sha256("folder=x&timestamp=100s")
        let expected = format!("{:x}", Sha256::digest(b"folder=x&timestamp=100s"));
        assert_eq!(sign(&[("timestamp", "100"), ("folder", "x")], "s"), expected);
    }

    #[test]
    fn empty_params_are_not_signed() {
        assert_eq!(
            sign(&[("folder", ""), ("timestamp", "1")], "s"),
            sign(&[("timestamp", "1")], "s")
        );
    }

    #[test]
    fn upload_uses_default_folder() {
        let signed = host().sign_upload(None);
        let ts = signed.timestamp.to_string();
        assert_eq!(signed.folder, "portfolio");
        assert_eq!(signed.upload_url, "https://api.cloudinary.com/v1_1/demo/image/upload");
        assert_eq!(
            signed.signature,
            sign(
                &[("folder", "portfolio"), ("timestamp", ts.as_str())],
                "secret"
            )
        );
    }

    #[test]
    fn asset_paths() {
        assert!(validate_asset_path("public_id", "portfolio/hero-1").is_ok());
        assert!(validate_asset_path("public_id", "img.v2").is_ok());
        assert!(validate_asset_path("public_id", "../etc").is_err());
        assert!(validate_asset_path("public_id", "/abs").is_err());
        assert!(validate_asset_path("public_id", "a//b").is_err());
        assert!(validate_asset_path("public_id", "a b").is_err());
        assert!(validate_asset_path("public_id", "").is_err());
    }

    fn host_at(base: &str) -> CloudMediaHost {
        CloudMediaHost::with_api_base(
            MediaCredentials {
                cloud_name: "demo".into(),
                api_key: "key123".into(),
                api_secret: "secret".into(),
                default_folder: "portfolio".into(),
            },
            base,
        )
        .unwrap()
    }

    /// Answers like the real host, keyed on the asset id.
    async fn destroy_endpoint(Form(form): Form<HashMap<String, String>>) -> Response {
        let field = |k: &str| form.get(k).map(String::as_str).unwrap_or_default();
        let expected = sign(
            &[("public_id", field("public_id")), ("timestamp", field("timestamp"))],
            "secret",
        );
        if field("signature") != expected || field("api_key") != "key123" {
            return (StatusCode::UNAUTHORIZED, "bad signature").into_response();
        }
        let result = match field("public_id") {
            "portfolio/hero" => "ok",
            "portfolio/gone" => "not found",
            "portfolio/outage" => return StatusCode::BAD_GATEWAY.into_response(),
            _ => "error",
        };
        Json(json!({ "result": result })).into_response()
    }

    async fn upstream() -> CloudMediaHost {
        let router = Router::new().route("/demo/image/destroy", post(destroy_endpoint));
        host_at(&spawn_upstream(router).await)
    }

    #[tokio::test]
    async fn destroy_sends_signed_form() {
        assert!(upstream().await.destroy("portfolio/hero").await.is_ok());
    }

    #[tokio::test]
    async fn destroy_maps_host_results() {
        let host = upstream().await;

        let gone = host.destroy("portfolio/gone").await.unwrap_err();
        assert!(matches!(gone, MediaError::NotFound(id) if id == "portfolio/gone"));

        let refused = host.destroy("portfolio/locked").await.unwrap_err();
        assert!(matches!(refused, MediaError::Rejected(r) if r == "error"));

        let outage = host.destroy("portfolio/outage").await.unwrap_err();
        assert!(matches!(outage, MediaError::Host { status: 502, .. }));
    }
}
