//! Media upload signing and deletion

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::extractors::AdminUser;
use crate::media::{validate_asset_path, MediaHost, SignedUpload};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SignatureRequest {
    #[serde(default)]
    pub folder: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub public_id: String,
}

fn host(state: &AppState) -> Result<&dyn MediaHost, ApiError> {
    state.media.as_deref().ok_or_else(|| ApiError::Unavailable {
        message: "media host is not configured".into(),
    })
}

/// POST /api/media/signature
async fn sign_upload(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(req): Json<SignatureRequest>,
) -> Result<Json<SignedUpload>, ApiError> {
    let host = host(&state)?;
    let folder = req.folder.as_deref().map(str::trim).filter(|f| !f.is_empty());
    if let Some(folder) = folder {
        validate_asset_path("folder", folder)?;
    }

    Ok(Json(host.sign_upload(folder)))
}

/// DELETE /api/media
async fn destroy(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(req): Json<DeleteRequest>,
) -> Result<StatusCode, ApiError> {
    let host = host(&state)?;
    let public_id = req.public_id.trim();
    validate_asset_path("public_id", public_id)?;

    host.destroy(public_id).await?;
    tracing::info!(public_id, admin = %admin.uid, "media asset removed");

    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/media/signature", post(sign_upload))
        .route("/api/media", delete(destroy))
}
