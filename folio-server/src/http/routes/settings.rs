//! Maintenance flag endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::AdminUser;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct MaintenanceStatus {
    pub maintenance_mode: bool,
}

/// GET /api/settings/maintenance
async fn get_maintenance(State(state): State<Arc<AppState>>) -> Json<MaintenanceStatus> {
    Json(MaintenanceStatus {
        maintenance_mode: state.maintenance.is_enabled().await,
    })
}

/// PUT /api/settings/maintenance
async fn set_maintenance(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(req): Json<MaintenanceStatus>,
) -> Result<Json<MaintenanceStatus>, ApiError> {
    let settings = state.maintenance.set(req.maintenance_mode).await?;
    tracing::info!(
        maintenance_mode = settings.maintenance_mode,
        admin = %admin.uid,
        "maintenance mode changed"
    );

    Ok(Json(MaintenanceStatus {
        maintenance_mode: settings.maintenance_mode,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/settings/maintenance",
        get(get_maintenance).put(set_maintenance),
    )
}
