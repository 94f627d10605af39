//! Admin session introspection

use std::sync::Arc;

use axum::{routing::get, Json, Router};

use crate::auth::Claims;
use crate::http::extractors::AdminUser;
use crate::state::AppState;

/// GET /api/admin/session - claims of the calling admin
async fn session(AdminUser(claims): AdminUser) -> Json<Claims> {
    Json(claims)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/admin/session", get(session))
}
