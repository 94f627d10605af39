//! Blog lookups beyond the generic collection routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::db::ContentRepo;
use crate::http::error::ApiError;
use crate::http::extractors::MaybeAdmin;
use crate::models::{Blog, Content, Record, Slug};
use crate::state::AppState;

/// GET /api/blogs/slug/{slug}
async fn get_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    viewer: MaybeAdmin,
) -> Result<Json<Record<Blog>>, ApiError> {
    let slug = Slug::parse(&slug)?;
    let not_found = || ApiError::NotFound {
        resource: Blog::RESOURCE,
        id: slug.to_string(),
    };

    let post = ContentRepo::<Blog>::new(state.store.as_ref())
        .find_one("slug", slug.as_str())
        .await?
        .ok_or_else(not_found)?;

    if !post.content.is_public() && !viewer.is_admin() {
        return Err(not_found());
    }
    Ok(Json(post))
}

/// Blog routes not covered by the collection router
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/blogs/slug/{slug}", get(get_by_slug))
}
