//! Generic handlers shared by every content collection
//!
//! A collection router mounts list/get/create/replace/patch/delete for one
//! `Content` type; a singleton router mounts get/put for a one-document
//! collection such as the hero section.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value as JsonValue;

use crate::db::ContentRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{AdminUser, MaybeAdmin, ValidId};
use crate::models::{
    merge_patch, strip_envelope, Content, Paginated, Pagination, PaginationParams, Record,
};
use crate::state::AppState;

/// Decode, normalize and validate a request body as `T`.
pub(crate) fn parse_body<T: Content>(mut body: JsonValue) -> Result<T, ApiError> {
    strip_envelope(&mut body);
    let mut content: T = serde_json::from_value(body).map_err(|e| ApiError::BadRequest {
        message: format!("invalid {} body: {}", T::RESOURCE, e),
    })?;
    content.normalize();
    content.validate()?;
    Ok(content)
}

fn hidden<T: Content>(record: &Record<T>) -> ApiError {
    ApiError::NotFound {
        resource: T::RESOURCE,
        id: record.id.to_string(),
    }
}

/// GET /api/<path> - public list, admins also see hidden records
pub(crate) async fn list_records<T: Content>(
    State(state): State<Arc<AppState>>,
    viewer: MaybeAdmin,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Record<T>>>, ApiError> {
    let records = ContentRepo::<T>::new(state.store.as_ref()).list().await?;
    let admin = viewer.is_admin();
    let visible: Vec<_> = records
        .into_iter()
        .filter(|r| admin || r.content.is_public())
        .collect();

    Ok(Json(Pagination::from(params).slice(visible)))
}

/// GET /api/<path>/{id}
pub(crate) async fn get_record<T: Content>(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    viewer: MaybeAdmin,
) -> Result<Json<Record<T>>, ApiError> {
    let record = ContentRepo::<T>::new(state.store.as_ref()).get(id).await?;
    if !record.content.is_public() && !viewer.is_admin() {
        return Err(hidden(&record));
    }
    Ok(Json(record))
}

/// GET for admin-only collections (enquiries, subscribers)
pub(crate) async fn admin_list_records<T: Content>(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Record<T>>>, ApiError> {
    let records = ContentRepo::<T>::new(state.store.as_ref()).list().await?;
    Ok(Json(Pagination::from(params).slice(records)))
}

pub(crate) async fn admin_get_record<T: Content>(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ValidId(id): ValidId,
) -> Result<Json<Record<T>>, ApiError> {
    let record = ContentRepo::<T>::new(state.store.as_ref()).get(id).await?;
    Ok(Json(record))
}

/// POST /api/<path>
pub(crate) async fn create_record<T: Content>(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(body): Json<JsonValue>,
) -> Result<(StatusCode, Json<Record<T>>), ApiError> {
    let content = parse_body::<T>(body)?;
    let record = ContentRepo::<T>::new(state.store.as_ref()).create(content).await?;
    tracing::info!(resource = T::RESOURCE, id = %record.id, admin = %admin.uid, "created");

    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/<path>/{id} - full replace
pub(crate) async fn replace_record<T: Content>(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    ValidId(id): ValidId,
    Json(body): Json<JsonValue>,
) -> Result<Json<Record<T>>, ApiError> {
    let content = parse_body::<T>(body)?;
    let record = ContentRepo::<T>::new(state.store.as_ref())
        .replace(id, content)
        .await?;
    tracing::info!(resource = T::RESOURCE, %id, admin = %admin.uid, "replaced");

    Ok(Json(record))
}

/// PATCH /api/<path>/{id} - merge patch, then revalidate the whole document
pub(crate) async fn patch_record<T: Content>(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    ValidId(id): ValidId,
    Json(mut patch): Json<JsonValue>,
) -> Result<Json<Record<T>>, ApiError> {
    if !patch.is_object() {
        return Err(ApiError::BadRequest {
            message: "patch body must be a JSON object".into(),
        });
    }

    let repo = ContentRepo::<T>::new(state.store.as_ref());
    let existing = repo.get(id).await?;

    let mut data = serde_json::to_value(&existing.content).map_err(|e| ApiError::Internal {
        message: format!("encode {} '{}': {}", T::RESOURCE, id, e),
    })?;
    strip_envelope(&mut patch);
    merge_patch(&mut data, &patch);

    let content = parse_body::<T>(data)?;
    let record = repo.replace(id, content).await?;
    tracing::info!(resource = T::RESOURCE, %id, admin = %admin.uid, "patched");

    Ok(Json(record))
}

/// DELETE /api/<path>/{id}
pub(crate) async fn delete_record<T: Content>(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    ContentRepo::<T>::new(state.store.as_ref()).delete(id).await?;
    tracing::info!(resource = T::RESOURCE, %id, admin = %admin.uid, "deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/<singleton> - 404 until first written
async fn get_singleton<T: Content>(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Record<T>>, ApiError> {
    ContentRepo::<T>::new(state.store.as_ref())
        .get_singleton()
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound {
            resource: T::RESOURCE,
            id: T::COLLECTION.to_string(),
        })
}

/// PUT /api/<singleton> - create or overwrite
async fn put_singleton<T: Content>(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(body): Json<JsonValue>,
) -> Result<Json<Record<T>>, ApiError> {
    let content = parse_body::<T>(body)?;
    let record = ContentRepo::<T>::new(state.store.as_ref())
        .put_singleton(content)
        .await?;
    tracing::info!(resource = T::RESOURCE, admin = %admin.uid, "singleton updated");

    Ok(Json(record))
}

/// Full CRUD for a multi-document collection mounted at `path`.
pub fn collection_router<T: Content>(path: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(path, get(list_records::<T>).post(create_record::<T>))
        .route(
            &format!("{}/{{id}}", path),
            get(get_record::<T>)
                .put(replace_record::<T>)
                .patch(patch_record::<T>)
                .delete(delete_record::<T>),
        )
}

/// Read/overwrite routes for a one-document collection mounted at `path`.
pub fn singleton_router<T: Content>(path: &str) -> Router<Arc<AppState>> {
    Router::new().route(path, get(get_singleton::<T>).put(put_singleton::<T>))
}
