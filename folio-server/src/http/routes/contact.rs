//! Contact form endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::content::{admin_get_record, admin_list_records, delete_record, parse_body};
use super::enforce_rate_limit;
use crate::db::ContentRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{AdminUser, ClientIp, ValidId};
use crate::mail::{dispatch, Email};
use crate::models::{Enquiry, Record};
use crate::state::AppState;

const THANKS: &str = "Thanks for getting in touch! I'll get back to you soon.";

/// Response to a submitted enquiry
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub id: Uuid,
    pub message: &'static str,
}

/// PATCH body for admin triage
#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub read: bool,
}

/// POST /api/contact
async fn submit(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
    Json(body): Json<JsonValue>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    enforce_rate_limit(&state, "contact", &ip)?;

    let mut enquiry = parse_body::<Enquiry>(body)?;
    enquiry.read = false;

    let record = ContentRepo::<Enquiry>::new(state.store.as_ref())
        .create(enquiry)
        .await?;
    tracing::info!(id = %record.id, %ip, "contact enquiry received");

    notify(&state, &record);

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            id: record.id,
            message: THANKS,
        }),
    ))
}

/// Owner notification plus sender acknowledgement, both fire-and-forget.
fn notify(state: &AppState, record: &Record<Enquiry>) {
    let enquiry = &record.content;
    let subject = enquiry.subject.as_deref().unwrap_or("(no subject)");

    match &state.site_owner_email {
        Some(owner) => dispatch(
            state.mailer.clone(),
            Email {
                to: owner.clone(),
                subject: format!("New enquiry from {}: {}", enquiry.name, subject),
                text: format!(
                    "From: {} <{}>\nSubject: {}\n\n{}\n\nEnquiry id: {}",
                    enquiry.name, enquiry.email, subject, enquiry.message, record.id
                ),
                reply_to: Some(enquiry.email.clone()),
            },
        ),
        None => tracing::warn!(id = %record.id, "SITE_OWNER_EMAIL not set, skipping owner notification"),
    }

    dispatch(
        state.mailer.clone(),
        Email {
            to: enquiry.email.clone(),
            subject: "Thanks for your message".into(),
            text: format!(
                "Hi {},\n\nThanks for reaching out. Your message has been received and I'll reply as soon as I can.\n\nYour message:\n{}",
                enquiry.name, enquiry.message
            ),
            reply_to: state.site_owner_email.clone(),
        },
    );
}

/// PATCH /api/contact/{id}
async fn mark_read(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ValidId(id): ValidId,
    Json(req): Json<MarkReadRequest>,
) -> Result<Json<Record<Enquiry>>, ApiError> {
    let repo = ContentRepo::<Enquiry>::new(state.store.as_ref());
    let mut enquiry = repo.get(id).await?.content;
    enquiry.read = req.read;

    Ok(Json(repo.replace(id, enquiry).await?))
}

/// Contact routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/contact",
            post(submit).get(admin_list_records::<Enquiry>),
        )
        .route(
            "/api/contact/{id}",
            get(admin_get_record::<Enquiry>)
                .patch(mark_read)
                .delete(delete_record::<Enquiry>),
        )
}
