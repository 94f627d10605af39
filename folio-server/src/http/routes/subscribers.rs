//! Newsletter subscription endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use serde::Deserialize;

use super::content::{admin_list_records, delete_record};
use super::enforce_rate_limit;
use crate::db::{ContentRepo, DbError};
use crate::http::error::ApiError;
use crate::http::extractors::ClientIp;
use crate::mail::{dispatch, Email};
use crate::models::{normalize_email, Content, Record, Subscriber};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

/// POST /api/subscribers
async fn subscribe(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
    Json(req): Json<EmailRequest>,
) -> Result<(StatusCode, Json<Record<Subscriber>>), ApiError> {
    enforce_rate_limit(&state, "subscribe", &ip)?;

    let subscriber = Subscriber::new(&req.email);
    subscriber.validate()?;

    let record = match ContentRepo::<Subscriber>::new(state.store.as_ref())
        .create(subscriber)
        .await
    {
        Ok(record) => record,
        Err(DbError::Conflict { .. }) => {
            return Err(ApiError::Conflict {
                message: "this email is already subscribed".into(),
            })
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(id = %record.id, "new subscriber");

    dispatch(
        state.mailer.clone(),
        Email {
            to: record.content.email.clone(),
            subject: "Welcome aboard".into(),
            text: "Thanks for subscribing! You'll hear from me when there's something new.\n\n\
                   You can unsubscribe at any time."
                .into(),
            reply_to: state.site_owner_email.clone(),
        },
    );

    Ok((StatusCode::CREATED, Json(record)))
}

/// POST /api/subscribers/unsubscribe - 204 whether or not the email was known
async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
    Json(req): Json<EmailRequest>,
) -> Result<StatusCode, ApiError> {
    enforce_rate_limit(&state, "unsubscribe", &ip)?;

    let email = normalize_email(&req.email);
    let repo = ContentRepo::<Subscriber>::new(state.store.as_ref());
    if let Some(record) = repo.find_one("email", &email).await? {
        match repo.delete(record.id).await {
            Ok(()) | Err(DbError::NotFound { .. }) => {}
            Err(e) => return Err(e.into()),
        }
        tracing::info!(id = %record.id, "subscriber removed");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Subscriber routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/subscribers",
            post(subscribe).get(admin_list_records::<Subscriber>),
        )
        .route("/api/subscribers/unsubscribe", post(unsubscribe))
        .route("/api/subscribers/{id}", delete(delete_record::<Subscriber>))
}
