//! Route handlers organized by resource

pub mod health;
pub mod content;
pub mod blogs;
pub mod contact;
pub mod subscribers;
pub mod settings;
pub mod media;
pub mod session;

use std::sync::Arc;

use axum::Router;

use crate::http::error::ApiError;
use crate::models::{About, Blog, Footer, Hero, NavItem, Quote, Service, Testimonial, WallItem};
use crate::rate_limit::RateDecision;
use crate::state::AppState;

use content::{collection_router, singleton_router};

/// Every `/api` route plus the health checks.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::router())
        .merge(singleton_router::<Hero>("/api/hero"))
        .merge(singleton_router::<About>("/api/about"))
        .merge(singleton_router::<Footer>("/api/footer"))
        .merge(collection_router::<Service>("/api/services"))
        .merge(collection_router::<Blog>("/api/blogs"))
        .merge(blogs::router())
        .merge(collection_router::<Quote>("/api/quotes"))
        .merge(collection_router::<Testimonial>("/api/testimonials"))
        .merge(collection_router::<WallItem>("/api/wall"))
        .merge(collection_router::<NavItem>("/api/navigation"))
        .merge(contact::router())
        .merge(subscribers::router())
        .merge(settings::router())
        .merge(media::router())
        .merge(session::router())
}

/// Count a public write against the caller's window for `action`.
pub(crate) fn enforce_rate_limit(state: &AppState, action: &str, ip: &str) -> Result<(), ApiError> {
    match state.limiter.check(action, ip) {
        RateDecision::Allowed { .. } => Ok(()),
        RateDecision::Limited { retry_after } => {
            tracing::warn!(action, ip, "rate limit exceeded");
            Err(ApiError::RateLimited { retry_after })
        }
    }
}
