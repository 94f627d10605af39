//! Maintenance-mode gate for page requests

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};

use super::extractors::verified_admin;
use crate::auth::{bearer_token, session_token};
use crate::state::AppState;

/// Seconds clients are told to wait while the site is down
pub const RETRY_AFTER_SECS: u32 = 300;

const PLACEHOLDER_FILE: &str = "maintenance.html";

const FALLBACK_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Down for maintenance</title></head>
<body style="font-family: sans-serif; text-align: center; padding: 4rem;">
<h1>We'll be back soon</h1>
<p>The site is undergoing scheduled maintenance. Please check back shortly.</p>
</body>
</html>
"#;

/// Serve the placeholder page instead of site pages while maintenance is on.
pub async fn maintenance_gate(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if is_exempt(request.uri().path()) || !state.maintenance.is_enabled().await {
        return next.run(request).await;
    }

    let token = bearer_token(request.headers())
        .or_else(|| session_token(request.headers()))
        .map(str::to_owned);
    if let Some(token) = token {
        if verified_admin(&state, &token).await.is_some() {
            return next.run(request).await;
        }
    }

    tracing::debug!(path = %request.uri().path(), "maintenance mode: serving placeholder");
    placeholder(&state).await
}

/// Paths that stay reachable during maintenance.
pub fn is_exempt(path: &str) -> bool {
    const PREFIXES: &[&str] = &["/api/", "/admin", "/_next/", "/assets/", "/static/"];

    if path == "/api" || path == "/health" || path == "/maintenance.html" {
        return true;
    }
    if PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return true;
    }

    // Static files: last segment has an extension
    path.rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .is_some_and(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
}

async fn placeholder(state: &AppState) -> Response {
    let page = match &state.static_dir {
        Some(dir) => match tokio::fs::read_to_string(dir.join(PLACEHOLDER_FILE)).await {
            Ok(page) => page,
            Err(e) => {
                tracing::debug!(error = %e, "no custom maintenance page, using built-in");
                FALLBACK_PAGE.to_owned()
            }
        },
        None => FALLBACK_PAGE.to_owned(),
    };

    let mut response = (StatusCode::SERVICE_UNAVAILABLE, Html(page)).into_response();
    let headers = response.headers_mut();
    headers.insert(header::RETRY_AFTER, HeaderValue::from(RETRY_AFTER_SECS));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_and_admin_are_exempt() {
        assert!(is_exempt("/api/blogs"));
        assert!(is_exempt("/api"));
        assert!(is_exempt("/health"));
        assert!(is_exempt("/admin"));
        assert!(is_exempt("/admin/posts/new"));
        assert!(is_exempt("/maintenance.html"));
    }

    #[test]
    fn assets_are_exempt() {
        assert!(is_exempt("/_next/static/chunk.js"));
        assert!(is_exempt("/assets/logo"));
        assert!(is_exempt("/favicon.ico"));
        assert!(is_exempt("/images/hero.webp"));
    }

    #[test]
    fn pages_are_gated() {
        assert!(!is_exempt("/"));
        assert!(!is_exempt("/blog"));
        assert!(!is_exempt("/blog/my-first-post"));
        assert!(!is_exempt("/apiary"));
        assert!(!is_exempt("/.well-known/x"));
    }
}
