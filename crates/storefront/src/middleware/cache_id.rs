//! Per-browser cache namespace.
//!
//! Every browser carries a `_harbor_cache_id` cookie. The middleware issues
//! one on first contact and records it on the request span so log lines from
//! the same browser can be grouped.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::Span;

use crate::cookies;
use crate::state::AppState;

/// Ensure the cache ID cookie exists and record it on the span.
pub async fn cache_id_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let (jar, cache_id) = cookies::cache_id(jar, state.cookie_settings());
    Span::current().record("cache_id", cache_id.as_str());

    let response = next.run(request).await;
    (jar, response).into_response()
}
