//! Cache revalidation.
//!
//! Called by the commerce backend (or an operator) after regions or catalog
//! data change. Requires `x-revalidate-secret` to match
//! `STOREFRONT_REVALIDATE_SECRET`; when no secret is configured the endpoint
//! rejects every request.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
};
use secrecy::ExposeSecret;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::state::AppState;

pub const REVALIDATE_SECRET_HEADER: &str = "x-revalidate-secret";

/// Drop cached regions and catalog data.
pub async fn revalidate(State(state): State<AppState>, headers: HeaderMap) -> Result<StatusCode> {
    let Some(expected) = state.config().revalidate_secret.as_ref() else {
        warn!("Revalidation requested but no secret is configured");
        return Err(AppError::Unauthorized("revalidation disabled".to_string()));
    };

    let provided = headers
        .get(REVALIDATE_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !constant_time_eq(provided.as_bytes(), expected.expose_secret().as_bytes()) {
        warn!("Revalidation rejected: bad secret");
        return Err(AppError::Unauthorized("invalid secret".to_string()));
    }

    state.regions().invalidate().await;
    state.catalog().invalidate().await;
    info!("Region and catalog caches revalidated");

    Ok(StatusCode::NO_CONTENT)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
