//! Region route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use harbor_core::CountryCode;

use crate::backend::Region;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// List every region the backend knows.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Region>>> {
    let regions = state.regions().list_regions().await?;
    Ok(Json(regions))
}

/// Resolve the region serving a country.
pub async fn show(
    State(state): State<AppState>,
    Path(country_code): Path<String>,
) -> Result<Json<Region>> {
    let country = CountryCode::parse(&country_code)?;
    state
        .regions()
        .get_region(&country)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no region serves country {country}")))
}
