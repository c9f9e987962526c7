//! Collection and category route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use harbor_core::PageRequest;
use serde::Deserialize;

use crate::backend::{Category, Collection};
use crate::catalog::CatalogPage;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Page size for collection and category listings.
const CATALOG_PAGE_SIZE: u32 = 20;

/// Pagination query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
}

impl PaginationQuery {
    fn page_request(&self) -> Result<PageRequest> {
        Ok(PageRequest::new(self.page.unwrap_or(1), CATALOG_PAGE_SIZE)?)
    }
}

/// List collections.
pub async fn collections(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<CatalogPage<Collection>>> {
    let page = state
        .catalog()
        .list_collections(query.page_request()?)
        .await?;
    Ok(Json(page))
}

/// Show one collection.
pub async fn collection(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Collection>> {
    state
        .catalog()
        .get_collection_by_handle(&handle)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("collection {handle}")))
}

/// List top-level categories.
pub async fn categories(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<CatalogPage<Category>>> {
    let page = state
        .catalog()
        .list_categories(query.page_request()?)
        .await?;
    Ok(Json(page))
}

/// Show one category by its (possibly nested) handle path.
pub async fn category(
    State(state): State<AppState>,
    Path(handle_path): Path<String>,
) -> Result<Json<Category>> {
    state
        .catalog()
        .get_category_by_handle(&handle_path)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("category {handle_path}")))
}
