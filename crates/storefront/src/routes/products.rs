//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::cookie::CookieJar;
use harbor_core::{CountryCode, PageRequest, SortOption};
use serde::Deserialize;

use crate::backend::Product;
use crate::cookies;
use crate::error::{AppError, Result};
use crate::products::{ProductFilters, ProductListQuery, ProductPage, RegionSelector};
use crate::state::AppState;

/// Listing query parameters.
///
/// `collection_id` and `category_id` accept comma-separated lists.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub collection_id: Option<String>,
    pub category_id: Option<String>,
    pub locale: Option<String>,
    pub q: Option<String>,
}

impl ListingParams {
    /// Page request with defaults applied; `limit` is capped rather than rejected.
    fn page_request(&self) -> Result<PageRequest> {
        let defaults = PageRequest::default();
        let page = self.page.unwrap_or(defaults.page());
        let limit = self
            .limit
            .unwrap_or(defaults.limit())
            .min(PageRequest::MAX_LIMIT);
        Ok(PageRequest::new(page, limit)?)
    }

    fn sort(&self) -> Result<SortOption> {
        match self.sort.as_deref().map(str::trim) {
            None | Some("") => Ok(SortOption::default()),
            Some(value) => Ok(value.parse()?),
        }
    }
}

/// Detail query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct DetailParams {
    pub locale: Option<String>,
}

/// List one sorted page of products for a country.
pub async fn index(
    State(state): State<AppState>,
    Path(country_code): Path<String>,
    Query(params): Query<ListingParams>,
    jar: CookieJar,
) -> Result<Json<ProductPage>> {
    let country = CountryCode::parse(&country_code)?;
    let sort = params.sort()?;

    let query = ProductListQuery {
        page: params.page_request()?,
        region: RegionSelector::Country(country),
        locale: params.locale,
        fields: None,
        filters: ProductFilters {
            collection_ids: split_list(params.collection_id.as_deref()),
            category_ids: split_list(params.category_id.as_deref()),
            q: params.q,
            ..ProductFilters::default()
        },
    };

    let auth = cookies::auth_token(&jar);
    let page = state
        .products()
        .list_products_with_sort(&query, sort, auth.as_ref())
        .await?;
    Ok(Json(page))
}

/// Show one product, priced for the country's region.
pub async fn show(
    State(state): State<AppState>,
    Path((country_code, handle)): Path<(String, String)>,
    Query(params): Query<DetailParams>,
    jar: CookieJar,
) -> Result<Json<Product>> {
    let country = CountryCode::parse(&country_code)?;
    let auth = cookies::auth_token(&jar);

    state
        .products()
        .retrieve_product_by_handle(
            &handle,
            RegionSelector::Country(country),
            params.locale,
            auth.as_ref(),
        )
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {handle}")))
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_drops_blanks() {
        assert_eq!(
            split_list(Some("pcol_1, ,pcol_2,")),
            vec!["pcol_1".to_string(), "pcol_2".to_string()]
        );
        assert!(split_list(Some("  ")).is_empty());
        assert!(split_list(None).is_empty());
    }

    #[test]
    fn test_page_request_defaults() {
        let page = ListingParams::default().page_request().unwrap();
        assert_eq!(page.page(), 1);
        assert_eq!(page.limit(), 12);
    }

    #[test]
    fn test_limit_is_capped() {
        let params = ListingParams {
            limit: Some(500),
            ..ListingParams::default()
        };
        assert_eq!(params.page_request().unwrap().limit(), PageRequest::MAX_LIMIT);
    }

    #[test]
    fn test_zero_page_is_rejected() {
        let params = ListingParams {
            page: Some(0),
            ..ListingParams::default()
        };
        assert!(matches!(params.page_request(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!(ListingParams::default().sort().unwrap(), SortOption::PriceAsc);

        let params = ListingParams {
            sort: Some("created_at".to_string()),
            ..ListingParams::default()
        };
        assert_eq!(params.sort().unwrap(), SortOption::CreatedAt);

        let params = ListingParams {
            sort: Some("popularity".to_string()),
            ..ListingParams::default()
        };
        assert!(matches!(params.sort(), Err(AppError::BadRequest(_))));
    }
}
