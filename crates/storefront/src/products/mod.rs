//! Region-aware product listing.
//!
//! Two entry points:
//! - [`ProductLister::list_products`] - one backend page, backend order
//! - [`ProductLister::list_products_with_sort`] - storefront-side ordering by
//!   computed price or creation time, paginated in memory (see [`sorted`])

pub mod sorted;

use harbor_core::{CountryCode, PageRequest, RegionId};
use serde::Serialize;
use tracing::instrument;

use crate::backend::{AuthToken, BackendClient, BackendError, Product, ProductList, Query};
use crate::config::CacheConfig;
use crate::regions::RegionResolver;

pub use sorted::sort_products;

/// Fields requested for every listed product unless overridden.
pub const DEFAULT_PRODUCT_FIELDS: &str =
    "*variants.calculated_price,+variants.inventory_quantity,*variants.images,+metadata,+tags";

/// Field selection appended when a locale is requested.
pub const TRANSLATION_FIELDS: &str = "*translations";

/// Which region prices and availability are computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionSelector {
    /// Resolve the region through its country.
    Country(CountryCode),
    /// Use a region ID directly.
    Region(RegionId),
}

/// Pass-through listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilters {
    pub collection_ids: Vec<String>,
    pub category_ids: Vec<String>,
    pub ids: Vec<String>,
    pub handle: Option<String>,
    /// Free-text search.
    pub q: Option<String>,
}

/// A product listing request.
#[derive(Debug, Clone)]
pub struct ProductListQuery {
    pub page: PageRequest,
    pub region: RegionSelector,
    /// Locale whose translations should replace the default copy.
    pub locale: Option<String>,
    /// Override of [`DEFAULT_PRODUCT_FIELDS`].
    pub fields: Option<String>,
    pub filters: ProductFilters,
}

impl ProductListQuery {
    /// First page with default size for a country.
    #[must_use]
    pub fn for_country(country: CountryCode) -> Self {
        Self {
            page: PageRequest::default(),
            region: RegionSelector::Country(country),
            locale: None,
            fields: None,
            filters: ProductFilters::default(),
        }
    }

    fn locale(&self) -> Option<&str> {
        self.locale.as_deref().filter(|l| !l.trim().is_empty())
    }
}

/// One page of products.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Total number of matching records the page was cut from.
    pub count: u64,
    /// Current 1-based page.
    pub page: u32,
    /// Following page, when `count` extends past this one.
    pub next_page: Option<u32>,
}

/// Lists products for a region.
///
/// Cheaply cloneable.
#[derive(Clone)]
pub struct ProductLister {
    backend: BackendClient,
    regions: RegionResolver,
    sort_fetch_limit: u32,
    sort_max_records: u32,
}

impl ProductLister {
    #[must_use]
    pub fn new(backend: BackendClient, regions: RegionResolver, cache: &CacheConfig) -> Self {
        Self {
            backend,
            regions,
            sort_fetch_limit: cache.sort_fetch_limit,
            sort_max_records: cache.sort_max_records,
        }
    }

    /// List one page of products in backend order.
    ///
    /// Issues a single backend call with `offset = (page - 1) * limit`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` when a country selector resolves to
    /// no region, or any error from the backend request.
    #[instrument(
        skip(self, query, auth),
        fields(page = query.page.page(), limit = query.page.limit())
    )]
    pub async fn list_products(
        &self,
        query: &ProductListQuery,
        auth: Option<&AuthToken>,
    ) -> Result<ProductPage, BackendError> {
        let region_id = self.resolve_region_id(&query.region).await?;
        let list = self
            .fetch_batch(
                &region_id,
                query,
                u64::from(query.page.limit()),
                query.page.offset(),
                auth,
            )
            .await?;

        Ok(ProductPage {
            products: localize(list.products, query.locale()),
            count: list.count,
            page: query.page.page(),
            next_page: query.page.next_page(list.count),
        })
    }

    /// Retrieve one product by handle, priced for the selected region.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_products`].
    #[instrument(skip(self, region, auth), fields(handle = %handle))]
    pub async fn retrieve_product_by_handle(
        &self,
        handle: &str,
        region: RegionSelector,
        locale: Option<String>,
        auth: Option<&AuthToken>,
    ) -> Result<Option<Product>, BackendError> {
        let query = ProductListQuery {
            page: PageRequest::new(1, 1).unwrap_or_default(),
            region,
            locale,
            fields: None,
            filters: ProductFilters {
                handle: Some(handle.to_string()),
                ..ProductFilters::default()
            },
        };

        let page = self.list_products(&query, auth).await?;
        Ok(page.products.into_iter().find(|p| p.handle == handle))
    }

    async fn resolve_region_id(&self, selector: &RegionSelector) -> Result<RegionId, BackendError> {
        match selector {
            RegionSelector::Region(id) => Ok(id.clone()),
            RegionSelector::Country(country) => self
                .regions
                .get_region(country)
                .await?
                .map(|region| region.id)
                .ok_or_else(|| BackendError::NotFound(format!("region for country {country}"))),
        }
    }

    async fn fetch_batch(
        &self,
        region_id: &RegionId,
        query: &ProductListQuery,
        limit: u64,
        offset: u64,
        auth: Option<&AuthToken>,
    ) -> Result<ProductList, BackendError> {
        let backend_query = backend_query(region_id, query, limit, offset);
        self.backend
            .get(&["store", "products"], &backend_query, auth)
            .await
    }
}

/// Field selection string for a listing.
#[must_use]
pub fn field_selection(fields: Option<&str>, locale: Option<&str>) -> String {
    let base = fields
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_PRODUCT_FIELDS);

    match locale.map(str::trim).filter(|l| !l.is_empty()) {
        Some(_) => format!("{base},{TRANSLATION_FIELDS}"),
        None => base.to_string(),
    }
}

/// Build the backend query for one batch of a listing.
#[must_use]
pub fn backend_query(
    region_id: &RegionId,
    query: &ProductListQuery,
    limit: u64,
    offset: u64,
) -> Query {
    let locale = query.locale();
    Query::new()
        .param("limit", limit)
        .param("offset", offset)
        .param("region_id", region_id)
        .param("fields", field_selection(query.fields.as_deref(), locale))
        .opt_param("locale", locale)
        .array("collection_id", &query.filters.collection_ids)
        .array("category_id", &query.filters.category_ids)
        .array("id", &query.filters.ids)
        .opt_param("handle", query.filters.handle.as_deref())
        .opt_param("q", query.filters.q.as_deref())
}

fn localize(mut products: Vec<Product>, locale: Option<&str>) -> Vec<Product> {
    if let Some(locale) = locale {
        for product in &mut products {
            product.apply_translation(locale);
        }
    }
    products
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn query() -> ProductListQuery {
        ProductListQuery {
            page: PageRequest::new(3, 12).unwrap(),
            region: RegionSelector::Region(RegionId::new("reg_1")),
            locale: None,
            fields: None,
            filters: ProductFilters::default(),
        }
    }

    #[test]
    fn test_field_selection_default() {
        assert_eq!(field_selection(None, None), DEFAULT_PRODUCT_FIELDS);
        assert_eq!(field_selection(Some("  "), Some("")), DEFAULT_PRODUCT_FIELDS);
    }

    #[test]
    fn test_field_selection_adds_translations_for_locale() {
        assert_eq!(
            field_selection(Some("id,title"), Some("de-DE")),
            "id,title,*translations"
        );
    }

    #[test]
    fn test_backend_query_offset_and_region() {
        let q = backend_query(&RegionId::new("reg_1"), &query(), 12, 24);
        assert_eq!(q.get("limit"), Some("12"));
        assert_eq!(q.get("offset"), Some("24"));
        assert_eq!(q.get("region_id"), Some("reg_1"));
        assert_eq!(q.get("fields"), Some(DEFAULT_PRODUCT_FIELDS));
        assert_eq!(q.get("locale"), None);
    }

    #[test]
    fn test_backend_query_strips_blank_filters() {
        let mut listing = query();
        listing.filters.collection_ids = vec![String::new(), "col_1".to_string()];
        listing.filters.category_ids = vec!["  ".to_string()];
        listing.filters.handle = Some(String::new());

        let q = backend_query(&RegionId::new("reg_1"), &listing, 12, 0);
        assert_eq!(q.get("collection_id[]"), Some("col_1"));
        assert_eq!(q.get("category_id[]"), None);
        assert_eq!(q.get("handle"), None);
    }
}
