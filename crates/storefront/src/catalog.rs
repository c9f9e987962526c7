//! Collections and product categories.
//!
//! Both are read-mostly merchandising data, cached with `moka` for
//! `CATALOG_CACHE_TTL_SECS`.

use std::sync::Arc;
use std::time::Duration;

use harbor_core::PageRequest;
use moka::future::Cache;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::backend::{
    BackendClient, BackendError, Category, CategoryList, Collection, CollectionList, Query,
};

/// Cache key for catalog lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Collections(PageRequest),
    Collection(String),
    Categories(PageRequest),
    Category(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Collections(CatalogPage<Collection>),
    Collection(Option<Collection>),
    Categories(CatalogPage<Category>),
    Category(Option<Category>),
}

/// One page of collections or categories.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogPage<T> {
    pub items: Vec<T>,
    pub count: u64,
    pub page: u32,
    pub next_page: Option<u32>,
}

/// Client for collections and categories.
///
/// Cheaply cloneable; clones share the cache.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    backend: BackendClient,
    cache: Cache<CacheKey, CacheValue>,
}

impl Catalog {
    #[must_use]
    pub fn new(backend: BackendClient, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(ttl)
            .build();

        Self {
            inner: Arc::new(CatalogInner { backend, cache }),
        }
    }

    /// List collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self), fields(page = page.page()))]
    pub async fn list_collections(
        &self,
        page: PageRequest,
    ) -> Result<CatalogPage<Collection>, BackendError> {
        let key = CacheKey::Collections(page);
        if let Some(CacheValue::Collections(cached)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for collections");
            return Ok(cached);
        }

        let list: CollectionList = self
            .inner
            .backend
            .get(&["store", "collections"], &page_query(page), None)
            .await?;

        let result = catalog_page(list.collections, list.count, page);
        self.inner
            .cache
            .insert(key, CacheValue::Collections(result.clone()))
            .await;
        Ok(result)
    }

    /// Get a collection by its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_collection_by_handle(
        &self,
        handle: &str,
    ) -> Result<Option<Collection>, BackendError> {
        let key = CacheKey::Collection(handle.to_string());
        if let Some(CacheValue::Collection(cached)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for collection");
            return Ok(cached);
        }

        let query = Query::new().param("handle", handle).param("limit", 1);
        let list: CollectionList = self
            .inner
            .backend
            .get(&["store", "collections"], &query, None)
            .await?;

        let collection = list.collections.into_iter().find(|c| c.handle == handle);
        self.inner
            .cache
            .insert(key, CacheValue::Collection(collection.clone()))
            .await;
        Ok(collection)
    }

    /// List top-level categories with their children.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self), fields(page = page.page()))]
    pub async fn list_categories(
        &self,
        page: PageRequest,
    ) -> Result<CatalogPage<Category>, BackendError> {
        let key = CacheKey::Categories(page);
        if let Some(CacheValue::Categories(cached)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for categories");
            return Ok(cached);
        }

        let query = page_query(page)
            .param("parent_category_id", "null")
            .param("fields", "*category_children");
        let list: CategoryList = self
            .inner
            .backend
            .get(&["store", "product-categories"], &query, None)
            .await?;

        let result = catalog_page(list.product_categories, list.count, page);
        self.inner
            .cache
            .insert(key, CacheValue::Categories(result.clone()))
            .await;
        Ok(result)
    }

    /// Get a category by its handle path.
    ///
    /// Nested category URLs carry the whole path (`tops/shirts`); the last
    /// segment is the category's own handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    #[instrument(skip(self), fields(handle_path = %handle_path))]
    pub async fn get_category_by_handle(
        &self,
        handle_path: &str,
    ) -> Result<Option<Category>, BackendError> {
        let Some(handle) = category_handle(handle_path) else {
            return Ok(None);
        };

        let key = CacheKey::Category(handle.to_string());
        if let Some(CacheValue::Category(cached)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for category");
            return Ok(cached);
        }

        let query = Query::new()
            .param("handle", handle)
            .param("fields", "*category_children")
            .param("limit", 1);
        let list: CategoryList = self
            .inner
            .backend
            .get(&["store", "product-categories"], &query, None)
            .await?;

        let category = list.product_categories.into_iter().find(|c| c.handle == handle);
        self.inner
            .cache
            .insert(key, CacheValue::Category(category.clone()))
            .await;
        Ok(category)
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
        debug!("Catalog cache invalidated");
    }
}

fn page_query(page: PageRequest) -> Query {
    Query::new()
        .param("limit", page.limit())
        .param("offset", page.offset())
}

fn catalog_page<T>(items: Vec<T>, count: u64, page: PageRequest) -> CatalogPage<T> {
    CatalogPage {
        items,
        count,
        page: page.page(),
        next_page: page.next_page(count),
    }
}

/// Last non-empty segment of a category handle path.
fn category_handle(handle_path: &str) -> Option<&str> {
    handle_path
        .split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .next_back()
}
