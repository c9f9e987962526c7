//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::BackendClient;
use crate::cart::CartService;
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::cookies::CookieSettings;
use crate::products::ProductLister;
use crate::regions::RegionResolver;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the backend services and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    regions: RegionResolver,
    products: ProductLister,
    catalog: Catalog,
    carts: CartService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// All services share one backend client (and its connection pool).
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let backend = BackendClient::new(&config.backend);
        let regions = RegionResolver::new(backend.clone(), config.cache.region_ttl);
        let products = ProductLister::new(backend.clone(), regions.clone(), &config.cache);
        let catalog = Catalog::new(backend.clone(), config.cache.catalog_ttl);
        let carts = CartService::new(backend);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                regions,
                products,
                catalog,
                carts,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn regions(&self) -> &RegionResolver {
        &self.inner.regions
    }

    #[must_use]
    pub fn products(&self) -> &ProductLister {
        &self.inner.products
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn carts(&self) -> &CartService {
        &self.inner.carts
    }

    /// Cookie attributes derived from configuration.
    #[must_use]
    pub fn cookie_settings(&self) -> CookieSettings {
        CookieSettings {
            secure: self.inner.config.secure_cookies,
        }
    }
}
