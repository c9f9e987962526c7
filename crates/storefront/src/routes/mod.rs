//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                 - Liveness check
//!
//! # Regions
//! GET    /api/regions                            - All regions
//! GET    /api/regions/{country_code}             - Region serving a country
//!
//! # Products (priced for the country's region)
//! GET    /api/{country_code}/products            - Sorted, paginated listing
//! GET    /api/{country_code}/products/{handle}   - Product detail
//!
//! # Catalog
//! GET    /api/collections                        - Collection listing
//! GET    /api/collections/{handle}               - Collection detail
//! GET    /api/categories                         - Top-level categories
//! GET    /api/categories/{*handle}               - Category by handle path
//!
//! # Cart (cart ID in the `_harbor_cart_id` cookie)
//! GET    /api/{country_code}/cart                - Current cart
//! POST   /api/{country_code}/cart/line-items     - Add merchandise
//! POST   /api/cart/line-items/{line_id}          - Change quantity
//! DELETE /api/cart/line-items/{line_id}          - Remove line
//! POST   /api/cart/promotions                    - Apply promotion codes
//! GET    /api/{country_code}/payment-providers   - Payment providers
//!
//! # Cache
//! POST   /api/cache/revalidate                   - Drop region and catalog caches
//! ```

pub mod cache;
pub mod cart;
pub mod catalog;
pub mod products;
pub mod regions;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::{cache_id_middleware, request_id_middleware};
use crate::state::AppState;

/// Create the region routes router.
pub fn region_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(regions::index))
        .route("/{country_code}", get(regions::show))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/collections", get(catalog::collections))
        .route("/collections/{handle}", get(catalog::collection))
        .route("/categories", get(catalog::categories))
        .route("/categories/{*handle}", get(catalog::category))
}

/// Create the cart routes router for operations on the existing cart.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/line-items/{line_id}",
            post(cart::update_line_item).delete(cart::delete_line_item),
        )
        .route("/promotions", post(cart::apply_promotions))
}

/// Create the routes scoped to a country.
pub fn country_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{handle}", get(products::show))
        .route("/cart", get(cart::show))
        .route("/cart/line-items", post(cart::add_line_item))
        .route("/payment-providers", get(cart::payment_providers))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/regions", region_routes())
        .nest("/api/cart", cart_routes())
        .route("/api/cache/revalidate", post(cache::revalidate))
        .nest("/api", catalog_routes())
        .nest("/api/{country_code}", country_routes())
}

/// Build the complete application with its middleware stack.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            cache_id_middleware,
        ))
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                    cache_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}
