//! Integration test harness for the Harbor storefront.
//!
//! Tests run the real storefront router in-process against [`FakeBackend`],
//! an axum server that speaks enough of the commerce store API to exercise
//! regions, products, catalog, carts and payment providers. The fake records
//! every request it receives so tests can assert on what the storefront sent.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p harbor-integration-tests
//! ```
//!
//! No external services are needed; both servers bind to `127.0.0.1:0`.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use harbor_core::CountryCode;
use harbor_storefront::config::{BackendConfig, CacheConfig, StorefrontConfig};
use harbor_storefront::routes;
use harbor_storefront::state::AppState;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

/// Publishable key the fake backend accepts.
pub const PUBLISHABLE_KEY: &str = "pk_test_harbor";

/// Promotion code the fake backend accepts.
pub const VALID_PROMO_CODE: &str = "WELCOME10";

/// Page size the backend applies when the caller sends no `limit`.
const BACKEND_DEFAULT_LIMIT: usize = 50;

const PUBLISHABLE_KEY_HEADER: &str = "x-publishable-api-key";

// =============================================================================
// Fixtures
// =============================================================================

/// A region record serving `countries`.
#[must_use]
pub fn region(id: &str, name: &str, currency_code: &str, countries: &[&str]) -> Value {
    let countries: Vec<Value> = countries
        .iter()
        .map(|iso_2| json!({ "iso_2": iso_2, "display_name": iso_2.to_uppercase() }))
        .collect();

    json!({
        "id": id,
        "name": name,
        "currency_code": currency_code,
        "countries": countries,
    })
}

/// A single-variant product. `price` of `None` leaves the variant unpriced.
#[must_use]
pub fn product(id: &str, handle: &str, price: Option<f64>) -> Value {
    let calculated_price = price.map(|amount| {
        json!({
            "calculated_amount": amount,
            "original_amount": amount,
            "currency_code": "usd",
        })
    });

    json!({
        "id": id,
        "title": handle.replace('-', " "),
        "handle": handle,
        "created_at": Value::Null,
        "collection_id": Value::Null,
        "variants": [{
            "id": format!("variant_{id}"),
            "title": "Default",
            "calculated_price": calculated_price,
            "manage_inventory": false,
        }],
        "translations": [],
    })
}

/// `n` products priced `1..=n`, stored in a scrambled order.
///
/// Product `i` is created on day `i` of 2024, so newer products cost more.
#[must_use]
pub fn numbered_products(n: usize) -> Vec<Value> {
    // Stepping by a value coprime with `n` visits every index once
    let step = if n % 7 == 0 { 1 } else { 7 };

    (0..n)
        .map(|i| (i * step) % n + 1)
        .map(|price| {
            let mut p = product(
                &format!("prod_{price:03}"),
                &format!("product-{price:03}"),
                Some(f64::from(u32::try_from(price).unwrap())),
            );
            p["created_at"] = json!(day_of_2024(price));
            p
        })
        .collect()
}

fn day_of_2024(day: usize) -> String {
    let months = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let mut remaining = day;
    for (month, days) in months.iter().enumerate() {
        if remaining <= *days {
            return format!("2024-{:02}-{remaining:02}T00:00:00.000Z", month + 1);
        }
        remaining -= days;
    }
    "2024-12-31T00:00:00.000Z".to_string()
}

// =============================================================================
// Fake Backend
// =============================================================================

/// A request as received by the fake backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub publishable_key: Option<String>,
    pub authorization: Option<String>,
}

impl RecordedRequest {
    /// First value for `key`.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        param(&self.query, key)
    }

    /// All values for `key`.
    #[must_use]
    pub fn params(&self, key: &str) -> Vec<&str> {
        params(&self.query, key)
    }
}

#[derive(Default)]
struct Store {
    regions: Vec<Value>,
    products: Vec<Value>,
    collections: Vec<Value>,
    categories: Vec<Value>,
    payment_providers: Vec<(String, Value)>,
    carts: HashMap<String, Value>,
    next_id: u64,
    requests: Vec<RecordedRequest>,
}

impl Store {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}_{:04}", self.next_id)
    }

    fn region(&self, id: &str) -> Option<&Value> {
        self.regions.iter().find(|r| str_field(r, "id") == id)
    }

    fn variant(&self, variant_id: &str) -> Option<(&Value, &Value)> {
        self.products.iter().find_map(|p| {
            p["variants"]
                .as_array()?
                .iter()
                .find(|v| str_field(v, "id") == variant_id)
                .map(|v| (p, v))
        })
    }
}

type Shared = Arc<Mutex<Store>>;

/// In-process commerce backend.
///
/// Cheaply cloneable; clones share state.
#[derive(Clone)]
pub struct FakeBackend {
    addr: SocketAddr,
    store: Shared,
}

impl FakeBackend {
    /// Start a backend with two regions, a small catalog and no products.
    ///
    /// | Region | Currency | Countries |
    /// |--------|----------|-----------|
    /// | `reg_na` | usd | us, ca |
    /// | `reg_eu` | eur | de, fr, dk |
    pub async fn start() -> Self {
        let store = Store {
            regions: vec![
                region("reg_na", "North America", "usd", &["us", "ca"]),
                region("reg_eu", "Europe", "eur", &["de", "fr", "dk"]),
            ],
            collections: vec![
                json!({ "id": "pcol_summer", "title": "Summer", "handle": "summer" }),
                json!({ "id": "pcol_winter", "title": "Winter", "handle": "winter" }),
                json!({ "id": "pcol_basics", "title": "Basics", "handle": "basics" }),
            ],
            categories: vec![
                json!({
                    "id": "pcat_tops",
                    "name": "Tops",
                    "handle": "tops",
                    "parent_category_id": null,
                    "category_children": [
                        { "id": "pcat_shirts", "name": "Shirts", "handle": "shirts", "parent_category_id": "pcat_tops" }
                    ],
                }),
                json!({
                    "id": "pcat_shirts",
                    "name": "Shirts",
                    "handle": "shirts",
                    "parent_category_id": "pcat_tops",
                    "category_children": [],
                }),
                json!({
                    "id": "pcat_bottoms",
                    "name": "Bottoms",
                    "handle": "bottoms",
                    "parent_category_id": null,
                    "category_children": [],
                }),
            ],
            payment_providers: vec![
                ("reg_na".to_string(), json!({ "id": "pp_system_default", "is_enabled": true })),
                ("reg_na".to_string(), json!({ "id": "pp_stripe_stripe", "is_enabled": true })),
                ("reg_na".to_string(), json!({ "id": "pp_legacy_invoice", "is_enabled": false })),
                ("reg_eu".to_string(), json!({ "id": "pp_system_default", "is_enabled": true })),
            ],
            ..Store::default()
        };
        let store: Shared = Arc::new(Mutex::new(store));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = backend_router(store.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, store }
    }

    /// Base URL of the store API.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).unwrap()
    }

    pub fn set_products(&self, products: Vec<Value>) {
        self.store.lock().unwrap().products = products;
    }

    pub fn set_regions(&self, regions: Vec<Value>) {
        self.store.lock().unwrap().regions = regions;
    }

    /// Requests received on `path`, oldest first.
    #[must_use]
    pub fn requests(&self, path: &str) -> Vec<RecordedRequest> {
        self.store
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    /// Number of requests received on `path`.
    #[must_use]
    pub fn hits(&self, path: &str) -> usize {
        self.requests(path).len()
    }

    /// Every request received.
    #[must_use]
    pub fn all_requests(&self) -> Vec<RecordedRequest> {
        self.store.lock().unwrap().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.store.lock().unwrap().requests.clear();
    }

    /// Stored cart by ID.
    #[must_use]
    pub fn cart(&self, id: &str) -> Option<Value> {
        self.store.lock().unwrap().carts.get(id).cloned()
    }

    /// Forget a cart, as if it expired on the backend.
    pub fn drop_cart(&self, id: &str) {
        self.store.lock().unwrap().carts.remove(id);
    }
}

fn backend_router(store: Shared) -> Router {
    Router::new()
        .route("/store/regions", get(list_regions))
        .route("/store/regions/{id}", get(get_region))
        .route("/store/products", get(list_products))
        .route("/store/collections", get(list_collections))
        .route("/store/product-categories", get(list_categories))
        .route("/store/carts", post(create_cart))
        .route("/store/carts/{id}", get(get_cart).post(update_cart))
        .route("/store/carts/{id}/line-items", post(add_line_item))
        .route(
            "/store/carts/{id}/line-items/{line_id}",
            post(update_line_item).delete(delete_line_item),
        )
        .route("/store/carts/{id}/promotions", post(add_promotions))
        .route("/store/payment-providers", get(list_payment_providers))
        .layer(middleware::from_fn_with_state(store.clone(), record_request))
        .with_state(store)
}

/// Record the request and enforce the publishable key.
async fn record_request(State(store): State<Shared>, request: Request, next: Next) -> Response {
    let recorded = {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };

        RecordedRequest {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            query: request
                .uri()
                .query()
                .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
                .unwrap_or_default(),
            publishable_key: header(PUBLISHABLE_KEY_HEADER),
            authorization: header("authorization"),
        }
    };
    let key_ok = recorded.publishable_key.as_deref() == Some(PUBLISHABLE_KEY);
    store.lock().unwrap().requests.push(recorded);

    if !key_ok {
        return error(
            StatusCode::UNAUTHORIZED,
            "A valid publishable key is required to proceed with the request",
        );
    }

    next.run(request).await
}

// -----------------------------------------------------------------------------
// Handlers
// -----------------------------------------------------------------------------

type Params = Query<Vec<(String, String)>>;

async fn list_regions(State(store): State<Shared>, Query(query): Params) -> Response {
    let store = store.lock().unwrap();
    listing("regions", &store.regions, &query)
}

async fn get_region(State(store): State<Shared>, Path(id): Path<String>) -> Response {
    let store = store.lock().unwrap();
    store.region(&id).map_or_else(
        || error(StatusCode::NOT_FOUND, &format!("Region with id: {id} was not found")),
        |region| Json(json!({ "region": region })).into_response(),
    )
}

async fn list_products(State(store): State<Shared>, Query(query): Params) -> Response {
    if param(&query, "region_id").is_none() {
        return error(
            StatusCode::BAD_REQUEST,
            "Missing required pricing context to calculate prices",
        );
    }

    let store = store.lock().unwrap();
    let ids = params(&query, "id[]");
    let collection_ids = params(&query, "collection_id[]");
    let category_ids = params(&query, "category_id[]");
    let handle = param(&query, "handle");
    let q = param(&query, "q").map(str::to_lowercase);
    let with_translations = param(&query, "fields")
        .is_some_and(|f| f.split(',').any(|s| s.trim() == "*translations"));

    let matching: Vec<Value> = store
        .products
        .iter()
        .filter(|p| ids.is_empty() || ids.contains(&str_field(p, "id")))
        .filter(|p| {
            collection_ids.is_empty() || collection_ids.contains(&str_field(p, "collection_id"))
        })
        .filter(|p| {
            category_ids.is_empty()
                || p["categories"].as_array().is_some_and(|categories| {
                    categories
                        .iter()
                        .any(|c| category_ids.contains(&str_field(c, "id")))
                })
        })
        .filter(|p| handle.is_none_or(|h| str_field(p, "handle") == h))
        .filter(|p| {
            q.as_ref()
                .is_none_or(|q| str_field(p, "title").to_lowercase().contains(q))
        })
        .cloned()
        .map(|mut p| {
            if !with_translations {
                if let Some(object) = p.as_object_mut() {
                    object.remove("translations");
                }
            }
            p
        })
        .collect();

    listing("products", &matching, &query)
}

async fn list_collections(State(store): State<Shared>, Query(query): Params) -> Response {
    let store = store.lock().unwrap();
    let handle = param(&query, "handle");
    let matching: Vec<Value> = store
        .collections
        .iter()
        .filter(|c| handle.is_none_or(|h| str_field(c, "handle") == h))
        .cloned()
        .collect();
    listing("collections", &matching, &query)
}

async fn list_categories(State(store): State<Shared>, Query(query): Params) -> Response {
    let store = store.lock().unwrap();
    let handle = param(&query, "handle");
    let top_level_only = param(&query, "parent_category_id") == Some("null");
    let matching: Vec<Value> = store
        .categories
        .iter()
        .filter(|c| handle.is_none_or(|h| str_field(c, "handle") == h))
        .filter(|c| !top_level_only || c["parent_category_id"].is_null())
        .cloned()
        .collect();
    listing("product_categories", &matching, &query)
}

async fn create_cart(State(store): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut store = store.lock().unwrap();
    let Some(region_id) = body["region_id"].as_str() else {
        return error(StatusCode::BAD_REQUEST, "region_id is required");
    };
    let Some(currency_code) = store.region(region_id).map(|r| r["currency_code"].clone()) else {
        return error(StatusCode::NOT_FOUND, "Region not found");
    };

    let id = store.next_id("cart");
    let cart = json!({
        "id": id,
        "region_id": region_id,
        "currency_code": currency_code,
        "items": [],
        "promotions": [],
        "subtotal": 0,
        "total": 0,
    });
    store.carts.insert(id, cart.clone());
    Json(json!({ "cart": cart })).into_response()
}

async fn get_cart(State(store): State<Shared>, Path(id): Path<String>) -> Response {
    let store = store.lock().unwrap();
    store.carts.get(&id).map_or_else(
        || error(StatusCode::NOT_FOUND, &format!("Cart id not found: {id}")),
        |cart| Json(json!({ "cart": cart })).into_response(),
    )
}

async fn update_cart(
    State(store): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = store.lock().unwrap();
    let region = body["region_id"]
        .as_str()
        .and_then(|region_id| store.region(region_id))
        .cloned();
    let Some(cart) = store.carts.get_mut(&id) else {
        return error(StatusCode::NOT_FOUND, &format!("Cart id not found: {id}"));
    };

    if let Some(region) = region {
        cart["region_id"] = region["id"].clone();
        cart["currency_code"] = region["currency_code"].clone();
    }
    Json(json!({ "cart": cart })).into_response()
}

async fn add_line_item(
    State(store): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = store.lock().unwrap();
    let variant_id = body["variant_id"].as_str().unwrap_or_default().to_string();
    let quantity = body["quantity"].as_u64().unwrap_or(0);

    let Some((product, variant)) = store.variant(&variant_id) else {
        return error(
            StatusCode::NOT_FOUND,
            &format!("Variant {variant_id} not found"),
        );
    };
    let line_template = json!({
        "title": product["title"],
        "variant_id": variant_id,
        "product_id": product["id"],
        "product_handle": product["handle"],
        "unit_price": variant["calculated_price"]["calculated_amount"].as_f64().unwrap_or(0.0),
    });

    let line_id = store.next_id("item");
    let Some(cart) = store.carts.get_mut(&id) else {
        return error(StatusCode::NOT_FOUND, &format!("Cart id not found: {id}"));
    };

    let items = cart["items"].as_array_mut().unwrap();
    if let Some(existing) = items
        .iter_mut()
        .find(|item| str_field(item, "variant_id") == variant_id)
    {
        existing["quantity"] = json!(existing["quantity"].as_u64().unwrap_or(0) + quantity);
    } else {
        let mut line = line_template;
        line["id"] = json!(line_id);
        line["quantity"] = json!(quantity);
        items.push(line);
    }

    recompute_totals(cart);
    Json(json!({ "cart": cart })).into_response()
}

async fn update_line_item(
    State(store): State<Shared>,
    Path((id, line_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = store.lock().unwrap();
    let Some(cart) = store.carts.get_mut(&id) else {
        return error(StatusCode::NOT_FOUND, &format!("Cart id not found: {id}"));
    };
    let Some(line) = cart["items"]
        .as_array_mut()
        .unwrap()
        .iter_mut()
        .find(|item| str_field(item, "id") == line_id)
    else {
        return error(
            StatusCode::NOT_FOUND,
            &format!("Line item {line_id} not found"),
        );
    };

    line["quantity"] = body["quantity"].clone();
    recompute_totals(cart);
    Json(json!({ "cart": cart })).into_response()
}

async fn delete_line_item(
    State(store): State<Shared>,
    Path((id, line_id)): Path<(String, String)>,
) -> Response {
    let mut store = store.lock().unwrap();
    let Some(cart) = store.carts.get_mut(&id) else {
        return error(StatusCode::NOT_FOUND, &format!("Cart id not found: {id}"));
    };

    let items = cart["items"].as_array_mut().unwrap();
    let before = items.len();
    items.retain(|item| str_field(item, "id") != line_id);
    if items.len() == before {
        return error(
            StatusCode::NOT_FOUND,
            &format!("Line item {line_id} not found"),
        );
    }

    recompute_totals(cart);
    Json(json!({
        "id": line_id,
        "object": "line-item",
        "deleted": true,
        "parent": cart,
    }))
    .into_response()
}

async fn add_promotions(
    State(store): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = store.lock().unwrap();
    let codes: Vec<String> = body["promo_codes"]
        .as_array()
        .map(|codes| {
            codes
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    if let Some(invalid) = codes.iter().find(|c| c.as_str() != VALID_PROMO_CODE) {
        return error(
            StatusCode::BAD_REQUEST,
            &format!("The promotion code {invalid} is invalid"),
        );
    }

    let Some(cart) = store.carts.get_mut(&id) else {
        return error(StatusCode::NOT_FOUND, &format!("Cart id not found: {id}"));
    };

    let promotions = cart["promotions"].as_array_mut().unwrap();
    for code in codes {
        if !promotions.iter().any(|p| str_field(p, "code") == code) {
            promotions.push(json!({ "id": format!("promo_{}", code.to_lowercase()), "code": code }));
        }
    }
    Json(json!({ "cart": cart })).into_response()
}

async fn list_payment_providers(State(store): State<Shared>, Query(query): Params) -> Response {
    let store = store.lock().unwrap();
    let Some(region_id) = param(&query, "region_id") else {
        return error(StatusCode::BAD_REQUEST, "region_id is required");
    };
    let providers: Vec<Value> = store
        .payment_providers
        .iter()
        .filter(|(region, _)| region == region_id)
        .map(|(_, provider)| provider.clone())
        .collect();
    listing("payment_providers", &providers, &query)
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn listing(key: &str, items: &[Value], query: &[(String, String)]) -> Response {
    let offset: usize = param(query, "offset")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let limit: usize = param(query, "limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(BACKEND_DEFAULT_LIMIT);

    let page: Vec<Value> = items.iter().skip(offset).take(limit).cloned().collect();
    let mut body = json!({
        "count": items.len(),
        "offset": offset,
        "limit": limit,
    });
    body[key] = Value::Array(page);
    Json(body).into_response()
}

fn recompute_totals(cart: &mut Value) {
    let subtotal: f64 = cart["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    let quantity = item["quantity"].as_u64().unwrap_or(0);
                    item["unit_price"].as_f64().unwrap_or(0.0)
                        * f64::from(u32::try_from(quantity).unwrap_or(0))
                })
                .sum()
        })
        .unwrap_or(0.0);
    cart["subtotal"] = json!(subtotal);
    cart["total"] = json!(subtotal);
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "type": "invalid_data", "message": message }))).into_response()
}

fn param<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn params<'a>(query: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    query
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value[key].as_str().unwrap_or_default()
}

// =============================================================================
// Storefront
// =============================================================================

/// Storefront configuration pointing at `backend_url`.
#[must_use]
pub fn test_config(backend_url: Url) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        default_region: CountryCode::parse("us").unwrap(),
        // reqwest's cookie store will not send `Secure` cookies over http
        secure_cookies: false,
        revalidate_secret: None,
        backend: BackendConfig {
            base_url: backend_url,
            publishable_key: PUBLISHABLE_KEY.to_string(),
        },
        cache: CacheConfig::default(),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A running storefront with a cookie-keeping client.
pub struct TestStorefront {
    pub base_url: String,
    pub client: reqwest::Client,
    pub backend: FakeBackend,
}

impl TestStorefront {
    /// Start a storefront in front of `backend` with default configuration.
    pub async fn start(backend: FakeBackend) -> Self {
        Self::start_with(backend, |_| {}).await
    }

    /// Start a storefront, adjusting the configuration first.
    pub async fn start_with(
        backend: FakeBackend,
        configure: impl FnOnce(&mut StorefrontConfig),
    ) -> Self {
        let mut config = test_config(backend.url());
        configure(&mut config);

        let app = routes::app(AppState::new(config));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{addr}"),
            client,
            backend,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET` a path and decode the JSON body.
    pub async fn get_json(&self, path: &str) -> (reqwest::StatusCode, Value) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    /// `POST` a JSON body and decode the JSON response.
    pub async fn post_json(&self, path: &str, body: &Value) -> (reqwest::StatusCode, Value) {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap();
        let status = response.status();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    /// `DELETE` a path and decode the JSON response.
    pub async fn delete_json(&self, path: &str) -> (reqwest::StatusCode, Value) {
        let response = self.client.delete(self.url(path)).send().await.unwrap();
        let status = response.status();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }
}
