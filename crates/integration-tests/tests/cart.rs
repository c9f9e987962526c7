//! Cart and payment provider flows through the storefront API.

#![allow(clippy::unwrap_used)]

use harbor_integration_tests::{
    FakeBackend, TestStorefront, VALID_PROMO_CODE, numbered_products,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn storefront() -> TestStorefront {
    let backend = FakeBackend::start().await;
    backend.set_products(numbered_products(5));
    TestStorefront::start(backend).await
}

async fn add(sf: &TestStorefront, country: &str, variant_id: &str, quantity: u32) -> Value {
    let (status, body) = sf
        .post_json(
            &format!("/api/{country}/cart/line-items"),
            &json!({ "variant_id": variant_id, "quantity": quantity }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["cart"].clone()
}

#[tokio::test]
async fn test_no_cart_yet() {
    let sf = storefront().await;

    let (status, body) = sf.get_json("/api/us/cart").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart"], Value::Null);
    assert_eq!(sf.backend.hits("/store/carts"), 0);
}

#[tokio::test]
async fn test_add_creates_cart_and_sets_cookie() {
    let sf = storefront().await;

    let response = sf
        .client
        .post(sf.url("/api/us/cart/line-items"))
        .json(&json!({ "variant_id": "variant_prod_002", "quantity": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookies: Vec<String> = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    let cart_cookie = set_cookies
        .iter()
        .find(|c| c.starts_with("_harbor_cart_id="))
        .expect("cart cookie set");
    assert!(cart_cookie.contains("HttpOnly"));
    assert!(cart_cookie.contains("SameSite=Strict"));
    assert!(cart_cookie.contains("Path=/"));

    let body: Value = response.json().await.unwrap();
    let cart = &body["cart"];
    assert_eq!(cart["region_id"], "reg_na");
    assert_eq!(cart["items"][0]["variant_id"], "variant_prod_002");
    assert_eq!(cart["items"][0]["quantity"], 2);

    // The cookie now identifies the cart
    let (_, body) = sf.get_json("/api/us/cart").await;
    assert_eq!(body["cart"]["id"], cart["id"]);
}

#[tokio::test]
async fn test_second_add_reuses_cart() {
    let sf = storefront().await;

    let first = add(&sf, "us", "variant_prod_001", 1).await;
    let second = add(&sf, "us", "variant_prod_003", 1).await;

    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["items"].as_array().unwrap().len(), 2);

    let creates = sf
        .backend
        .requests("/store/carts")
        .into_iter()
        .filter(|r| r.method == "POST")
        .count();
    assert_eq!(creates, 1);
}

#[tokio::test]
async fn test_zero_quantity_is_rejected() {
    let sf = storefront().await;

    let (status, _) = sf
        .post_json(
            "/api/us/cart/line-items",
            &json!({ "variant_id": "variant_prod_001", "quantity": 0 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(sf.backend.all_requests().is_empty());
}

#[tokio::test]
async fn test_update_and_delete_line_item() {
    let sf = storefront().await;
    let cart = add(&sf, "us", "variant_prod_004", 1).await;
    let line_id = cart["items"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = sf
        .post_json(
            &format!("/api/cart/line-items/{line_id}"),
            &json!({ "quantity": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart"]["items"][0]["quantity"], 5);

    let (status, _) = sf
        .post_json(
            &format!("/api/cart/line-items/{line_id}"),
            &json!({ "quantity": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = sf
        .delete_json(&format!("/api/cart/line-items/{line_id}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["cart"]["items"].as_array().unwrap().is_empty());
    assert_eq!(body["cart"]["id"], cart["id"]);
}

#[tokio::test]
async fn test_unknown_line_item_is_not_found() {
    let sf = storefront().await;
    add(&sf, "us", "variant_prod_001", 1).await;

    let (status, _) = sf.delete_json("/api/cart/line-items/item_missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mutations_without_cart_are_not_found() {
    let sf = storefront().await;

    let (status, _) = sf
        .post_json("/api/cart/promotions", &json!({ "codes": [VALID_PROMO_CODE] }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = sf.delete_json("/api/cart/line-items/item_0001").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(sf.backend.all_requests().is_empty());
}

#[tokio::test]
async fn test_cart_follows_country_region() {
    let sf = storefront().await;
    let cart = add(&sf, "us", "variant_prod_001", 1).await;
    assert_eq!(cart["currency_code"], "usd");

    let (status, body) = sf.get_json("/api/de/cart").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart"]["id"], cart["id"]);
    assert_eq!(body["cart"]["region_id"], "reg_eu");
    assert_eq!(body["cart"]["currency_code"], "eur");

    // One read, then the region update; the cart is not fetched again
    let cart_path = format!("/store/carts/{}", cart["id"].as_str().unwrap());
    let requests = sf.backend.requests(&cart_path);
    let methods: Vec<&str> = requests.iter().map(|r| r.method.as_str()).collect();
    assert_eq!(methods, ["GET", "POST"]);
}

#[tokio::test]
async fn test_expired_cart_is_replaced() {
    let sf = storefront().await;
    let cart = add(&sf, "us", "variant_prod_001", 1).await;
    let old_id = cart["id"].as_str().unwrap().to_string();
    sf.backend.drop_cart(&old_id);

    let (status, body) = sf.get_json("/api/us/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart"], Value::Null);

    let cart = add(&sf, "us", "variant_prod_002", 1).await;
    assert_ne!(cart["id"], old_id.as_str());
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_promotions() {
    let sf = storefront().await;
    add(&sf, "us", "variant_prod_005", 1).await;

    let (status, body) = sf
        .post_json(
            "/api/cart/promotions",
            &json!({ "codes": [VALID_PROMO_CODE, "  "] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart"]["promotions"][0]["code"], VALID_PROMO_CODE);

    let (status, _) = sf
        .post_json("/api/cart/promotions", &json!({ "codes": ["BOGUS"] }))
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_payment_providers_for_region() {
    let sf = storefront().await;

    let (status, body) = sf.get_json("/api/us/payment-providers").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["payment_providers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["pp_stripe_stripe", "pp_system_default"]);

    let request = &sf.backend.requests("/store/payment-providers")[0];
    assert_eq!(request.param("region_id"), Some("reg_na"));

    let (status, _) = sf.get_json("/api/zz/payment-providers").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_line_id_with_slashes_stays_in_its_segment() {
    let sf = storefront().await;
    let cart = add(&sf, "us", "variant_prod_001", 1).await;
    let cart_id = cart["id"].as_str().unwrap();
    sf.backend.clear_requests();

    let (status, _) = sf
        .delete_json("/api/cart/line-items/..%2F..%2F..%2Fadmin%2Fusers")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let requests = sf.backend.all_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].path,
        format!("/store/carts/{cart_id}/line-items/..%2F..%2F..%2Fadmin%2Fusers")
    );
}

#[tokio::test]
async fn test_line_id_cannot_inject_query_parameters() {
    let sf = storefront().await;
    let cart = add(&sf, "us", "variant_prod_001", 1).await;
    let cart_id = cart["id"].as_str().unwrap();
    sf.backend.clear_requests();

    let (status, _) = sf
        .post_json(
            "/api/cart/line-items/x%3Ffields=secret%23",
            &json!({ "quantity": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let requests = sf.backend.all_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].path,
        format!("/store/carts/{cart_id}/line-items/x%3Ffields=secret%23")
    );
    let fields = requests[0].params("fields");
    assert_eq!(fields.len(), 1);
    assert_ne!(fields[0], "secret");
}
