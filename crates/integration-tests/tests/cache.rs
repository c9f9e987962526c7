//! Cache revalidation, health and request correlation.

#![allow(clippy::unwrap_used)]

use harbor_integration_tests::{FakeBackend, TestStorefront, region};
use reqwest::StatusCode;
use secrecy::SecretString;

const SECRET: &str = "k9Qv3Lr7Tz1Wm5Hx8Bn2Jc6Fd4Gs0Ya";

async fn storefront_with_secret() -> TestStorefront {
    TestStorefront::start_with(FakeBackend::start().await, |config| {
        config.revalidate_secret = Some(SecretString::from(SECRET.to_string()));
    })
    .await
}

async fn revalidate(sf: &TestStorefront, secret: Option<&str>) -> StatusCode {
    let mut request = sf.client.post(sf.url("/api/cache/revalidate"));
    if let Some(secret) = secret {
        request = request.header("x-revalidate-secret", secret);
    }
    request.send().await.unwrap().status()
}

#[tokio::test]
async fn test_revalidate_refreshes_regions_and_catalog() {
    let sf = storefront_with_secret().await;

    sf.get_json("/api/regions/us").await;
    sf.get_json("/api/collections").await;
    assert_eq!(sf.backend.hits("/store/regions"), 1);
    assert_eq!(sf.backend.hits("/store/collections"), 1);

    // The backend moves the US into a new region
    sf.backend.set_regions(vec![
        region("reg_us", "United States", "usd", &["us"]),
        region("reg_eu", "Europe", "eur", &["de", "fr", "dk"]),
    ]);
    let (_, body) = sf.get_json("/api/regions/us").await;
    assert_eq!(body["id"], "reg_na");

    assert_eq!(revalidate(&sf, Some(SECRET)).await, StatusCode::NO_CONTENT);

    let (_, body) = sf.get_json("/api/regions/us").await;
    assert_eq!(body["id"], "reg_us");
    sf.get_json("/api/collections").await;
    assert_eq!(sf.backend.hits("/store/regions"), 2);
    assert_eq!(sf.backend.hits("/store/collections"), 2);
}

#[tokio::test]
async fn test_revalidate_forgets_absent_countries() {
    let sf = storefront_with_secret().await;

    let (status, _) = sf.get_json("/api/regions/nz").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    sf.backend.set_regions(vec![region("reg_oc", "Oceania", "nzd", &["nz", "au"])]);
    let (status, _) = sf.get_json("/api/regions/nz").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(revalidate(&sf, Some(SECRET)).await, StatusCode::NO_CONTENT);

    let (status, body) = sf.get_json("/api/regions/nz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "reg_oc");
    assert_eq!(sf.backend.hits("/store/regions"), 2);
}

#[tokio::test]
async fn test_revalidate_rejects_bad_secret() {
    let sf = storefront_with_secret().await;
    sf.get_json("/api/regions/us").await;

    assert_eq!(revalidate(&sf, None).await, StatusCode::UNAUTHORIZED);
    assert_eq!(revalidate(&sf, Some("guess")).await, StatusCode::UNAUTHORIZED);

    sf.get_json("/api/regions/us").await;
    assert_eq!(sf.backend.hits("/store/regions"), 1);
}

#[tokio::test]
async fn test_revalidate_disabled_without_secret() {
    let sf = TestStorefront::start(FakeBackend::start().await).await;

    assert_eq!(
        revalidate(&sf, Some(SECRET)).await,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_health() {
    let sf = TestStorefront::start(FakeBackend::start().await).await;

    let response = sf.client.get(sf.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");
    assert!(sf.backend.all_requests().is_empty());
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let sf = TestStorefront::start(FakeBackend::start().await).await;

    let response = sf
        .client
        .get(sf.url("/health"))
        .header("x-request-id", "edge-42")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "edge-42");

    let response = sf.client.get(sf.url("/health")).send().await.unwrap();
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(generated.len(), 36);
}

#[tokio::test]
async fn test_cache_id_cookie_is_issued_once() {
    let sf = TestStorefront::start(FakeBackend::start().await).await;

    let response = sf.client.get(sf.url("/health")).send().await.unwrap();
    let issued = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .any(|v| v.to_str().unwrap().starts_with("_harbor_cache_id="));
    assert!(issued);

    // The client now sends it back, so no new one is issued
    let response = sf.client.get(sf.url("/health")).send().await.unwrap();
    let reissued = response
        .headers()
        .get_all("set-cookie")
        .iter()
        .any(|v| v.to_str().unwrap().starts_with("_harbor_cache_id="));
    assert!(!reissued);
}
