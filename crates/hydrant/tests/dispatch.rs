//! End-to-end dispatch through a configured `Dispatcher`.

mod common;

use common::{client, client_with, Product};
use hydrant::config::{CorsConfig, HydrantConfig};
use hydrant::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn test_get_entity() {
    let response = client().get("/api/product/2").send().await;

    response
        .assert_status(StatusCode::OK)
        .assert_content_type("application/json");
    let product: Product = response.json().unwrap();
    assert_eq!(product.name, "Product 2");
    assert!((product.price - 3.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_missing_entity() {
    let response = client().get("/api/product/99").send().await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_body_contains("Product");
}

#[tokio::test]
async fn test_malformed_key() {
    let response = client().get("/api/product/abc").send().await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_with_paging() {
    let response = client().get("/api/product?$skip=1&$top=2").send().await;

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-range", "members 1-2/5");
    let products: Vec<Product> = response.json().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id, 2);
}

#[tokio::test]
async fn test_list_with_filter() {
    let response = client()
        .get("/api/product?$filter=price%20gt%203")
        .send()
        .await;

    response.assert_status(StatusCode::OK);
    let products: Vec<Product> = response.json().unwrap();
    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![3, 4, 5]);
    response.assert_header("content-range", "members 0-2/3");
}

#[tokio::test]
async fn test_invalid_filter() {
    let response = client()
        .get("/api/product?$filter=price%20like%203")
        .send()
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_then_fetch() {
    let client = client();
    let response = client
        .post("/api/product")
        .json(&json!({"id": 0, "name": "Lamp", "price": 12.5}))
        .send()
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.location(), Some("http://shop.test/api/product/6"));
    assert!(response.body().is_empty());

    let fetched = client.get("/api/product/6").send().await;
    fetched.assert_json_field("name", &json!("Lamp"));
}

#[tokio::test]
async fn test_update_and_delete() {
    let client = client();

    let updated = client
        .put("/api/product/1")
        .json(&json!({"id": 1, "name": "Renamed", "price": 1.0}))
        .send()
        .await;
    updated.assert_status(StatusCode::NO_CONTENT);

    let fetched = client.get("/api/product/1").send().await;
    fetched.assert_json_field("name", &json!("Renamed"));

    let deleted = client.delete("/api/product/1").send().await;
    deleted.assert_status(StatusCode::NO_CONTENT);

    let missing = client.get("/api/product/1").send().await;
    missing.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wrong_verb_lists_allowed_methods() {
    let response = client().request(Method::PATCH, "/api/product/1").send().await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    let allowed = response.allowed_methods();
    assert!(allowed.contains(&Method::GET));
    assert!(allowed.contains(&Method::PUT));
    assert!(allowed.contains(&Method::DELETE));
}

#[tokio::test]
async fn test_unknown_path() {
    client()
        .get("/api/unknown")
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unsupported_body_media_type() {
    let response = client()
        .post("/api/product")
        .content_type("application/x-unknown")
        .body("???")
        .send()
        .await;
    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_lenient_accept_falls_back() {
    let response = client()
        .get("/api/product/1")
        .accept("image/png")
        .send()
        .await;

    response
        .assert_status(StatusCode::OK)
        .assert_content_type("application/json");
}

#[tokio::test]
async fn test_strict_accept_from_production_preset() {
    let client = client_with(HydrantConfig::production(), 1);
    let response = client
        .get("/api/product/1")
        .accept("image/png")
        .send()
        .await;

    response.assert_status(StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn test_cross_origin_headers() {
    let response = client()
        .get("/api/product/1")
        .origin("https://app.shop.test")
        .send()
        .await;

    response.assert_header("access-control-allow-origin", "*");
    let exposed = response
        .header_str("access-control-expose-headers")
        .unwrap()
        .to_ascii_lowercase();
    assert!(exposed.contains("location"));
    assert!(exposed.contains("content-range"));
}

#[tokio::test]
async fn test_preflight() {
    let response = client()
        .options("/api/product/1")
        .origin("https://app.shop.test")
        .header("access-control-request-method", "PUT")
        .send()
        .await;

    response.assert_status(StatusCode::NO_CONTENT);
    let methods = response.header_str("access-control-allow-methods").unwrap();
    assert!(methods.contains("PUT"));
    assert!(!methods.contains("POST"));
}

#[tokio::test]
async fn test_configured_origins() {
    let config = HydrantConfig::builder()
        .cors(CorsConfig {
            allowed_origins: vec!["https://app.shop.test".to_string()],
            ..Default::default()
        })
        .build();
    let client = client_with(config, 1);

    let allowed = client
        .get("/api/product/1")
        .origin("https://app.shop.test")
        .send()
        .await;
    allowed.assert_header("access-control-allow-origin", "https://app.shop.test");

    let denied = client
        .get("/api/product/1")
        .origin("https://evil.test")
        .send()
        .await;
    denied
        .assert_status(StatusCode::OK)
        .assert_no_header("access-control-allow-origin");
}
