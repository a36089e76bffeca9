//! Description endpoints and hypermedia collections of a configured dispatcher.

mod common;

use common::{client, client_with};
use hydrant::config::{ApiConfig, HydrantConfig};
use hydrant::http::StatusCode;
use serde_json::{json, Value};

const LD_JSON: &str = "application/ld+json";

fn configured(api: ApiConfig) -> HydrantConfig {
    HydrantConfig::builder().api(api).build()
}

#[tokio::test]
async fn test_documentation_endpoint() {
    let response = client()
        .get("/api/product/documentation")
        .accept(LD_JSON)
        .send()
        .await;

    response
        .assert_status(StatusCode::OK)
        .assert_content_type(LD_JSON)
        .assert_header("content-disposition", "inline; filename=\"Product.txt\"");

    let class = response.node("http://shop.test#Product").unwrap();
    assert!(class.is_some(), "Product class missing");
    assert!(response
        .node("http://shop.test/api/product#GETId")
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_configured_base_and_segment() {
    let client = client_with(
        configured(ApiConfig {
            base_uri: Some("https://api.shop.test".to_string()),
            documentation_segment: "docs".to_string(),
            title: Some("Shop".to_string()),
        }),
        3,
    );

    let response = client.get("/api/product/docs").accept(LD_JSON).send().await;
    response.assert_status(StatusCode::OK);
    assert!(response.node("https://api.shop.test#Product").unwrap().is_some());

    let old_segment = client
        .get("/api/product/documentation")
        .accept(LD_JSON)
        .send()
        .await;
    old_segment.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_format_query() {
    let client = client();

    let jsonld = client
        .get("/api/product/documentation?format=jsonld")
        .accept("text/plain")
        .send()
        .await;
    jsonld
        .assert_status(StatusCode::OK)
        .assert_content_type(LD_JSON)
        .assert_header("content-disposition", "inline; filename=\"Product.jsonld\"");

    let unknown = client
        .get("/api/product/documentation?format=yaml")
        .send()
        .await;
    unknown.assert_status(StatusCode::BAD_REQUEST);

    let turtle = client
        .get("/api/product/documentation?format=turtle")
        .send()
        .await;
    turtle.assert_status(StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn test_options_self_description() {
    let client = client_with(
        configured(ApiConfig {
            base_uri: Some("https://api.shop.test".to_string()),
            ..Default::default()
        }),
        1,
    );

    let response = client
        .options("/api/product")
        .accept("application/json")
        .send()
        .await;

    response
        .assert_status(StatusCode::OK)
        .assert_content_type("application/json");
    let document = response.json_value().unwrap();
    assert_eq!(document["@graph"][0]["@id"], "https://api.shop.test");
}

#[tokio::test]
async fn test_paged_collection() {
    let client = client_with(HydrantConfig::default(), 20);
    let response = client
        .get("/api/product?$top=10")
        .accept(LD_JSON)
        .send()
        .await;

    response
        .assert_status(StatusCode::OK)
        .assert_content_type(LD_JSON)
        .assert_header("content-range", "members 0-9/20");

    let collection = response
        .node("http://shop.test/api/product")
        .unwrap()
        .expect("collection node");
    assert_eq!(collection["hydra:totalItems"], json!(20));
    assert_eq!(collection["hydra:member"].as_array().map(Vec::len), Some(10));

    let body = response.text().unwrap();
    assert!(body.contains("http://shop.test/api/product?$skip=10&$top=10"));
}

#[tokio::test]
async fn test_collection_stays_plain_for_json() {
    let response = client().get("/api/product").send().await;

    response.assert_content_type("application/json");
    let products: Value = response.json().unwrap();
    assert_eq!(products.as_array().map(Vec::len), Some(5));
}
