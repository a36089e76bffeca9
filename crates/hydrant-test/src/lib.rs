//! # Hydrant Test
//!
//! Test utilities for Hydrant dispatchers, providing in-memory HTTP testing
//! without network connections or port binding.
//!
//! ## Key Features
//!
//! - **In-Memory Testing**: requests go straight to a [`Dispatcher`](hydrant_server::Dispatcher)
//! - **Request Builder**: fluent API for building test requests
//! - **Response Assertions**: helper methods for validating responses
//! - **JSON and JSON-LD Support**: typed bodies and node lookup by `@id`
//! - **Identity**: attach a [`ClaimIdentity`](hydrant_core::ClaimIdentity) per request
//!
//! ## Example
//!
//! ```ignore
//! use hydrant_test::TestClient;
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_create_product() {
//!     let client = TestClient::new(dispatcher);
//!
//!     let response = client
//!         .post("/api/product")
//!         .json(&json!({ "name": "Lamp", "price": 9.5 }))
//!         .send()
//!         .await;
//!
//!     assert_eq!(response.status(), 201);
//!     assert!(response.location().is_some());
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/hydrant-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
