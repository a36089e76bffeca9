//! Demo product controller shared by the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use hydrant::prelude::*;
use hydrant_test::TestClient;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

pub const HOST: &str = "shop.test";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Default)]
pub struct ProductStore {
    products: RwLock<BTreeMap<i64, Product>>,
}

impl ProductStore {
    /// Products `1..=count` priced at `1.5 * id`.
    pub fn seeded(count: i64) -> Self {
        let products = (1..=count)
            .map(|id| {
                let product = Product {
                    id,
                    name: format!("Product {id}"),
                    price: 1.5 * id as f64,
                };
                (id, product)
            })
            .collect();
        Self {
            products: RwLock::new(products),
        }
    }
}

#[async_trait]
impl ReadController for ProductStore {
    type Entity = Product;
    type Key = i64;

    const ENTITY: &'static str = "Product";

    async fn list(&self, query: ListQuery) -> HydrantResult<Page<Product>> {
        Ok(query.apply(self.products.read().await.values().cloned()))
    }

    async fn get(&self, key: i64) -> HydrantResult<Option<Product>> {
        Ok(self.products.read().await.get(&key).cloned())
    }
}

#[async_trait]
impl WriteController for ProductStore {
    async fn create(&self, mut entity: Product) -> HydrantResult<i64> {
        let mut products = self.products.write().await;
        let id = products.keys().next_back().map_or(1, |last| last + 1);
        entity.id = id;
        products.insert(id, entity);
        Ok(id)
    }

    async fn update(&self, key: i64, mut entity: Product) -> HydrantResult<()> {
        let mut products = self.products.write().await;
        let existing = products
            .get_mut(&key)
            .ok_or_else(|| HydrantError::not_found_resource("Product", key.to_string()))?;
        entity.id = key;
        *existing = entity;
        Ok(())
    }

    async fn delete(&self, key: i64) -> HydrantResult<()> {
        self.products
            .write()
            .await
            .remove(&key)
            .map(|_| ())
            .ok_or_else(|| HydrantError::not_found_resource("Product", key.to_string()))
    }
}

/// The product controller at `/api/product`.
pub fn products(store: ProductStore) -> ControllerDefinition {
    ControllerDefinition::new("Product", "/api/product")
        .description("Products on sale")
        .write_controller(Arc::new(store))
}

/// A client over a dispatcher built from `config` with `count` products.
pub fn client_with(config: HydrantConfig, count: i64) -> TestClient {
    let dispatcher = HydrantBuilder::new(config)
        .controller(products(ProductStore::seeded(count)))
        .build()
        .expect("demo configuration is valid");
    TestClient::new(dispatcher).with_default_header("Host", HOST)
}

/// A client over the default configuration with five products.
pub fn client() -> TestClient {
    client_with(HydrantConfig::default(), 5)
}
