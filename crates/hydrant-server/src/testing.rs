//! In-memory controllers shared by the unit tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use hydrant_core::{HydrantError, HydrantResult, ListQuery, Page};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::catalog::{ControllerCatalog, DescriptorTable};
use crate::controller::ControllerDefinition;
use crate::resource::{ReadController, WriteController};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Default)]
pub(crate) struct ProductStore {
    products: RwLock<BTreeMap<i64, Product>>,
}

impl ProductStore {
    /// Products 1..=n named `Product {id}`.
    pub fn seeded(count: i64) -> Self {
        let products = (1..=count)
            .map(|id| {
                (
                    id,
                    Product {
                        id,
                        name: format!("Product {id}"),
                        price: id as f64,
                    },
                )
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
        let products = self.products.read().await;
        Ok(query.apply(products.values().cloned()))
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
        let Some(existing) = products.get_mut(&key) else {
            return Err(HydrantError::not_found_resource("Product", key.to_string()));
        };
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

/// A table holding the full product controller at `/api/product`.
pub(crate) fn product_table(store: ProductStore) -> DescriptorTable {
    ControllerCatalog::new()
        .with(
            ControllerDefinition::new("Product", "/api/product")
                .write_controller(Arc::new(store)),
        )
        .build()
        .expect("product controller is valid")
}
