//! Product controllers shared by the unit tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use hydrant_core::{HydrantError, HydrantResult, ListQuery, Page};
use hydrant_server::{
    async_trait, ControllerCatalog, ControllerDefinition, DescriptorTable, ReadController,
    WriteController,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

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

/// A catalog holding the product controller at `/api/product`.
pub(crate) fn product_catalog(store: ProductStore) -> ControllerCatalog {
    ControllerCatalog::new().with(
        ControllerDefinition::new("Product", "/api/product")
            .description("Products on sale")
            .write_controller(Arc::new(store)),
    )
}

/// The table of an empty product store.
pub(crate) fn product_table() -> DescriptorTable {
    product_catalog(ProductStore::default())
        .build()
        .expect("product controller is valid")
}
