use std::collections::BTreeMap;
use std::time::Duration;

use errmap_core::{wrap, Catalog, CatalogError, Sentinel, SentinelRegistry};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

// ---------------------------------------------------------------------------
// Sentinels
// ---------------------------------------------------------------------------

/// Domain failures the product service can return.
#[derive(Debug, Clone)]
pub struct ProductErrors {
    pub not_found: Sentinel,
    pub duplicate_sku: Sentinel,
    pub name_required: Sentinel,
    pub sku_required: Sentinel,
    pub invalid_price: Sentinel,
    pub invalid_quantity: Sentinel,
    pub insufficient_stock: Sentinel,
    pub malformed_body: Sentinel,
}

impl ProductErrors {
    pub fn register(registry: &mut SentinelRegistry) -> Self {
        Self {
            not_found: registry.register("product_not_found", "product not found"),
            duplicate_sku: registry.register("duplicate_sku", "SKU already exists"),
            name_required: registry.register("name_required", "product name is required"),
            sku_required: registry.register("sku_required", "product SKU is required"),
            invalid_price: registry.register("invalid_price", "price must be positive"),
            invalid_quantity: registry.register("invalid_quantity", "quantity must be positive"),
            insufficient_stock: registry.register("insufficient_stock", "not enough stock"),
            malformed_body: registry.register("malformed_body", "request body is malformed"),
        }
    }

    /// The client-facing catalog for these sentinels.
    pub fn catalog(&self, registry: &SentinelRegistry) -> Result<Catalog, CatalogError> {
        Catalog::builder()
            .entry("PRODUCT_NOT_FOUND", "product not found", 404, &self.not_found)
            .entry(
                "DUPLICATE_SKU",
                "a product with this SKU already exists",
                409,
                &self.duplicate_sku,
            )
            .entry("NAME_REQUIRED", "product name is required", 400, &self.name_required)
            .entry("SKU_REQUIRED", "product SKU is required", 400, &self.sku_required)
            .entry(
                "INVALID_PRICE",
                "price must be greater than zero",
                400,
                &self.invalid_price,
            )
            .entry(
                "INVALID_QUANTITY",
                "quantity must be greater than zero",
                400,
                &self.invalid_quantity,
            )
            .entry(
                "INSUFFICIENT_STOCK",
                "not enough stock to reserve",
                409,
                &self.insufficient_stock,
            )
            .entry(
                "MALFORMED_REQUEST",
                "request body is malformed",
                400,
                &self.malformed_body,
            )
            .build(registry)
    }
}

/// Register the product sentinels and build their catalog.
pub fn bootstrap() -> Result<(ProductErrors, Catalog), CatalogError> {
    let mut registry = SentinelRegistry::new();
    let errors = ProductErrors::register(&mut registry);
    let catalog = errors.catalog(&registry)?;
    Ok((errors, catalog))
}

// ---------------------------------------------------------------------------
// Product / NewProduct
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub sku: String,
    pub name: String,
    pub price_cents: i64,
    pub stock: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub price_cents: i64,
    #[serde(default)]
    pub stock: u32,
}

// ---------------------------------------------------------------------------
// ProductService
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Inventory {
    next_id: u64,
    products: BTreeMap<u64, Product>,
}

/// In-memory product store.
///
/// Every failure is a wrapped sentinel naming the operation and its inputs.
#[derive(Debug)]
pub struct ProductService {
    errors: ProductErrors,
    inventory: RwLock<Inventory>,
    latency: Option<Duration>,
}

impl ProductService {
    pub fn new(errors: ProductErrors) -> Self {
        Self {
            errors,
            inventory: RwLock::new(Inventory::default()),
            latency: None,
        }
    }

    /// Simulate a slow backing store: every operation sleeps first.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn errors(&self) -> &ProductErrors {
        &self.errors
    }

    async fn backend_delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    pub async fn list(&self) -> Vec<Product> {
        self.backend_delay().await;
        self.inventory.read().await.products.values().cloned().collect()
    }

    pub async fn get(&self, id: u64) -> anyhow::Result<Product> {
        self.backend_delay().await;
        self.inventory
            .read()
            .await
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| wrap(format!("get product {id}"), self.errors.not_found.clone()))
    }

    pub async fn create(&self, new: NewProduct) -> anyhow::Result<Product> {
        self.backend_delay().await;
        let sku = new.sku.trim().to_string();
        if sku.is_empty() {
            return Err(wrap("create product", self.errors.sku_required.clone()));
        }
        if new.name.trim().is_empty() {
            return Err(wrap(
                format!("create product SKU {sku}"),
                self.errors.name_required.clone(),
            ));
        }
        if new.price_cents <= 0 {
            return Err(wrap(
                format!("create product SKU {sku} with price {}", new.price_cents),
                self.errors.invalid_price.clone(),
            ));
        }

        let mut inventory = self.inventory.write().await;
        if inventory.products.values().any(|p| p.sku == sku) {
            return Err(wrap(
                format!("create product SKU {sku}"),
                self.errors.duplicate_sku.clone(),
            ));
        }
        inventory.next_id += 1;
        let product = Product {
            id: inventory.next_id,
            sku,
            name: new.name.trim().to_string(),
            price_cents: new.price_cents,
            stock: new.stock,
        };
        inventory.products.insert(product.id, product.clone());
        tracing::info!(id = product.id, sku = %product.sku, "product created");
        Ok(product)
    }

    pub async fn delete(&self, id: u64) -> anyhow::Result<()> {
        self.backend_delay().await;
        match self.inventory.write().await.products.remove(&id) {
            Some(_) => Ok(()),
            None => Err(wrap(
                format!("delete product {id}"),
                self.errors.not_found.clone(),
            )),
        }
    }

    /// Take `quantity` units out of stock, returning the updated product.
    pub async fn reserve(&self, id: u64, quantity: u32) -> anyhow::Result<Product> {
        self.backend_delay().await;
        if quantity == 0 {
            return Err(wrap(
                format!("reserve 0 of product {id}"),
                self.errors.invalid_quantity.clone(),
            ));
        }
        let mut inventory = self.inventory.write().await;
        let product = inventory.products.get_mut(&id).ok_or_else(|| {
            wrap(
                format!("reserve {quantity} of product {id}"),
                self.errors.not_found.clone(),
            )
        })?;
        if product.stock < quantity {
            return Err(wrap(
                format!(
                    "reserve {quantity} of product {id} with {} in stock",
                    product.stock
                ),
                self.errors.insufficient_stock.clone(),
            ));
        }
        product.stock -= quantity;
        Ok(product.clone())
    }
}
