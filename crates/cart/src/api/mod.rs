//! Stock and product lookups.
//!
//! # Architecture
//!
//! - The stock API is the source of truth for availability - NO caching,
//!   every amount-increasing cart operation asks again
//! - [`ApiClient`] implements both traits over plain JSON HTTP
//!
//! # Endpoints
//!
//! - `GET {base}/stock/{id}` - `{ "id": 1, "amount": 3 }`
//! - `GET {base}/products/{id}` - `{ "id": 1, "title": "...", "price": 179.9, "image": "..." }`

mod client;

pub use client::ApiClient;

use async_trait::async_trait;
use rocketshoes_core::{Product, ProductId, Stock};

use crate::error::ApiError;

/// Reports how many units of a product are available.
#[async_trait]
pub trait StockService: Send + Sync {
    /// Fetch the current stock for a product.
    async fn get_stock(&self, product_id: ProductId) -> Result<Stock, ApiError>;
}

/// Provides product display metadata.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch name, price and image for a product.
    async fn get_product(&self, product_id: ProductId) -> Result<Product, ApiError>;
}
