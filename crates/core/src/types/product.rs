//! Catalog product and stock records returned by the product API.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Product display metadata from the catalog.
///
/// The product API also sends fields the cart does not use; those are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(alias = "title")]
    pub name: String,
    pub price: Price,
    #[serde(alias = "image")]
    pub image_url: String,
}

/// Available stock for a product.
///
/// `amount` is signed because the stock API is not trusted to never report a
/// negative count; anything below one means nothing can be added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub amount: i64,
}

impl Stock {
    /// Whether `requested` units fit within the available stock.
    #[must_use]
    pub fn covers(&self, requested: i64) -> bool {
        requested <= self.amount
    }
}
