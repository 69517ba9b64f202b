//! Error types for the cart and its collaborators.
//!
//! Errors stay internal to the cart operations: the public [`CartStore`]
//! methods turn every [`CartError`] into a notification at the boundary.
//!
//! [`CartStore`]: crate::CartStore

use rocketshoes_core::ProductId;
use thiserror::Error;

/// Errors that can occur when talking to the stock or product API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body could not be decoded.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Errors that can occur when reading or writing persisted state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage backend is unusable (e.g. a poisoned lock).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Why a cart operation was aborted.
///
/// In every case the cart is left exactly as it was before the operation.
#[derive(Debug, Error)]
pub enum CartError {
    /// Business rule rejection: the requested amount is more than is in stock.
    #[error("requested {requested} of product {product_id}, only {available} in stock")]
    StockExceeded {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// The product has no line item in the cart.
    #[error("product {0} not found in cart")]
    ProductNotFound(ProductId),

    /// Stock or product lookup failed.
    #[error("transport failure: {0}")]
    Transport(#[from] ApiError),
}

impl CartError {
    /// Whether this is a business rule rejection rather than a failure.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::StockExceeded { .. })
    }
}
