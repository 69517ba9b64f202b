//! RocketShoes Cart - client-side cart state with stock checks.
//!
//! The [`CartStore`] owns the ordered list of cart line items for a single
//! shopping session. It checks every quantity increase against the stock API,
//! pulls product metadata from the catalog when a new product is added, and
//! mirrors every committed change to a [`PersistentStore`].
//!
//! # Architecture
//!
//! - Collaborators are traits ([`StockService`], [`ProductCatalog`],
//!   [`PersistentStore`], [`NotificationSink`]) held as `Arc<dyn _>`
//! - [`ApiClient`] implements the stock and catalog traits over HTTP (`reqwest`)
//! - Failures never reach the caller of the public operations; they are
//!   reported through the [`NotificationSink`]
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rocketshoes_cart::{ApiClient, CartConfig, CartDeps, CartStore, FileStore, TracingSink};
//!
//! let config = CartConfig::from_env()?;
//! let api = Arc::new(ApiClient::new(&config)?);
//! let store = CartStore::new(CartDeps {
//!     stock: api.clone(),
//!     catalog: api,
//!     storage: Arc::new(FileStore::new(&config.storage_dir)),
//!     notifications: Arc::new(TracingSink),
//! });
//!
//! store.add_product(ProductId::new(1)).await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;

pub use api::{ApiClient, ProductCatalog, StockService};
pub use config::{CartConfig, ConfigError};
pub use error::{ApiError, CartError, StorageError};
pub use notify::{CollectingSink, Notification, NotificationLevel, NotificationSink, TracingSink};
pub use storage::{CART_STORAGE_KEY, FileStore, MemoryStore, PersistentStore};
pub use store::{
    CartDeps, CartOperation, CartState, CartStore, STOCK_EXCEEDED_MESSAGE, UpdateProductAmount,
};
