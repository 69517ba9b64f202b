//! The cart state container.
//!
//! # Operations
//!
//! | Operation | Stock check | Catalog lookup | Failure report |
//! |-----------|-------------|----------------|----------------|
//! | [`CartStore::add_product`] | yes | new products only | "failed to add product" |
//! | [`CartStore::remove_product`] | no | no | "failed to remove product" |
//! | [`CartStore::update_product_amount`] | yes | no | "failed to change product quantity" |
//!
//! A stock rejection is always reported as the warning
//! "requested quantity exceeds available stock".
//!
//! # Concurrency
//!
//! Each operation works on a copy of the cart taken when it starts and
//! replaces the whole cart when it commits. Two overlapping operations on the
//! same product therefore race: the last one to commit wins.
//!
//! Commits are serialized, and each committed cart is written to storage
//! before the next commit starts. The write is synchronous I/O on the
//! committing task; subscribers can read the new cart while it runs.

mod watcher;

use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, PoisonError};

use rocketshoes_core::{Cart, CartLineItem, ProductId};
use tokio::sync::watch;
use tracing::instrument;

use crate::api::{ProductCatalog, StockService};
use crate::error::CartError;
use crate::notify::NotificationSink;
use crate::storage::{CART_STORAGE_KEY, PersistentStore};
use watcher::PersistenceWatcher;

/// Warning shown when a requested amount is more than is in stock.
pub const STOCK_EXCEEDED_MESSAGE: &str = "requested quantity exceeds available stock";

/// The public cart operations, used to pick the failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

impl CartOperation {
    /// Message reported when the operation fails for any reason other than stock.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => "failed to add product",
            Self::Remove => "failed to remove product",
            Self::UpdateAmount => "failed to change product quantity",
        }
    }
}

/// Request to set the absolute amount of a product already in the cart.
///
/// `amount` is signed: callers such as a decrement button may pass zero or
/// less, which is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// External collaborators of a [`CartStore`].
#[derive(Clone)]
pub struct CartDeps {
    pub stock: Arc<dyn StockService>,
    pub catalog: Arc<dyn ProductCatalog>,
    pub storage: Arc<dyn PersistentStore>,
    pub notifications: Arc<dyn NotificationSink>,
}

/// A committed cart together with its generation.
///
/// Generation 0 is the cart loaded at startup; every commit increments it.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Cart>,
    generation: u64,
}

impl CartState {
    #[must_use]
    pub fn cart(&self) -> &Arc<Cart> {
        &self.cart
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Cart state for one shopping session.
///
/// Cheaply cloneable via `Arc`; clones share the same cart. Construct one per
/// session and hand clones to whatever needs the cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    stock: Arc<dyn StockService>,
    catalog: Arc<dyn ProductCatalog>,
    notifications: Arc<dyn NotificationSink>,
    state: watch::Sender<CartState>,
    commit_lock: Mutex<()>,
    watcher: PersistenceWatcher,
}

impl CartStore {
    /// Create a store, loading the cart persisted by a previous session.
    ///
    /// A missing, unreadable or unparseable snapshot yields an empty cart.
    #[must_use]
    pub fn new(deps: CartDeps) -> Self {
        let cart = load_cart(deps.storage.as_ref());
        tracing::debug!(items = cart.len(), "Cart loaded");

        let initial = CartState {
            cart: Arc::new(cart),
            generation: 0,
        };
        let (state, _) = watch::channel(initial);

        Self {
            inner: Arc::new(CartStoreInner {
                stock: deps.stock,
                catalog: deps.catalog,
                notifications: deps.notifications,
                state,
                commit_lock: Mutex::new(()),
                watcher: PersistenceWatcher::new(deps.storage, CART_STORAGE_KEY, 0),
            }),
        }
    }

    /// Current cart snapshot.
    #[must_use]
    pub fn cart(&self) -> Arc<Cart> {
        self.inner.state.borrow().cart.clone()
    }

    /// Current committed state, including its generation.
    #[must_use]
    pub fn state(&self) -> CartState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to committed cart states.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.inner.state.subscribe()
    }

    /// Add one unit of a product, creating its line item if needed.
    ///
    /// Never fails; problems are reported to the notification sink.
    pub async fn add_product(&self, product_id: ProductId) {
        if let Err(e) = self.try_add_product(product_id).await {
            self.report(CartOperation::Add, &e);
        }
    }

    /// Remove a product's line item.
    ///
    /// Never fails; problems are reported to the notification sink.
    pub fn remove_product(&self, product_id: ProductId) {
        if let Err(e) = self.try_remove_product(product_id) {
            self.report(CartOperation::Remove, &e);
        }
    }

    /// Set the amount of a product already in the cart.
    ///
    /// Amounts of zero or less are ignored without notification. Never fails;
    /// problems are reported to the notification sink.
    pub async fn update_product_amount(&self, request: UpdateProductAmount) {
        if let Err(e) = self.try_update_product_amount(request).await {
            self.report(CartOperation::UpdateAmount, &e);
        }
    }

    /// [`add_product`](Self::add_product) without the notification.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StockExceeded` if one more unit is not in stock, or
    /// `CartError::Transport` if the stock or product lookup fails. The cart
    /// is unchanged on error.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn try_add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let mut cart = Cart::clone(&self.cart());
        let current = cart.amount_of(product_id);

        let stock = self.inner.stock.get_stock(product_id).await?;
        let desired = i64::from(current) + 1;
        let exceeded = || CartError::StockExceeded {
            product_id,
            requested: desired,
            available: stock.amount,
        };

        if !stock.covers(desired) {
            return Err(exceeded());
        }
        let amount = current
            .checked_add(1)
            .and_then(NonZeroU32::new)
            .ok_or_else(exceeded)?;

        if current > 0 {
            cart.set_amount(product_id, amount);
        } else {
            let product = self.inner.catalog.get_product(product_id).await?;
            let mut item = CartLineItem::from_product(product, amount);
            item.id = product_id;
            cart.push(item);
        }

        self.commit(cart);
        Ok(())
    }

    /// [`remove_product`](Self::remove_product) without the notification.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the product is not in the cart.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn try_remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let mut cart = Cart::clone(&self.cart());
        cart.remove(product_id)
            .ok_or(CartError::ProductNotFound(product_id))?;

        self.commit(cart);
        Ok(())
    }

    /// [`update_product_amount`](Self::update_product_amount) without the notification.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the product is not in the cart,
    /// `CartError::StockExceeded` if the amount is more than is in stock, or
    /// `CartError::Transport` if the stock lookup fails.
    #[instrument(skip(self), fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn try_update_product_amount(
        &self,
        request: UpdateProductAmount,
    ) -> Result<(), CartError> {
        let UpdateProductAmount { product_id, amount } = request;
        if amount <= 0 {
            return Ok(());
        }

        let mut cart = Cart::clone(&self.cart());
        if cart.find(product_id).is_none() {
            return Err(CartError::ProductNotFound(product_id));
        }

        let stock = self.inner.stock.get_stock(product_id).await?;
        let exceeded = || CartError::StockExceeded {
            product_id,
            requested: amount,
            available: stock.amount,
        };

        if !stock.covers(amount) {
            return Err(exceeded());
        }
        let amount = u32::try_from(amount)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(exceeded)?;

        cart.set_amount(product_id, amount);

        self.commit(cart);
        Ok(())
    }

    /// End the session and return the final cart.
    ///
    /// Every committed change has already been persisted; nothing is written here.
    #[must_use]
    pub fn close(self) -> Arc<Cart> {
        let state = self.state();
        tracing::debug!(
            generation = state.generation,
            items = state.cart.len(),
            "Cart session closed"
        );
        state.cart
    }

    /// Replace the cart and mirror it to storage.
    fn commit(&self, cart: Cart) {
        let _guard = self
            .inner
            .commit_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let cart = Arc::new(cart);
        let mut generation = 0;
        self.inner.state.send_modify(|state| {
            state.generation += 1;
            state.cart = Arc::clone(&cart);
            generation = state.generation;
        });
        tracing::debug!(generation, items = cart.len(), "Cart committed");

        self.inner.watcher.observe(generation, &cart);
    }

    /// Map a failed operation onto a user-facing notification.
    fn report(&self, operation: CartOperation, error: &CartError) {
        match error {
            CartError::StockExceeded { .. } => {
                tracing::info!(?operation, error = %error, "Cart operation rejected");
                self.inner.notifications.warn(STOCK_EXCEEDED_MESSAGE);
            }
            CartError::ProductNotFound(_) | CartError::Transport(_) => {
                tracing::warn!(?operation, error = %error, "Cart operation failed");
                self.inner.notifications.error(operation.failure_message());
            }
        }
    }
}

/// Read the persisted cart, falling back to an empty one.
fn load_cart(storage: &dyn PersistentStore) -> Cart {
    match storage.read(CART_STORAGE_KEY) {
        Ok(Some(json)) => Cart::from_json(&json).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Persisted cart is unreadable, starting empty");
            Cart::new()
        }),
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read persisted cart, starting empty");
            Cart::new()
        }
    }
}
