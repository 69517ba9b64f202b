//! Cart commands.
//!
//! # Environment Variables
//!
//! - `ROCKETSHOES_API_URL` - Base URL of the stock/product API
//! - `ROCKETSHOES_STORAGE_DIR` - Directory holding the persisted cart

use std::sync::Arc;

use rocketshoes_cart::{
    ApiClient, ApiError, CartConfig, CartDeps, CartStore, CollectingSink, FileStore,
    UpdateProductAmount,
};
use rocketshoes_core::{Cart, ProductId};
use thiserror::Error;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// The API client could not be built.
    #[error("API client error: {0}")]
    Client(#[from] ApiError),

    /// The operation was rejected or failed; the messages were already shown.
    #[error("{0}")]
    Rejected(String),
}

/// A cart operation requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartCommand {
    List,
    Add(ProductId),
    Update { product_id: ProductId, amount: i64 },
    Remove(ProductId),
}

/// Open the persisted cart, run one command and show the result.
///
/// # Errors
///
/// Returns an error if the API client cannot be built or the operation
/// produced a notification.
pub async fn execute(config: &CartConfig, command: CartCommand) -> Result<(), CartCommandError> {
    let api = Arc::new(ApiClient::new(config)?);
    let sink = CollectingSink::new();
    let store = CartStore::new(CartDeps {
        stock: api.clone(),
        catalog: api,
        storage: Arc::new(FileStore::new(&config.storage_dir)),
        notifications: Arc::new(sink.clone()),
    });

    apply(&store, command).await;

    for line in summarize(&store.close()) {
        tracing::info!("{line}");
    }

    let notifications = sink.drain();
    if notifications.is_empty() {
        Ok(())
    } else {
        let messages: Vec<String> = notifications.into_iter().map(|n| n.message).collect();
        Err(CartCommandError::Rejected(messages.join("; ")))
    }
}

/// Run a command against a store.
pub async fn apply(store: &CartStore, command: CartCommand) {
    match command {
        CartCommand::List => {}
        CartCommand::Add(product_id) => store.add_product(product_id).await,
        CartCommand::Update { product_id, amount } => {
            store
                .update_product_amount(UpdateProductAmount { product_id, amount })
                .await;
        }
        CartCommand::Remove(product_id) => store.remove_product(product_id),
    }
}

/// Human-readable cart listing.
#[must_use]
pub fn summarize(cart: &Cart) -> Vec<String> {
    if cart.is_empty() {
        return vec!["Cart is empty".to_string()];
    }

    let mut lines: Vec<String> = cart
        .iter()
        .map(|item| {
            format!(
                "#{} {} x{} @ {} = {}",
                item.id,
                item.name,
                item.amount,
                item.price,
                item.subtotal()
            )
        })
        .collect();
    lines.push(format!(
        "{} item(s), subtotal {}",
        cart.total_quantity(),
        cart.subtotal()
    ));
    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroU32;

    use rocketshoes_core::{CartLineItem, Price};

    use super::*;

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&Cart::new()), vec!["Cart is empty".to_string()]);
    }

    #[test]
    fn test_summarize_lines_and_total() {
        let cart = Cart::try_from(vec![
            CartLineItem {
                id: ProductId::new(1),
                name: "Runner".to_string(),
                price: Price::from_cents(17990),
                image_url: String::new(),
                amount: NonZeroU32::new(2).unwrap(),
            },
            CartLineItem {
                id: ProductId::new(3),
                name: "Walker".to_string(),
                price: Price::from_cents(9999),
                image_url: String::new(),
                amount: NonZeroU32::new(1).unwrap(),
            },
        ])
        .unwrap();

        assert_eq!(
            summarize(&cart),
            vec![
                "#1 Runner x2 @ $179.90 = $359.80".to_string(),
                "#3 Walker x1 @ $99.99 = $99.99".to_string(),
                "3 item(s), subtotal $459.79".to_string(),
            ]
        );
    }
}
