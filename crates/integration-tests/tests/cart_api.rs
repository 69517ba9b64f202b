//! Integration tests for the cart store against the HTTP stock/product API.
//!
//! These tests run the real `ApiClient` and `FileStore` against an in-process
//! fake API, covering the add/update/remove flows end to end.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rocketshoes_cart::{
    ApiClient, CART_STORAGE_KEY, CartConfig, CartDeps, CartStore, CollectingSink, FileStore,
    Notification, PersistentStore, STOCK_EXCEEDED_MESSAGE, UpdateProductAmount,
};
use rocketshoes_core::{Cart, Price, ProductId};
use rocketshoes_integration_tests::{ApiMode, FakeApi};

// =============================================================================
// Helpers
// =============================================================================

fn open_store(api: &FakeApi, dir: &Path) -> (CartStore, CollectingSink) {
    let config = CartConfig {
        api_url: api.base_url(),
        storage_dir: dir.to_path_buf(),
        http_timeout: Duration::from_secs(5),
    };
    let client = Arc::new(ApiClient::new(&config).expect("Failed to build API client"));
    let sink = CollectingSink::new();
    let store = CartStore::new(CartDeps {
        stock: client.clone(),
        catalog: client,
        storage: Arc::new(FileStore::new(&config.storage_dir)),
        notifications: Arc::new(sink.clone()),
    });
    (store, sink)
}

fn persisted(dir: &Path) -> Option<Cart> {
    FileStore::new(dir)
        .read(CART_STORAGE_KEY)
        .expect("Failed to read persisted cart")
        .map(|json| Cart::from_json(&json).expect("Persisted cart is not valid JSON"))
}

async fn start_api() -> FakeApi {
    let api = FakeApi::start().await.expect("Failed to start fake API");
    api.add_product(1, "Tênis de Caminhada Leve Confortável", 179.9);
    api.add_product(2, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 139.9);
    api
}

// =============================================================================
// Scenario
// =============================================================================

#[tokio::test]
async fn test_cart_scenario_over_http() {
    let api = start_api().await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let (store, sink) = open_store(&api, dir.path());
    let id = ProductId::new(1);

    api.set_stock(1, 5);
    store.add_product(id).await;
    assert_eq!(store.cart().amount_of(id), 1);
    assert_eq!(store.cart().len(), 1);

    store.add_product(id).await;
    assert_eq!(store.cart().amount_of(id), 2);
    assert_eq!(store.cart().len(), 1);

    api.set_stock(1, 2);
    store.add_product(id).await;
    assert_eq!(store.cart().amount_of(id), 2);
    assert_eq!(sink.drain(), vec![Notification::warn(STOCK_EXCEEDED_MESSAGE)]);

    store.remove_product(id);
    assert!(store.cart().is_empty());

    store
        .update_product_amount(UpdateProductAmount {
            product_id: id,
            amount: 3,
        })
        .await;
    assert!(store.cart().is_empty());
    assert_eq!(
        sink.drain(),
        vec![Notification::error("failed to change product quantity")]
    );

    assert_eq!(persisted(dir.path()), Some(Cart::new()));
}

#[tokio::test]
async fn test_line_item_carries_catalog_metadata() {
    let api = start_api().await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let (store, sink) = open_store(&api, dir.path());
    api.set_stock(2, 10);

    store.add_product(ProductId::new(2)).await;

    let cart = store.cart();
    let item = cart.find(ProductId::new(2)).expect("line item missing");
    assert_eq!(item.name, "Tênis VR Caminhada Confortável Detalhes Couro Masculino");
    assert_eq!(item.price, Price::from_cents(13990));
    assert_eq!(item.image_url, "https://example.com/2.jpg");
    assert_eq!(item.amount.get(), 1);
    assert!(sink.is_empty());
}

// =============================================================================
// Persistence across sessions
// =============================================================================

#[tokio::test]
async fn test_cart_survives_restart() {
    let api = start_api().await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    api.set_stock(1, 5);
    api.set_stock(2, 5);

    {
        let (store, _sink) = open_store(&api, dir.path());
        store.add_product(ProductId::new(2)).await;
        store.add_product(ProductId::new(1)).await;
        store
            .update_product_amount(UpdateProductAmount {
                product_id: ProductId::new(2),
                amount: 4,
            })
            .await;
        let final_cart = store.close();
        assert_eq!(persisted(dir.path()).as_ref(), Some(final_cart.as_ref()));
    }

    let (store, _sink) = open_store(&api, dir.path());
    let cart = store.cart();
    let ids: Vec<i32> = cart.iter().map(|item| item.id.as_i32()).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(cart.amount_of(ProductId::new(2)), 4);
    assert_eq!(cart.total_quantity(), 5);
}

#[tokio::test]
async fn test_corrupt_snapshot_starts_empty() {
    let api = start_api().await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    FileStore::new(dir.path())
        .write(CART_STORAGE_KEY, "definitely not a cart")
        .expect("Failed to seed storage");

    let (store, sink) = open_store(&api, dir.path());
    assert!(store.cart().is_empty());

    api.set_stock(1, 1);
    store.add_product(ProductId::new(1)).await;
    assert_eq!(store.cart().amount_of(ProductId::new(1)), 1);
    assert!(sink.is_empty());
    assert_eq!(persisted(dir.path()).as_ref(), Some(store.cart().as_ref()));
}

// =============================================================================
// Transport failures
// =============================================================================

#[tokio::test]
async fn test_api_down_reports_errors() {
    let api = start_api().await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    api.set_stock(1, 5);
    let (store, sink) = open_store(&api, dir.path());
    store.add_product(ProductId::new(1)).await;
    sink.drain();

    api.set_mode(ApiMode::Down);
    store.add_product(ProductId::new(1)).await;
    store
        .update_product_amount(UpdateProductAmount {
            product_id: ProductId::new(1),
            amount: 2,
        })
        .await;

    assert_eq!(store.cart().amount_of(ProductId::new(1)), 1);
    assert_eq!(
        sink.drain(),
        vec![
            Notification::error("failed to add product"),
            Notification::error("failed to change product quantity"),
        ]
    );
}

#[tokio::test]
async fn test_malformed_response_reports_error() {
    let api = start_api().await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let (store, sink) = open_store(&api, dir.path());

    api.set_mode(ApiMode::Garbage);
    store.add_product(ProductId::new(1)).await;

    assert!(store.cart().is_empty());
    assert_eq!(sink.drain(), vec![Notification::error("failed to add product")]);
    assert_eq!(persisted(dir.path()), None);

    api.set_mode(ApiMode::Healthy);
    api.set_stock(1, 1);
    store.add_product(ProductId::new(1)).await;
    assert_eq!(store.cart().amount_of(ProductId::new(1)), 1);
}

#[tokio::test]
async fn test_unknown_product_reports_error() {
    let api = start_api().await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let (store, sink) = open_store(&api, dir.path());

    // In stock but missing from the catalog.
    api.set_stock(42, 3);
    store.add_product(ProductId::new(42)).await;

    // Not even a stock record.
    store.add_product(ProductId::new(43)).await;

    assert!(store.cart().is_empty());
    assert_eq!(
        sink.drain(),
        vec![
            Notification::error("failed to add product"),
            Notification::error("failed to add product"),
        ]
    );
}
