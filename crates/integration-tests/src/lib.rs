//! Integration tests for RocketShoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! Tests start an in-process fake of the stock/product API ([`FakeApi`]) on
//! an ephemeral port and drive the real HTTP client against it, so no
//! external services are needed.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

/// How the fake API answers requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMode {
    /// Serve configured stock and products.
    Healthy,
    /// Answer every request with 500.
    Down,
    /// Answer every request with 200 and a body that is not JSON.
    Garbage,
}

#[derive(Clone, Default)]
struct FakeState {
    stock: Arc<Mutex<HashMap<i32, i64>>>,
    products: Arc<Mutex<HashMap<i32, Value>>>,
    down: Arc<AtomicBool>,
    garbage: Arc<AtomicBool>,
}

impl FakeState {
    fn failure(&self) -> Option<Response> {
        if self.down.load(Ordering::SeqCst) {
            return Some((StatusCode::INTERNAL_SERVER_ERROR, "service unavailable").into_response());
        }
        if self.garbage.load(Ordering::SeqCst) {
            return Some((StatusCode::OK, "<html>oops</html>").into_response());
        }
        None
    }
}

/// A fake stock/product API served over HTTP.
///
/// The server task is aborted when the value is dropped.
pub struct FakeApi {
    base_url: Url,
    state: FakeState,
    handle: JoinHandle<()>,
}

impl FakeApi {
    /// Start the fake API on an ephemeral local port.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = FakeState::default();
        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let base_url = Url::parse(&format!("http://{addr}/")).map_err(std::io::Error::other)?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url,
            state,
            handle,
        })
    }

    /// Base URL of the fake API.
    #[must_use]
    pub fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    /// Set the available stock for a product.
    pub fn set_stock(&self, id: i32, amount: i64) {
        self.state
            .stock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, amount);
    }

    /// Register a product in the catalog.
    pub fn add_product(&self, id: i32, title: &str, price: f64) {
        let body = json!({
            "id": id,
            "title": title,
            "price": price,
            "image": format!("https://example.com/{id}.jpg"),
        });
        self.state
            .products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, body);
    }

    /// Change how the API answers.
    pub fn set_mode(&self, mode: ApiMode) {
        self.state.down.store(mode == ApiMode::Down, Ordering::SeqCst);
        self.state
            .garbage
            .store(mode == ApiMode::Garbage, Ordering::SeqCst);
    }
}

impl Drop for FakeApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn stock(State(state): State<FakeState>, Path(id): Path<i32>) -> Response {
    if let Some(response) = state.failure() {
        return response;
    }
    let amount = state
        .stock
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .copied();
    match amount {
        Some(amount) => Json(json!({ "id": id, "amount": amount })).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn product(State(state): State<FakeState>, Path(id): Path<i32>) -> Response {
    if let Some(response) = state.failure() {
        return response;
    }
    let body = state
        .products
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .cloned();
    match body {
        Some(body) => Json(body).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
