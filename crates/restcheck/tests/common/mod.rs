//! Common test utilities: an in-memory items server standing in for the
//! remote resource, so end-to-end scenarios run against a real socket
//! without an external dependency.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

/// Shared in-memory item storage.
#[derive(Clone, Default)]
pub struct ItemsStore {
    inner: Arc<Mutex<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    next_id: u64,
    items: HashMap<u64, Value>,
}

impl ItemsStore {
    /// Inserts an item under a fixed id, for pinned-state tests.
    pub fn seed(&self, id: u64, mut item: Value) {
        let mut inner = self.inner.lock().unwrap();
        item["id"] = json!(id);
        inner.items.insert(id, item);
        inner.next_id = inner.next_id.max(id);
    }
}

/// A running stub items server.
pub struct ItemsServer {
    /// Base URL of the server, e.g. `http://127.0.0.1:49205`.
    pub base_url: String,

    /// Handle to the backing store for seeding.
    pub store: ItemsStore,
}

impl ItemsServer {
    /// Binds an ephemeral port and serves the items resource on it.
    pub async fn spawn() -> anyhow::Result<Self> {
        let store = ItemsStore::default();

        let app = Router::new()
            .route("/items", post(create_item))
            .route(
                "/items/{id}",
                get(read_item).put(update_item).delete(delete_item),
            )
            .route("/slow/items/{id}", get(slow_read))
            .route("/garbage/items/{id}", get(garbage_read))
            .with_state(store.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server died");
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            store,
        })
    }
}

async fn create_item(
    State(store): State<ItemsStore>,
    Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut inner = store.inner.lock().unwrap();
    inner.next_id += 1;
    let id = inner.next_id;
    body["id"] = json!(id);
    inner.items.insert(id, body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn read_item(
    State(store): State<ItemsStore>,
    Path(id): Path<u64>,
) -> (StatusCode, Json<Value>) {
    let inner = store.inner.lock().unwrap();
    match inner.items.get(&id) {
        Some(item) => (StatusCode::OK, Json(item.clone())),
        None => not_found(id),
    }
}

async fn update_item(
    State(store): State<ItemsStore>,
    Path(id): Path<u64>,
    Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut inner = store.inner.lock().unwrap();
    if !inner.items.contains_key(&id) {
        return not_found(id);
    }
    body["id"] = json!(id);
    inner.items.insert(id, body.clone());
    (StatusCode::OK, Json(body))
}

async fn delete_item(
    State(store): State<ItemsStore>,
    Path(id): Path<u64>,
) -> (StatusCode, Json<Value>) {
    let mut inner = store.inner.lock().unwrap();
    match inner.items.remove(&id) {
        Some(_) => (StatusCode::OK, Json(json!({"status": "deleted"}))),
        None => not_found(id),
    }
}

/// Responds only after a delay well past any sub-second client timeout.
async fn slow_read(Path(_id): Path<u64>) -> (StatusCode, Json<Value>) {
    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
    (StatusCode::OK, Json(json!({})))
}

/// Answers 200 with a body that is not JSON.
async fn garbage_read(Path(_id): Path<u64>) -> (StatusCode, String) {
    (StatusCode::OK, "<html>502 from an upstream proxy</html>".to_string())
}

fn not_found(id: u64) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": format!("no item with id {id}")})),
    )
}
