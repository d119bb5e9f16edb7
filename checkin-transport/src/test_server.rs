use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde_json::Value;
use tokio::{net::TcpListener, sync::Mutex};

use crate::server::MESSAGES_PATH;

/// In-memory stand-in for the message service
#[derive(Clone, Default)]
pub struct MessageStore {
    messages: Arc<Mutex<Vec<Value>>>,
    received: Arc<Mutex<Vec<Value>>>,
}

impl MessageStore {
    pub fn with(messages: Value) -> Self {
        let messages = match messages {
            Value::Array(list) => list,
            other => vec![other],
        };
        Self {
            messages: Arc::new(Mutex::new(messages)),
            received: Arc::default(),
        }
    }

    /// Raw bodies of every POST so far
    pub async fn received(&self) -> Vec<Value> {
        self.received.lock().await.clone()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(MESSAGES_PATH, get(list).post(create))
            .with_state(self.clone())
    }
}

async fn list(State(store): State<MessageStore>) -> Json<Value> {
    Json(Value::Array(store.messages.lock().await.clone()))
}

async fn create(State(store): State<MessageStore>, Json(body): Json<Value>) -> Json<Value> {
    store.received.lock().await.push(body.clone());
    let mut messages = store.messages.lock().await;
    let mut stored = body;
    stored["_id"] = Value::String((messages.len() + 1).to_string());
    messages.push(stored.clone());
    Json(stored)
}

/// Serve `router` on an ephemeral port, returns the base URL
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server failed");
    });
    format!("http://{addr}")
}

/// A server that answers everything with `status`
pub async fn serve_status(status: StatusCode) -> String {
    serve(Router::new().fallback(move || async move { status })).await
}

/// A base URL nothing is listening on
pub async fn unreachable() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    drop(listener);
    format!("http://{addr}")
}
