#![allow(dead_code)]

use std::sync::Arc;

use item_manager::prelude::*;
use serde_json::{json, Value};
use wiremock::MockServer;

pub struct Harness {
    pub manager: ItemManager,
    pub notifier: Arc<RecordingNotifier>,
    pub history: Arc<History>,
}

/// A manager pointed at the mock server; `confirm` answers every prompt.
pub fn setup(server: &MockServer, confirm: bool) -> Harness {
    let notifier = Arc::new(RecordingNotifier::new());
    let history = Arc::new(History::new());
    let options = ClientOptions::default().with_base_url(&server.uri());

    let manager = ItemManager::new(
        options,
        notifier.clone(),
        history.clone(),
        Arc::new(move |_: &str| confirm),
    )
    .unwrap();

    Harness {
        manager,
        notifier,
        history,
    }
}

pub fn item_json(id: i64, name: &str, price: f64) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "furniture",
        "category": "office",
        "price": price
    })
}

/// Query strings of every request the server has seen, in order.
pub async fn queries(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.query().unwrap_or("").to_string())
        .collect()
}

pub async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map(|r| r.len()).unwrap_or(0)
}
