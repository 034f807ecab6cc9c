use std::sync::{Arc, Mutex};

use axum::Router;

/// Request bodies received by a fake PSI endpoint, keyed by operation.
pub type Captured = Arc<Mutex<Vec<(String, serde_json::Value)>>>;

/// Serve `app` on an ephemeral localhost port and return the PWA base URL
/// (`http://127.0.0.1:<port>/pwa/`).
pub async fn spawn_fake_pwa(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/pwa/")
}

/// A base URL on a port nobody is listening on.
pub async fn unreachable_pwa() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/pwa/")
}

/// Load a recorded request fixture from `tests/fixtures`.
pub fn fixture(name: &str) -> serde_json::Value {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    let text = std::fs::read_to_string(&path).unwrap();
    serde_json::from_str(&text).unwrap()
}
