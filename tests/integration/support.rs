// Shared scaffolding for the integration suite: spin up a real hub router
// (not a mock) and connect a `MockWsClient` to it, the way the teacher's
// forwarder integration tests stand up `MockWsServer` and connect a client —
// here the roles are reversed, since the hub itself is the thing under test.

use std::sync::Arc;

use competition_hub::connection::{ws_handler, ConnectionState};
use competition_hub::{Hub, HubConfig};
use hub_test_utils::MockWsClient;

pub struct RunningHub {
    pub hub: Arc<Hub>,
    pub url: String,
    _server: tokio::task::JoinHandle<()>,
}

impl RunningHub {
    pub async fn start(config: HubConfig) -> Self {
        let hub = Arc::new(Hub::new(config));
        let state = ConnectionState::new(Arc::clone(&hub));
        let router = axum::Router::new().route("/ws", axum::routing::get(ws_handler)).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { hub, url: format!("ws://{addr}/ws"), _server: server }
    }

    pub async fn connect(&self) -> MockWsClient {
        MockWsClient::connect(&self.url).await.unwrap()
    }
}

pub fn envelope(version: &str, kind: &str, payload: serde_json::Value) -> serde_json::Value {
    serde_json::json!({"version": version, "type": kind, "payload": payload})
}

pub fn sample_database(checksum: &str) -> serde_json::Value {
    serde_json::json!({
        "competition": {"fops": ["A"]},
        "athletes": [{"key":"1","firstName":"Jo","lastName":"Doe","team":10,"categoryCode":"SR_M89"}],
        "teams": [{"id":10,"name":"USA"}],
        "ageGroups": [{"code":"SR","categories":[{"gender":"M","maximumWeight":89,"categoryName":"M89 Senior"}]}],
        "databaseChecksum": checksum,
    })
}

pub fn sample_translations() -> serde_json::Value {
    serde_json::json!({"en": {"Snatch": "Snatch"}})
}

/// Builds an in-memory ZIP with the given `(entry_name, contents)` pairs.
pub fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    use std::io::Write;

    let mut buf = Vec::new();
    {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
        let options: zip::write::FileOptions<()> = zip::write::FileOptions::default();
        for (name, contents) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents).unwrap();
        }
        writer.finish().unwrap();
    }
    buf
}
