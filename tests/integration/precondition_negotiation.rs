// Precondition negotiation over the real transport: 428 on first missing
// precondition, debounced 202 on an immediate repeat, and the
// `requestResources`/`plugin_preconditions` one-way-injection path (spec §8
// scenario S6).

#[path = "support.rs"]
mod support;

use competition_hub::HubConfig;
use support::{envelope, RunningHub};

#[tokio::test]
async fn lone_update_before_database_returns_428_then_debounces() {
    let hub = RunningHub::start(HubConfig::default()).await;
    let mut client = hub.connect().await;

    client
        .send_json(&envelope("64.0.0", "update", serde_json::json!({"fop": "A", "uiEvent": "LiftingOrderUpdated"})))
        .await
        .unwrap();
    let first = client.recv_json().await.unwrap();
    assert_eq!(first["status"], 428);
    assert_eq!(first["missing"], serde_json::json!(["database", "translations_zip"]));

    client
        .send_json(&envelope("64.0.0", "update", serde_json::json!({"fop": "A", "uiEvent": "LiftingOrderUpdated"})))
        .await
        .unwrap();
    let second = client.recv_json().await.unwrap();
    assert_eq!(second["status"], 202);
    assert_eq!(second["reason"], "waiting_for_database");

    assert!(!hub.hub.is_ready());
}

#[tokio::test]
async fn request_plugin_preconditions_is_a_no_op_without_a_connection() {
    let hub = RunningHub::start(HubConfig::default()).await;
    let missing = hub.hub.request_plugin_preconditions(&["flags_zip".to_owned()]);
    assert_eq!(missing, vec!["flags_zip".to_owned()]);
}

#[tokio::test]
async fn request_plugin_preconditions_sends_a_frame_over_an_active_connection() {
    let hub = RunningHub::start(HubConfig::default()).await;
    let mut client = hub.connect().await;

    // Give the accepted socket a moment to register its resource sink.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let missing = hub.hub.request_plugin_preconditions(&["flags_zip".to_owned()]);
    assert_eq!(missing, vec!["flags_zip".to_owned()]);

    let reply = client.recv_json().await.unwrap();
    assert_eq!(reply["status"], 428);
    assert_eq!(reply["reason"], "plugin_preconditions");
    assert_eq!(reply["missing"], serde_json::json!(["flags_zip"]));
}
