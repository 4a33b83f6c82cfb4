// Session-done/reopened edges over the real transport, for both `Update`
// and non-`Update` frame kinds (spec §8 scenario S4; the underlying
// `ingest_fop_frame` dispatch was unified across frame kinds so a `Timer`
// frame reopens a session just as an `Update` frame does).

#[path = "support.rs"]
mod support;

use competition_hub::events::HubEvent;
use competition_hub::HubConfig;
use support::{envelope, RunningHub};

#[tokio::test]
async fn group_done_then_timer_activity_reopens_the_session() {
    let hub = RunningHub::start(HubConfig::default()).await;
    let mut client = hub.connect().await;
    let mut events = hub.hub.subscribe();

    client
        .send_json(&envelope(
            "64.0.0",
            "update",
            serde_json::json!({"fop": "A", "uiEvent": "GroupDone", "breakType": "GROUP_DONE"}),
        ))
        .await
        .unwrap();
    let reply = client.recv_json().await.unwrap();
    assert_eq!(reply["status"], 428);
    assert!(hub.hub.is_session_done("A"));

    client
        .send_json(&envelope("64.0.0", "timer", serde_json::json!({"fop": "A", "athleteTimerEventType": "StartTime"})))
        .await
        .unwrap();
    let reply = client.recv_json().await.unwrap();
    assert_eq!(reply["status"], 428);
    assert!(!hub.hub.is_session_done("A"));

    let mut saw_done = false;
    let mut saw_reopened = false;
    while let Ok(event) = events.try_recv() {
        match event {
            HubEvent::SessionDone { fop, .. } if fop == "A" => saw_done = true,
            HubEvent::SessionReopened { fop, .. } if fop == "A" => saw_reopened = true,
            _ => {}
        }
    }
    assert!(saw_done, "expected a SessionDone event on the bus");
    assert!(saw_reopened, "expected a SessionReopened event on the bus");
}

#[tokio::test]
async fn decision_frame_after_group_done_also_reopens_the_session() {
    let hub = RunningHub::start(HubConfig::default()).await;
    let mut client = hub.connect().await;
    let mut events = hub.hub.subscribe();

    client
        .send_json(&envelope(
            "64.0.0",
            "update",
            serde_json::json!({"fop": "B", "uiEvent": "GroupDone", "breakType": "GROUP_DONE"}),
        ))
        .await
        .unwrap();
    client.recv_json().await.unwrap();
    assert!(hub.hub.is_session_done("B"));

    client
        .send_json(&envelope("64.0.0", "decision", serde_json::json!({"fop": "B", "decision": true})))
        .await
        .unwrap();
    client.recv_json().await.unwrap();
    assert!(!hub.hub.is_session_done("B"));

    let mut saw_reopened = false;
    while let Ok(event) = events.try_recv() {
        if matches!(event, HubEvent::SessionReopened { fop, .. } if fop == "B") {
            saw_reopened = true;
        }
    }
    assert!(saw_reopened, "a Decision frame after GroupDone should reopen the session");
}
