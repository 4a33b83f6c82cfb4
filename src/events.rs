// Component J: event bus + debouncer (spec §4.J).
//
// Fan-out follows the teacher's `AppState::dashboard_tx` pattern
// (`services/server/src/state.rs`): a `tokio::sync::broadcast` channel
// owned by the writer, subscribers clone a `Receiver`. A slow subscriber
// lagging past the channel capacity loses its oldest backlog rather than
// blocking the writer or being explicitly evicted — the async analogue of
// spec §4.J's "failing subscriber is removed, others still notified".

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;

const DEBOUNCE_WINDOW: Duration = Duration::from_millis(100);
const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum HubEvent {
    Database,
    Update { fop: String, ui_event: String },
    Timer { fop: String },
    Decision { fop: String },
    FlagsLoaded,
    LogosLoaded,
    PicturesLoaded,
    TranslationsLoaded,
    DatabaseReady,
    HubReady,
    SessionDone { fop: String, session_name: String },
    SessionReopened { fop: String, session_name: String },
}

impl HubEvent {
    /// Per-(FOP, event-kind) debounce key. `Update`'s kind component is the
    /// `uiEvent` string itself, not a literal `"update"` (spec §4.J).
    fn debounce_key(&self) -> (String, String) {
        match self {
            Self::Database => (String::new(), "database".to_owned()),
            Self::Update { fop, ui_event } => (fop.clone(), ui_event.clone()),
            Self::Timer { fop } => (fop.clone(), "timer".to_owned()),
            Self::Decision { fop } => (fop.clone(), "decision".to_owned()),
            Self::FlagsLoaded => (String::new(), "flags_loaded".to_owned()),
            Self::LogosLoaded => (String::new(), "logos_loaded".to_owned()),
            Self::PicturesLoaded => (String::new(), "pictures_loaded".to_owned()),
            Self::TranslationsLoaded => (String::new(), "translations_loaded".to_owned()),
            Self::DatabaseReady => (String::new(), "database_ready".to_owned()),
            Self::HubReady => (String::new(), "hub_ready".to_owned()),
            Self::SessionDone { fop, .. } => (fop.clone(), "session_done".to_owned()),
            Self::SessionReopened { fop, .. } => (fop.clone(), "session_reopened".to_owned()),
        }
    }
}

pub struct EventBus {
    sender: broadcast::Sender<HubEvent>,
    last_emitted: HashMap<(String, String), Instant>,
}

impl Default for EventBus {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender, last_emitted: HashMap::new() }
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<HubEvent> {
        self.sender.subscribe()
    }

    /// Publish, applying the 100ms per-(FOP, kind) debounce. Returns `true`
    /// if the event was actually sent, `false` if it was suppressed.
    pub fn publish(&mut self, event: HubEvent) -> bool {
        let key = event.debounce_key();
        let now = Instant::now();
        if let Some(previous) = self.last_emitted.get(&key) {
            if now.duration_since(*previous) < DEBOUNCE_WINDOW {
                return false;
            }
        }
        self.last_emitted.insert(key, now);
        // No subscribers is not an error: broadcast::send fails only then.
        let _ = self.sender.send(event);
        true
    }

    /// Publish unconditionally, bypassing the debounce window. Used for
    /// lifecycle edges that must never be coalesced (`SESSION_DONE`,
    /// `SESSION_REOPENED`, `HUB_READY`) even if they race another emission
    /// within the window.
    pub fn publish_undebounced(&mut self, event: HubEvent) {
        let key = event.debounce_key();
        self.last_emitted.insert(key, Instant::now());
        let _ = self.sender.send(event);
    }
}

#[derive(Debug)]
pub struct WaitTimedOut;

/// Await the next event matching `predicate`, bounded by `timeout`
/// (`waitForDatabase`, spec §5 "Cancellation / timeouts").
pub async fn wait_for<F>(
    mut receiver: broadcast::Receiver<HubEvent>,
    timeout: Duration,
    predicate: F,
) -> Result<HubEvent, WaitTimedOut>
where
    F: Fn(&HubEvent) -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            return Err(WaitTimedOut);
        }
        match tokio::time::timeout(remaining, receiver.recv()).await {
            Ok(Ok(event)) if predicate(&event) => return Ok(event),
            Ok(Ok(_)) => continue,
            Ok(Err(broadcast::error::RecvError::Lagged(_))) => continue,
            Ok(Err(broadcast::error::RecvError::Closed)) | Err(_) => return Err(WaitTimedOut),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_debounce_key_uses_ui_event_not_literal_update() {
        let a = HubEvent::Update { fop: "A".into(), ui_event: "LiftingOrderUpdated".into() };
        let b = HubEvent::Update { fop: "A".into(), ui_event: "SwitchGroup".into() };
        assert_ne!(a.debounce_key(), b.debounce_key());
    }

    #[test]
    fn repeated_emission_within_window_is_debounced() {
        let mut bus = EventBus::new();
        let mut rx = bus.subscribe();
        assert!(bus.publish(HubEvent::Timer { fop: "A".into() }));
        assert!(!bus.publish(HubEvent::Timer { fop: "A".into() }));
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn distinct_fops_do_not_share_a_debounce_slot() {
        let mut bus = EventBus::new();
        assert!(bus.publish(HubEvent::Timer { fop: "A".into() }));
        assert!(bus.publish(HubEvent::Timer { fop: "B".into() }));
    }

    #[tokio::test]
    async fn wait_for_resolves_on_matching_event() {
        let bus = EventBus::new();
        let rx = bus.subscribe();
        let mut bus = bus;
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            bus.publish(HubEvent::DatabaseReady);
        });
        let result = wait_for(rx, Duration::from_millis(500), |e| matches!(e, HubEvent::DatabaseReady)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn wait_for_times_out_when_nothing_arrives() {
        let bus = EventBus::new();
        let rx = bus.subscribe();
        let result = wait_for(rx, Duration::from_millis(20), |e| matches!(e, HubEvent::DatabaseReady)).await;
        assert!(result.is_err());
    }
}
