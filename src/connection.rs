// Component K: connection lifecycle (spec §4.K).
//
// Grounded on the teacher's `ws_forwarder_handler`/`handle_forwarder_socket`
// pair (`services/server/src/ws_forwarder.rs`): an axum `WebSocketUpgrade`
// route, a `tokio::select!` loop combining frame receipt with a timeout, and
// cleanup (unregister, mark offline) run unconditionally on loop exit. The
// small per-message helpers in `ws_common.rs` (`send_ws_error`,
// `recv_text_with_timeout`) are the shape for `send_response`/the read arm
// below, though this protocol carries its `updateKey` inside the frame
// payload rather than an HTTP `Authorization` header, so there is no direct
// counterpart to `auth.rs::extract_bearer` here beyond the general
// "reject before touching state" pattern.
//
// At most one producer connection is live at a time (spec §4.K). A newer
// connection supersedes an older one by bumping a shared generation counter;
// the superseded connection's own loop observes the bump through a `watch`
// channel and closes itself, rather than the new connection reaching across
// tasks to close someone else's socket.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use tokio::sync::watch;

use hub_protocol::{detect_binary_frame, BinaryFrameKind, DecodedBinaryFrame, IngestResponse, RawDatabaseBody, RawTranslationsPayload};

use crate::hub::Hub;
use crate::version_gate::meets_minimum;
use crate::zip_extract::{extract_resource_zip, extract_translations_json};

const PRODUCER_TIMEOUT: Duration = Duration::from_secs(90);

/// RFC 6455 1008 "Policy Violation" — used to close a connection on an
/// `updateKey` mismatch (spec §7 kind 3).
fn policy_violation_close() -> Message {
    Message::Close(Some(CloseFrame { code: 1008, reason: "updateKey mismatch".into() }))
}

/// RFC 6455 1000 "Normal Closure" — sent to a superseded producer connection.
fn superseded_close() -> Message {
    Message::Close(Some(CloseFrame { code: 1000, reason: "superseded by a newer producer connection".into() }))
}

#[derive(Clone)]
pub struct ConnectionState {
    pub hub: Arc<Hub>,
    generation: watch::Sender<u64>,
}

impl ConnectionState {
    #[must_use]
    pub fn new(hub: Arc<Hub>) -> Self {
        let (generation, _) = watch::channel(0);
        Self { hub, generation }
    }
}

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<ConnectionState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: ConnectionState) {
    let my_generation = supersede_predecessor(&state.generation);
    let mut generation_changes = state.generation.subscribe();
    generation_changes.borrow_and_update();

    // Only the very first producer connection gets this eager reset; later
    // reconnects rely on `on_disconnect`'s clearing plus the 428 re-send path
    // (spec §4.K "First-connection reset").
    if state.hub.take_first_connection_reset() {
        state.hub.reset_for_new_producer();
    }

    let required_key = state.hub.config_snapshot().update_key;
    let mut authenticated = false;

    let (resource_tx, mut resource_rx) = tokio::sync::mpsc::unbounded_channel();
    state.hub.register_resource_sink(resource_tx);

    loop {
        tokio::select! {
            changed = generation_changes.changed() => {
                if changed.is_err() || *generation_changes.borrow() != my_generation {
                    let _ = socket.send(superseded_close()).await;
                    tracing::info!("producer connection superseded by a newer one");
                    break;
                }
            }
            missing = resource_rx.recv() => {
                match missing {
                    Some(missing) => send_response(&mut socket, &IngestResponse::plugin_preconditions(missing)).await,
                    None => continue,
                }
            }
            received = tokio::time::timeout(PRODUCER_TIMEOUT, socket.recv()) => {
                match received {
                    Ok(Some(Ok(Message::Text(text)))) => {
                        let response = handle_text_frame(&state.hub, &text, required_key.as_deref(), &mut authenticated);
                        let unauthorized = response.status() == 401;
                        send_response(&mut socket, &response).await;
                        if unauthorized {
                            let _ = socket.send(policy_violation_close()).await;
                            break;
                        }
                    }
                    Ok(Some(Ok(Message::Binary(bytes)))) => {
                        if !authenticated {
                            tracing::warn!("dropping binary frame before any authenticated text frame");
                            continue;
                        }
                        handle_binary_frame(&state.hub, &bytes).await;
                    }
                    Ok(Some(Ok(Message::Ping(data)))) => {
                        let _ = socket.send(Message::Pong(data)).await;
                    }
                    Ok(Some(Ok(Message::Pong(_)))) => {}
                    Ok(Some(Ok(Message::Close(_)))) | Ok(None) => break,
                    Ok(Some(Err(e))) => {
                        tracing::warn!(error = %e, "websocket error");
                        break;
                    }
                    Err(_) => {
                        tracing::warn!("producer went silent past the session timeout");
                        break;
                    }
                }
            }
        }
    }

    state.hub.on_disconnect();
}

/// Bump the shared generation counter and return this connection's own
/// number. Any connection watching a stale number closes itself.
fn supersede_predecessor(generation: &watch::Sender<u64>) -> u64 {
    let next = *generation.borrow() + 1;
    let _ = generation.send(next);
    next
}

fn extract_update_key(text: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    value.get("payload")?.get("updateKey")?.as_str().map(str::to_owned)
}

fn handle_text_frame(hub: &Hub, text: &str, required_key: Option<&str>, authenticated: &mut bool) -> IngestResponse {
    if let Some(required) = required_key {
        if extract_update_key(text).as_deref() != Some(required) {
            return IngestResponse::unauthorized();
        }
    }
    *authenticated = true;
    hub.ingest_text(text)
}

async fn send_response(socket: &mut WebSocket, response: &IngestResponse) {
    match serde_json::to_string(response) {
        Ok(json) => {
            let _ = socket.send(Message::Text(json.into())).await;
        }
        Err(e) => tracing::warn!(error = %e, "failed to serialize ingest response"),
    }
}

async fn handle_binary_frame(hub: &Hub, bytes: &[u8]) {
    let frame = match detect_binary_frame(bytes) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!(error = %e, "malformed binary frame");
            return;
        }
    };

    // Legacy/ZIP-magic-fallback frames carry no version header at all and
    // are let through unchecked; a versioned frame below the minimum is
    // dropped here the same way `ingest_text` drops an under-versioned text
    // frame (spec §4.B).
    if let Some(version) = &frame.version {
        match semver::Version::parse(version) {
            Ok(parsed) if meets_minimum(&parsed) => {}
            Ok(_) => {
                tracing::warn!(%version, kind = ?frame.kind, "binary frame below minimum protocol version; dropping");
                return;
            }
            Err(e) => {
                tracing::warn!(%version, error = %e, "binary frame carried an invalid version; dropping");
                return;
            }
        }
    }

    match &frame.kind {
        BinaryFrameKind::DatabaseZip => ingest_database_zip(hub, frame).await,
        BinaryFrameKind::TranslationsZip => ingest_translations_zip(hub, frame).await,
        BinaryFrameKind::FlagsZip | BinaryFrameKind::LogosZip | BinaryFrameKind::PicturesZip => {
            extract_resource_frame(hub, frame).await
        }
        BinaryFrameKind::Unknown(name) => tracing::warn!(%name, "unknown binary frame type"),
    }
}

/// `database_zip` carries a single `competition.json` entry (spec §6).
async fn ingest_database_zip(hub: &Hub, frame: DecodedBinaryFrame) {
    if !hub.begin_database_load() {
        tracing::warn!("database_zip arrived while another load is in flight; dropping");
        return;
    }
    let extracted = tokio::task::spawn_blocking(move || extract_single_json_entry(&frame.payload, "competition.json")).await;
    hub.end_database_load();

    let bytes = match extracted {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "failed to extract database_zip");
            return;
        }
        Err(e) => {
            tracing::warn!(error = %e, "database_zip extraction task panicked");
            return;
        }
    };
    match serde_json::from_slice::<RawDatabaseBody>(&bytes) {
        Ok(body) => {
            hub.commit_database_from_zip(body);
        }
        Err(e) => tracing::warn!(error = %e, "database_zip payload did not match the expected shape"),
    }
}

async fn ingest_translations_zip(hub: &Hub, frame: DecodedBinaryFrame) {
    let extracted = tokio::task::spawn_blocking(move || extract_translations_json(&frame.payload)).await;
    let bytes = match extracted {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "failed to extract translations_zip");
            return;
        }
        Err(e) => {
            tracing::warn!(error = %e, "translations_zip extraction task panicked");
            return;
        }
    };
    match serde_json::from_slice::<RawTranslationsPayload>(&bytes) {
        Ok(payload) => {
            hub.ingest_translations(payload);
        }
        Err(e) => tracing::warn!(error = %e, "translations_zip payload did not match the expected shape"),
    }
}

/// `flags_zip`/`logos_zip`/`pictures_zip` extract onto disk under the
/// configured local files directory, then flip the corresponding readiness
/// flag (spec §4.C).
async fn extract_resource_frame(hub: &Hub, frame: DecodedBinaryFrame) {
    let Some(subdir) = frame.kind.resource_subdir() else {
        return;
    };
    let dest_dir = hub.get_local_files_dir().join(subdir);
    let kind = frame.kind.clone();
    let result = tokio::task::spawn_blocking(move || {
        std::fs::create_dir_all(&dest_dir)?;
        extract_resource_zip(&frame.payload, &dest_dir).map_err(std::io::Error::other)
    })
    .await;

    match result {
        Ok(Ok(extracted)) => {
            if !extracted.skipped_unsafe.is_empty() {
                tracing::warn!(count = extracted.skipped_unsafe.len(), "skipped unsafe ZIP entries");
            }
            hub.mark_resource_ready(&kind);
        }
        Ok(Err(e)) => tracing::warn!(error = %e, ?kind, "failed to extract resource archive"),
        Err(e) => tracing::warn!(error = %e, "resource extraction task panicked"),
    }
}

fn extract_single_json_entry(bytes: &[u8], entry_name: &str) -> Result<Vec<u8>, crate::zip_extract::ZipExtractError> {
    use std::io::Read;
    let reader = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(reader).map_err(|_| crate::zip_extract::ZipExtractError::Malformed)?;
    let mut entry = archive
        .by_name(entry_name)
        .map_err(|_| crate::zip_extract::ZipExtractError::Malformed)?;
    let mut buf = Vec::new();
    entry
        .read_to_end(&mut buf)
        .map_err(crate::zip_extract::ZipExtractError::Io)?;
    Ok(buf)
}
