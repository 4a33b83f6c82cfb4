// Dev binary: wires a `Hub` to a bare axum router exposing the producer
// websocket route. Grounded on `services/server/src/main.rs` (env-driven
// config, `tracing_subscriber` init, `axum::serve` with graceful shutdown);
// everything HTTP-API-shaped in that file (streams, races, admin tokens) has
// no counterpart here, so the router below carries only the one route this
// crate actually serves plus a health check.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use competition_hub::connection::{ws_handler, ConnectionState};
use competition_hub::{Hub, HubConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());
    tracing_subscriber::fmt().with_env_filter(EnvFilter::new(log_level)).init();

    let config = HubConfig {
        local_files_dir: env::var("LOCAL_FILES_DIR").map(PathBuf::from).unwrap_or_else(|_| {
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("local")
        }),
        local_url_prefix: env::var("LOCAL_URL_PREFIX").unwrap_or_else(|_| "/local".to_owned()),
        update_key: env::var("UPDATE_KEY").ok(),
    };
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());

    let hub = Arc::new(Hub::new(config));
    let state = ConnectionState::new(hub);

    let router = Router::new()
        .route("/ws/v1/producer", get(ws_handler))
        .route("/healthz", get(healthz))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await.expect("failed to bind");
    info!(addr = %bind_addr, "hub listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
    info!("hub shut down gracefully");
}

async fn healthz() -> &'static str {
    "ok"
}

/// Waits for SIGTERM or Ctrl-C (SIGINT) and returns to trigger graceful shutdown.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { info!("received Ctrl+C, shutting down"); },
        _ = terminate => { info!("received SIGTERM, shutting down"); },
    }
}
