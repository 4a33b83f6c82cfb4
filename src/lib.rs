//! Competition Hub: an in-process, single-writer state store that ingests a
//! live framed websocket event stream from an upstream scoring producer and
//! exposes a synchronous query API plus an asynchronous event bus.
//!
//! Grounded on `services/server`'s `AppState` (see `DESIGN.md`): one shared
//! handle (here, [`Hub`]) created explicitly by the embedder and passed to
//! both the transport layer ([`connection`]) and query callers, rather than
//! a process-wide global.

pub mod athlete;
pub mod config;
pub mod connection;
pub mod database;
pub mod events;
pub mod fop;
mod html_entities;
pub mod hub;
pub mod precondition;
pub mod scoring;
pub mod session;
pub mod translations;
pub mod version_gate;
pub mod zip_extract;

pub use config::HubConfig;
pub use hub::{EnrichedAthlete, Hub, OrderEntryView, SessionStatusView};
