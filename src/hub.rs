// The Hub: central single-writer state store and public query API
// (spec §4.L, §5, §9 "Global singleton hub" re-architecture note).
//
// One `Hub` per embedding process, created explicitly and handed to the
// transport layer and to query callers — the re-architecture note's
// "explicit handle instead of a process-wide variable". All mutable state
// sits behind one `std::sync::Mutex<HubInner>`: frame handling is CPU-bound
// and short, so a plain blocking mutex is simpler than per-field `RwLock`s
// and still satisfies §5's "serialize via a mutex held for the duration of
// frame handling" option.

use crate::athlete::{Athlete, LiftStatus};
use crate::config::HubConfig;
use crate::database::{assemble_database, Category, DatabaseSnapshot};
use crate::events::{EventBus, HubEvent};
use crate::fop::{FopSnapshot, FrameKind, OrderEntry, ResolvedEntry, SpacerKind};
use crate::precondition::{NegotiationOutcome, PreconditionNegotiator, ResourceReadiness};
use crate::session::{SessionEdge, SessionStatus};
use crate::translations::TranslationStore;
use crate::version_gate::meets_minimum;
use hub_log::{default_logger, Logger};
use hub_protocol::envelope::EnvelopeParseError;
use hub_protocol::{
    BinaryFrameKind, IngestResponse, RawDatabasePayload, RawTranslationsPayload, TextEnvelope, VersionError,
};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

struct HubInner {
    config: HubConfig,
    database: Option<DatabaseSnapshot>,
    fops: HashMap<String, FopSnapshot>,
    sessions: HashMap<String, SessionStatus>,
    confirmed_fops: Vec<String>,
    translations: TranslationStore,
    readiness: ResourceReadiness,
    events: EventBus,
    precondition: PreconditionNegotiator,
    logger: Arc<dyn Logger>,
    database_loading: bool,
    pending_database_since: Option<Instant>,
    hub_ready_emitted: bool,
    category_map_cache: Option<(String, HashMap<String, Category>)>,
    resource_sink: Option<tokio::sync::mpsc::UnboundedSender<Vec<String>>>,
}

impl HubInner {
    fn is_ready(&self) -> bool {
        self.database.as_ref().is_some_and(|d| !d.athletes.is_empty()) && !self.translations.is_empty()
    }

    fn fop_mut(&mut self, name: &str) -> &mut FopSnapshot {
        self.fops.entry(name.to_owned()).or_insert_with(|| FopSnapshot::new(name.to_owned()))
    }

    fn session_mut(&mut self, name: &str) -> &mut SessionStatus {
        self.sessions.entry(name.to_owned()).or_default()
    }

    fn teams_and_categories(&self) -> (HashMap<i64, crate::database::Team>, HashMap<String, Category>) {
        self.database
            .as_ref()
            .map(|d| (d.teams_by_id.clone(), d.category_by_computed_code.clone()))
            .unwrap_or_default()
    }

    fn maybe_emit_hub_ready(&mut self) {
        if self.is_ready() && !self.hub_ready_emitted {
            self.hub_ready_emitted = true;
            self.events.publish_undebounced(HubEvent::HubReady);
        }
        if !self.is_ready() {
            self.hub_ready_emitted = false;
        }
    }
}

pub struct Hub {
    inner: Mutex<HubInner>,
    first_connection_reset_done: AtomicBool,
}

impl Default for Hub {
    fn default() -> Self {
        Self::new(HubConfig::default())
    }
}

impl Hub {
    #[must_use]
    pub fn new(config: HubConfig) -> Self {
        Self {
            inner: Mutex::new(HubInner {
                config,
                database: None,
                fops: HashMap::new(),
                sessions: HashMap::new(),
                confirmed_fops: Vec::new(),
                translations: TranslationStore::new(),
                readiness: ResourceReadiness::default(),
                events: EventBus::new(),
                precondition: PreconditionNegotiator::new(),
                logger: default_logger(),
                database_loading: false,
                pending_database_since: None,
                hub_ready_emitted: false,
                category_map_cache: None,
                resource_sink: None,
            }),
            first_connection_reset_done: AtomicBool::new(false),
        }
    }

    pub fn set_logger(&self, logger: Arc<dyn Logger>) {
        self.inner.lock().unwrap().logger = logger;
    }

    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<HubEvent> {
        self.inner.lock().unwrap().events.subscribe()
    }

    /// `waitForDatabase(timeoutMs)` (spec §5).
    pub async fn wait_for_database(&self, timeout: Duration) -> Result<(), String> {
        if self.is_ready() {
            return Ok(());
        }
        let receiver = self.subscribe();
        crate::events::wait_for(receiver, timeout, |e| matches!(e, HubEvent::DatabaseReady))
            .await
            .map(|_| ())
            .map_err(|_| format!("database not ready after {}ms", timeout.as_millis()))
    }

    // ---- Connection lifecycle hooks (component K calls these) ----

    /// Returns `true` exactly once per process lifetime: the caller should
    /// perform the first-connection reset only when this returns `true`.
    pub fn take_first_connection_reset(&self) -> bool {
        self.first_connection_reset_done.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_ok()
    }

    /// Null out database/translations/readiness (spec §4.K "First-connection reset").
    pub fn reset_for_new_producer(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.database = None;
        inner.translations = TranslationStore::new();
        inner.readiness = ResourceReadiness::default();
        inner.hub_ready_emitted = false;
        inner.pending_database_since = None;
        inner.database_loading = false;
    }

    /// Transition to "waiting" on producer disconnect (spec §4.K).
    pub fn on_disconnect(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.database = None;
        inner.translations = TranslationStore::new();
        inner.readiness = ResourceReadiness::default();
        inner.hub_ready_emitted = false;
        inner.resource_sink = None;
        inner.logger.info("producer disconnected; hub entering waiting state");
    }

    // ---- Ingest entry points ----

    /// Ingest one UTF-8 text frame (spec §4.A/§4.E/§4.G/§4.H/§4.I).
    pub fn ingest_text(&self, text: &str) -> IngestResponse {
        let envelope = match TextEnvelope::parse(text) {
            Ok(e) => e,
            Err(EnvelopeParseError::Version(reason)) => {
                let received = match &reason {
                    VersionError::Missing => String::new(),
                    VersionError::Invalid(s) => s.clone(),
                };
                return IngestResponse::malformed_version(received, reason.to_string());
            }
            Err(other) => return IngestResponse::internal_error("malformed envelope", other.to_string()),
        };
        // `TextEnvelope::parse` already validated `version` as well-formed semver.
        let version = envelope.parsed_version().expect("envelope version already validated");
        if !meets_minimum(&version) {
            return IngestResponse::version_rejected(envelope.version.as_str(), "protocol version below minimum");
        }

        match envelope.kind.as_str() {
            "database" => self.ingest_database_text(&envelope.payload),
            "update" => self.ingest_fop_frame(FrameKind::Update, &envelope.payload),
            "timer" => self.ingest_fop_frame(FrameKind::Timer, &envelope.payload),
            "decision" => self.ingest_fop_frame(FrameKind::Decision, &envelope.payload),
            other => {
                self.inner.lock().unwrap().logger.warn(&format!("unknown text frame type: {other}"));
                IngestResponse::ok(other)
            }
        }
    }

    fn ingest_database_text(&self, payload: &serde_json::Value) -> IngestResponse {
        let raw: RawDatabasePayload = match serde_json::from_value(payload.clone()) {
            Ok(v) => v,
            Err(e) => return IngestResponse::internal_error("malformed database payload", e.to_string()),
        };
        let body = raw.flattened();

        if body.athletes.is_empty() && body.teams.is_empty() {
            // Spec §6: an empty `database` text frame is a precursor to a
            // `database_zip` binary frame expected within 5s.
            let mut inner = self.inner.lock().unwrap();
            inner.pending_database_since = Some(Instant::now());
            return IngestResponse::awaiting_database_zip();
        }

        self.commit_database(body)
    }

    fn commit_database(&self, body: hub_protocol::RawDatabaseBody) -> IngestResponse {
        let mut inner = self.inner.lock().unwrap();
        if inner.database_loading {
            return IngestResponse::already_loading();
        }
        if let Some(checksum) = &body.database_checksum {
            if inner.database.as_ref().map(|d| &d.database_checksum) == Some(checksum) {
                return IngestResponse::duplicate_checksum();
            }
        }

        inner.database_loading = true;
        let snapshot = assemble_database(body);
        if inner.database.as_ref().map(|d| &d.database_checksum) == Some(&snapshot.database_checksum) {
            inner.database_loading = false;
            return IngestResponse::duplicate_checksum();
        }
        inner.database = Some(snapshot);
        inner.pending_database_since = None;
        inner.category_map_cache = None;
        for fop in inner.fops.values_mut() {
            fop.version += 1;
        }
        inner.events.publish_undebounced(HubEvent::Database);
        inner.events.publish_undebounced(HubEvent::DatabaseReady);
        inner.maybe_emit_hub_ready();
        inner.database_loading = false;
        IngestResponse::ok("database")
    }

    fn ingest_fop_frame(&self, kind: FrameKind, payload: &serde_json::Value) -> IngestResponse {
        let Some(obj) = payload.as_object() else {
            return IngestResponse::internal_error("malformed frame payload", "not a JSON object");
        };
        let fop_name = obj
            .get("fop")
            .or_else(|| obj.get("fopName"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or("A")
            .to_owned();

        let mut inner = self.inner.lock().unwrap();
        if !inner.confirmed_fops.contains(&fop_name) {
            inner.confirmed_fops.push(fop_name.clone());
        }
        let (teams_by_id, category_by_code) = inner.teams_and_categories();
        inner.fop_mut(&fop_name).merge(kind, obj.clone(), &teams_by_id, &category_by_code);

        if kind == FrameKind::Update {
            let session_athletes = inner.fop_mut(&fop_name).session_athletes.clone();
            if let Some(database) = inner.database.as_mut() {
                database.upsert_athletes(&session_athletes);
            }
        }

        let event = match kind {
            FrameKind::Update => {
                let ui_event = obj.get("uiEvent").and_then(serde_json::Value::as_str).unwrap_or("").to_owned();
                HubEvent::Update { fop: fop_name.clone(), ui_event }
            }
            FrameKind::Timer => HubEvent::Timer { fop: fop_name.clone() },
            FrameKind::Decision => HubEvent::Decision { fop: fop_name.clone() },
        };
        inner.events.publish(event);

        let edge = if kind == FrameKind::Update {
            let ui_event = obj.get("uiEvent").and_then(serde_json::Value::as_str);
            let break_type = obj.get("breakType").and_then(serde_json::Value::as_str);
            let session_name = obj.get("sessionName").and_then(serde_json::Value::as_str).unwrap_or("");
            inner.session_mut(&fop_name).apply_update(ui_event, break_type, session_name)
        } else {
            inner.session_mut(&fop_name).apply_activity()
        };
        if edge != SessionEdge::None {
            let session_name = inner.sessions.get(&fop_name).map(|s| s.session_name.clone()).unwrap_or_default();
            match edge {
                SessionEdge::Done => inner
                    .events
                    .publish_undebounced(HubEvent::SessionDone { fop: fop_name.clone(), session_name }),
                SessionEdge::Reopened => inner
                    .events
                    .publish_undebounced(HubEvent::SessionReopened { fop: fop_name.clone(), session_name }),
                SessionEdge::None => unreachable!(),
            }
        }

        let has_athletes = inner.database.as_ref().is_some_and(|d| !d.athletes.is_empty());
        let has_translations = !inner.translations.is_empty();
        match inner.precondition.negotiate(has_athletes, has_translations) {
            NegotiationOutcome::Proceed => IngestResponse::ok(frame_kind_label(kind)),
            NegotiationOutcome::WaitingForDatabase => IngestResponse::waiting_for_database(),
            NegotiationOutcome::PreconditionRequired(missing) => IngestResponse::precondition_required(missing),
        }
    }

    // ---- Binary ingest ----

    /// `begin_database_load`/`end_database_load` bracket an async ZIP
    /// extraction so a concurrent `database`/`database_zip` frame is told
    /// `already_loading` instead of racing the in-flight one (spec §7.5).
    #[must_use]
    pub fn begin_database_load(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.database_loading {
            return false;
        }
        inner.database_loading = true;
        true
    }

    pub fn end_database_load(&self) {
        self.inner.lock().unwrap().database_loading = false;
    }

    pub fn commit_database_from_zip(&self, body: hub_protocol::RawDatabaseBody) -> IngestResponse {
        self.commit_database(body)
    }

    pub fn mark_resource_ready(&self, kind: &BinaryFrameKind) {
        let mut inner = self.inner.lock().unwrap();
        let event = match kind {
            BinaryFrameKind::FlagsZip => {
                inner.readiness.flags = true;
                HubEvent::FlagsLoaded
            }
            BinaryFrameKind::LogosZip => {
                inner.readiness.logos = true;
                HubEvent::LogosLoaded
            }
            BinaryFrameKind::PicturesZip => {
                inner.readiness.pictures = true;
                HubEvent::PicturesLoaded
            }
            _ => return,
        };
        inner.events.publish_undebounced(event);
    }

    /// Merge translations parsed from a `translations_zip` payload (spec §4.C).
    pub fn ingest_translations(&self, payload: RawTranslationsPayload) -> IngestResponse {
        let (locales, checksum) = match payload {
            RawTranslationsPayload::Wrapper { locales, translations_checksum } => (locales, translations_checksum),
            RawTranslationsPayload::Direct(locales) => (locales, None),
        };

        let mut inner = self.inner.lock().unwrap();
        if let Some(checksum) = &checksum {
            if inner.translations.checksum() == Some(checksum.as_str()) {
                return IngestResponse::duplicate_checksum();
            }
        }
        for (locale, map) in &locales {
            let converted: HashMap<String, String> = map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            inner.translations.merge_locale(locale, &converted);
        }
        inner.translations.set_checksum(checksum);
        inner.events.publish_undebounced(HubEvent::TranslationsLoaded);
        inner.maybe_emit_hub_ready();
        IngestResponse::ok("translations_zip")
    }

    // ---- requestResources / requestPluginPreconditions (spec §4.K, §9) ----

    /// One-way dependency injection (spec §9): the transport layer registers
    /// a channel here instead of the hub holding a connection handle
    /// directly. `request_plugin_preconditions` sends the missing list down
    /// this channel when a producer is connected; the transport layer reads
    /// it and writes the actual `plugin_preconditions` response frame.
    pub fn register_resource_sink(&self, sink: tokio::sync::mpsc::UnboundedSender<Vec<String>>) {
        self.inner.lock().unwrap().resource_sink = Some(sink);
    }

    pub fn clear_resource_sink(&self) {
        self.inner.lock().unwrap().resource_sink = None;
    }

    /// Compute the missing subset of an on-demand resource list and, if a
    /// producer connection is registered, forward it for delivery as a
    /// `plugin_preconditions` response. Without an active connection this is
    /// a no-op log (spec §8 scenario S6).
    #[must_use]
    pub fn request_plugin_preconditions(&self, requested: &[String]) -> Vec<String> {
        let mut inner = self.inner.lock().unwrap();
        let missing = PreconditionNegotiator::plugin_preconditions(&inner.readiness, requested);
        if missing.is_empty() {
            return missing;
        }
        match &inner.resource_sink {
            Some(sink) => {
                let _ = sink.send(missing.clone());
            }
            None => inner.logger.info("requestResources called with no active producer connection; no-op"),
        }
        missing
    }

    // ---- Public Query API (spec §4.L) ----

    #[must_use]
    pub fn get_database_state(&self) -> Option<DatabaseSnapshot> {
        self.inner.lock().unwrap().database.clone()
    }

    #[must_use]
    pub fn get_fop_update(&self, fop_name: &str) -> Option<FopSnapshot> {
        self.inner.lock().unwrap().fops.get(fop_name).cloned()
    }

    #[must_use]
    pub fn get_session_athletes(&self, fop_name: &str) -> Vec<Athlete> {
        self.inner.lock().unwrap().fops.get(fop_name).map(|f| f.session_athletes.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn get_start_order_entries(&self, fop_name: &str) -> Vec<OrderEntryView> {
        self.order_entries(fop_name, |f| &f.start_order_keys)
    }

    #[must_use]
    pub fn get_lifting_order_entries(&self, fop_name: &str) -> Vec<OrderEntryView> {
        self.order_entries(fop_name, |f| &f.lifting_order_keys)
    }

    fn order_entries(&self, fop_name: &str, pick: impl Fn(&FopSnapshot) -> &[OrderEntry]) -> Vec<OrderEntryView> {
        let inner = self.inner.lock().unwrap();
        let Some(fop) = inner.fops.get(fop_name) else {
            return Vec::new();
        };
        fop.resolve_order(pick(fop))
            .into_iter()
            .map(|entry| match entry {
                ResolvedEntry::Athlete { athlete, classname } => {
                    OrderEntryView::Athlete { athlete: athlete.clone(), classname: classname.map(str::to_owned) }
                }
                ResolvedEntry::Spacer(SpacerKind::Category) => OrderEntryView::CategorySpacer,
                ResolvedEntry::Spacer(SpacerKind::LiftType) => OrderEntryView::LiftTypeSpacer,
                ResolvedEntry::Missing(key) => OrderEntryView::Missing(key),
            })
            .collect()
    }

    #[must_use]
    pub fn get_current_athlete(&self, fop_name: &str) -> Option<EnrichedAthlete> {
        let inner = self.inner.lock().unwrap();
        let fop = inner.fops.get(fop_name)?;
        let key = fop.current_athlete_key.as_ref()?;
        Self::find_and_enrich(fop, key)
    }

    #[must_use]
    pub fn get_next_athlete(&self, fop_name: &str) -> Option<EnrichedAthlete> {
        let inner = self.inner.lock().unwrap();
        let fop = inner.fops.get(fop_name)?;
        let key = resolve_neighbor_key(fop, &fop.next_athlete_key, 1)?;
        Self::find_and_enrich(fop, &key)
    }

    #[must_use]
    pub fn get_previous_athlete(&self, fop_name: &str) -> Option<EnrichedAthlete> {
        let inner = self.inner.lock().unwrap();
        let fop = inner.fops.get(fop_name)?;
        let key = resolve_neighbor_key(fop, &fop.previous_athlete_key, -1)?;
        Self::find_and_enrich(fop, &key)
    }

    fn find_and_enrich(fop: &FopSnapshot, key: &str) -> Option<EnrichedAthlete> {
        let athlete = fop.session_athletes.iter().find(|a| a.athlete_key == key)?.clone();
        Some(enrich(athlete))
    }

    #[must_use]
    pub fn get_translations(&self, locale: &str) -> HashMap<String, String> {
        self.inner.lock().unwrap().translations.get_translations(locale)
    }

    #[must_use]
    pub fn get_session_status(&self, fop_name: &str) -> SessionStatusView {
        let inner = self.inner.lock().unwrap();
        match inner.sessions.get(fop_name) {
            Some(s) => SessionStatusView { is_done: s.is_done, session_name: s.session_name.clone() },
            None => SessionStatusView { is_done: false, session_name: String::new() },
        }
    }

    #[must_use]
    pub fn is_session_done(&self, fop_name: &str) -> bool {
        self.inner.lock().unwrap().sessions.get(fop_name).is_some_and(|s| s.is_done)
    }

    #[must_use]
    pub fn get_team_name_by_id(&self, team_id: i64) -> Option<String> {
        self.inner.lock().unwrap().database.as_ref()?.teams_by_id.get(&team_id).map(|t| t.name.clone())
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.inner.lock().unwrap().is_ready()
    }

    #[must_use]
    pub fn get_fop_state_version(&self, fop_name: &str) -> u64 {
        self.inner.lock().unwrap().fops.get(fop_name).map_or(0, |f| f.version)
    }

    /// Memoized on the database checksum (spec §4.L).
    #[must_use]
    pub fn get_category_to_age_group_map(&self) -> HashMap<String, Category> {
        let mut inner = self.inner.lock().unwrap();
        let Some(database) = inner.database.clone() else {
            return HashMap::new();
        };
        if let Some((checksum, map)) = &inner.category_map_cache {
            if checksum == &database.database_checksum {
                return map.clone();
            }
        }
        let map = database.category_by_computed_code.clone();
        inner.category_map_cache = Some((database.database_checksum.clone(), map.clone()));
        map
    }

    #[must_use]
    pub fn get_available_fops(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        let mut fops: Vec<String> = inner.database.as_ref().map(|d| d.fops.clone()).unwrap_or_default();
        for confirmed in &inner.confirmed_fops {
            if !fops.contains(confirmed) {
                fops.push(confirmed.clone());
            }
        }
        fops
    }

    #[must_use]
    pub fn get_local_files_dir(&self) -> PathBuf {
        self.inner.lock().unwrap().config.local_files_dir.clone()
    }

    pub fn set_local_files_dir(&self, dir: PathBuf) {
        self.inner.lock().unwrap().config.local_files_dir = dir;
    }

    #[must_use]
    pub fn get_local_url_prefix(&self) -> String {
        self.inner.lock().unwrap().config.local_url_prefix.clone()
    }

    pub fn set_local_url_prefix(&self, prefix: String) {
        self.inner.lock().unwrap().config.local_url_prefix = prefix;
    }

    #[must_use]
    pub fn config_snapshot(&self) -> HubConfig {
        self.inner.lock().unwrap().config.clone()
    }
}

fn frame_kind_label(kind: FrameKind) -> &'static str {
    match kind {
        FrameKind::Update => "update",
        FrameKind::Timer => "timer",
        FrameKind::Decision => "decision",
    }
}

fn despacered<'a>(order: &'a [OrderEntry]) -> Vec<&'a str> {
    order
        .iter()
        .filter_map(|e| match e {
            OrderEntry::Athlete(k) => Some(k.as_str()),
            OrderEntry::Spacer(_) => None,
        })
        .collect()
}

fn resolve_neighbor_key(fop: &FopSnapshot, direct: &Option<String>, offset: i64) -> Option<String> {
    if let Some(key) = direct {
        return Some(key.clone());
    }
    let keys = despacered(&fop.lifting_order_keys);
    let current = fop.current_athlete_key.as_deref()?;
    let idx = keys.iter().position(|k| *k == current)? as i64;
    let neighbor_idx = idx + offset;
    if neighbor_idx < 0 {
        return None;
    }
    keys.get(neighbor_idx as usize).map(|s| (*s).to_owned())
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichedAthlete {
    #[serde(flatten)]
    pub athlete: Athlete,
    pub current_weight: Option<f64>,
    pub current_attempt: Option<u8>,
    pub current_lift_type: Option<&'static str>,
}

fn enrich(athlete: Athlete) -> EnrichedAthlete {
    let pending = |attempts: &[crate::athlete::AttemptStatus]| {
        attempts
            .iter()
            .enumerate()
            .find(|(_, a)| matches!(a.lift_status, LiftStatus::Request | LiftStatus::Current))
    };
    let (attempt, lift_type) = if let Some((idx, _)) = pending(&athlete.sattempts) {
        (Some(idx as u8 + 1), Some("snatch"))
    } else if let Some((idx, _)) = pending(&athlete.cattempts) {
        (Some(idx as u8 + 1), Some("cleanJerk"))
    } else {
        (None, None)
    };
    let current_weight = match (attempt, lift_type) {
        (Some(idx), Some("snatch")) => athlete.sattempts.get(idx as usize - 1).and_then(|a| a.string_value.parse().ok()),
        (Some(idx), Some("cleanJerk")) => athlete.cattempts.get(idx as usize - 1).and_then(|a| a.string_value.parse().ok()),
        _ => None,
    };
    EnrichedAthlete { athlete, current_weight, current_attempt: attempt, current_lift_type: lift_type }
}

#[derive(Debug, Clone)]
pub enum OrderEntryView {
    Athlete { athlete: Athlete, classname: Option<String> },
    CategorySpacer,
    LiftTypeSpacer,
    Missing(String),
}

#[derive(Debug, Clone)]
pub struct SessionStatusView {
    pub is_done: bool,
    pub session_name: String,
}
