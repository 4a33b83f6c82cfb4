// Component G: per-FOP state folder (spec §3 "FOP snapshot", §4.G).

use crate::athlete::{normalize, Athlete, AthleteKey};
use crate::database::{Category, Team};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Instant;

const EMBEDDED_JSON_STRING_FIELDS: &[&str] = &[
    "sessionAthletes",
    "startOrderKeys",
    "liftingOrderKeys",
    "startOrderAthletes",
    "liftingOrderAthletes",
    "leaders",
    "records",
];

fn parse_embedded_json_strings(payload: &mut Map<String, Value>) {
    for field in EMBEDDED_JSON_STRING_FIELDS {
        if let Some(Value::String(s)) = payload.get(*field) {
            if let Ok(parsed) = serde_json::from_str::<Value>(s) {
                payload.insert((*field).to_owned(), parsed);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Update,
    Timer,
    Decision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacerKind {
    Category,
    LiftType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderEntry {
    Athlete(String),
    Spacer(SpacerKind),
}

fn parse_order_keys(value: &Value) -> Vec<OrderEntry> {
    let Some(arr) = value.as_array() else {
        return Vec::new();
    };
    arr.iter()
        .filter_map(|item| {
            if let Some(obj) = item.as_object() {
                if obj.get("isSpacer").and_then(Value::as_bool) == Some(true) {
                    let kind = match obj.get("spacerKind").and_then(Value::as_str) {
                        Some("liftType") => SpacerKind::LiftType,
                        _ => SpacerKind::Category,
                    };
                    return Some(OrderEntry::Spacer(kind));
                }
                obj.get("athleteKey")
                    .and_then(AthleteKey::from_value)
                    .map(|k| OrderEntry::Athlete(k.0))
            } else {
                AthleteKey::from_value(item).map(|k| OrderEntry::Athlete(k.0))
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AthleteTimerEventType {
    StartTime,
    StopTime,
    SetTime,
}

fn parse_athlete_timer_event(s: &str) -> Option<AthleteTimerEventType> {
    match s {
        "StartTime" => Some(AthleteTimerEventType::StartTime),
        "StopTime" => Some(AthleteTimerEventType::StopTime),
        "SetTime" => Some(AthleteTimerEventType::SetTime),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct AthleteTimerSlice {
    pub event_type: Option<AthleteTimerEventType>,
    pub millis_remaining: Option<i64>,
    pub start_time_millis: Option<i64>,
    pub time_allowed: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakTimerEventType {
    StartTime,
    StopTime,
    SetTime,
    Pause,
}

fn parse_break_timer_event(s: &str) -> Option<BreakTimerEventType> {
    match s {
        "StartTime" => Some(BreakTimerEventType::StartTime),
        "StopTime" => Some(BreakTimerEventType::StopTime),
        "SetTime" => Some(BreakTimerEventType::SetTime),
        "Pause" => Some(BreakTimerEventType::Pause),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct BreakTimerSlice {
    pub event_type: Option<BreakTimerEventType>,
    pub millis_remaining: Option<i64>,
    pub start_time_millis: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionEventType {
    FullDecision,
    Reset,
    DownSignal,
}

fn parse_decision_event(s: &str) -> Option<DecisionEventType> {
    match s {
        "FULL_DECISION" => Some(DecisionEventType::FullDecision),
        "RESET" => Some(DecisionEventType::Reset),
        "DOWN_SIGNAL" => Some(DecisionEventType::DownSignal),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Good,
    Bad,
    Undecided,
}

fn parse_decision_value(value: &Value) -> Option<Decision> {
    match value {
        Value::Bool(true) => Some(Decision::Good),
        Value::Bool(false) => Some(Decision::Bad),
        Value::Null => Some(Decision::Undecided),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecisionSlice {
    pub event_type: Option<DecisionEventType>,
    pub decisions_visible: bool,
    pub d1: Option<Decision>,
    pub d2: Option<Decision>,
    pub d3: Option<Decision>,
    pub down: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Decision,
    Break,
    Athlete,
    None,
}

pub enum ResolvedEntry<'a> {
    Athlete { athlete: &'a Athlete, classname: Option<&'static str> },
    Spacer(SpacerKind),
    Missing(String),
}

#[derive(Debug, Clone)]
pub struct FopSnapshot {
    pub fop_name: String,
    pub fields: Map<String, Value>,
    pub current_athlete_key: Option<String>,
    pub next_athlete_key: Option<String>,
    pub previous_athlete_key: Option<String>,
    pub start_order_keys: Vec<OrderEntry>,
    pub lifting_order_keys: Vec<OrderEntry>,
    pub session_athletes: Vec<Athlete>,
    pub athlete_timer: AthleteTimerSlice,
    pub break_timer: BreakTimerSlice,
    pub decision: DecisionSlice,
    pub fop_state: Option<String>,
    pub is_break: bool,
    pub break_type: Option<String>,
    pub last_update: Instant,
    pub last_data_update: Instant,
    pub version: u64,
}

impl FopSnapshot {
    #[must_use]
    pub fn new(fop_name: String) -> Self {
        let now = Instant::now();
        Self {
            fop_name,
            fields: Map::new(),
            current_athlete_key: None,
            next_athlete_key: None,
            previous_athlete_key: None,
            start_order_keys: Vec::new(),
            lifting_order_keys: Vec::new(),
            session_athletes: Vec::new(),
            athlete_timer: AthleteTimerSlice::default(),
            break_timer: BreakTimerSlice::default(),
            decision: DecisionSlice::default(),
            fop_state: None,
            is_break: false,
            break_type: None,
            last_update: now,
            last_data_update: now,
            version: 0,
        }
    }

    /// Fold one `update|timer|decision` frame into this snapshot (spec §4.G
    /// steps 2-6). `teams_by_id`/`category_by_computed_code` come from the
    /// current database snapshot, needed to resolve `sessionAthletes`.
    pub fn merge(
        &mut self,
        kind: FrameKind,
        mut payload: Map<String, Value>,
        teams_by_id: &HashMap<i64, Team>,
        category_by_computed_code: &HashMap<String, Category>,
    ) {
        parse_embedded_json_strings(&mut payload);

        let now = Instant::now();
        self.last_update = now;
        if kind == FrameKind::Update {
            self.last_data_update = now;
        }

        if payload.contains_key("currentAthleteKey") {
            self.current_athlete_key = payload.get("currentAthleteKey").and_then(AthleteKey::from_value).map(|k| k.0);
        } else {
            self.current_athlete_key = None;
        }
        if let Some(v) = payload.get("nextAthleteKey") {
            self.next_athlete_key = AthleteKey::from_value(v).map(|k| k.0);
        }
        if let Some(v) = payload.get("previousAthleteKey") {
            self.previous_athlete_key = AthleteKey::from_value(v).map(|k| k.0);
        }

        for (k, v) in &payload {
            self.fields.insert(k.clone(), v.clone());
        }
        if !payload.contains_key("currentAthleteKey") {
            self.fields.remove("currentAthleteKey");
        }

        match kind {
            FrameKind::Update => self.merge_update(&payload, teams_by_id, category_by_computed_code),
            FrameKind::Timer => self.merge_timer(&payload),
            FrameKind::Decision => self.merge_decision(&payload),
        }
    }

    fn merge_update(
        &mut self,
        payload: &Map<String, Value>,
        teams_by_id: &HashMap<i64, Team>,
        category_by_computed_code: &HashMap<String, Category>,
    ) {
        self.version += 1;

        if let Some(break_type) = payload.get("breakType").and_then(Value::as_str) {
            self.break_type = Some(break_type.to_owned());
        }
        if let Some(b) = payload.get("break").and_then(Value::as_bool) {
            self.is_break = b;
        }
        if let Some(state) = payload.get("fopState").and_then(Value::as_str) {
            self.fop_state = Some(state.to_owned());
        }
        if let Some(athletes) = payload.get("sessionAthletes").and_then(Value::as_array) {
            self.session_athletes = athletes
                .iter()
                .filter_map(|raw| normalize(raw, teams_by_id, category_by_computed_code))
                .collect();
        }
        if let Some(keys) = payload.get("startOrderKeys") {
            self.start_order_keys = parse_order_keys(keys);
        }
        if let Some(keys) = payload.get("liftingOrderKeys") {
            self.lifting_order_keys = parse_order_keys(keys);
        }
    }

    fn merge_timer(&mut self, payload: &Map<String, Value>) {
        if let Some(t) = payload.get("athleteTimerEventType").and_then(Value::as_str) {
            self.athlete_timer.event_type = parse_athlete_timer_event(t);
            self.athlete_timer.millis_remaining = payload.get("athleteMillisRemaining").and_then(Value::as_i64);
            self.athlete_timer.start_time_millis = payload.get("athleteStartTimeMillis").and_then(Value::as_i64);
            self.athlete_timer.time_allowed = payload.get("timeAllowed").and_then(Value::as_i64);
            if self.athlete_timer.event_type == Some(AthleteTimerEventType::StartTime) {
                // a started athlete timer cancels the "in break" reading (spec §4.G step 5)
                self.is_break = false;
            }
        }
        if let Some(t) = payload.get("breakTimerEventType").and_then(Value::as_str) {
            match parse_break_timer_event(t) {
                Some(BreakTimerEventType::Pause) => {
                    self.break_timer = BreakTimerSlice {
                        event_type: Some(BreakTimerEventType::Pause),
                        millis_remaining: None,
                        start_time_millis: None,
                    };
                }
                kind => {
                    self.break_timer.event_type = kind;
                    self.break_timer.millis_remaining = payload.get("breakMillisRemaining").and_then(Value::as_i64);
                    self.break_timer.start_time_millis = payload.get("breakStartTimeMillis").and_then(Value::as_i64);
                }
            }
        }
    }

    fn merge_decision(&mut self, payload: &Map<String, Value>) {
        if let Some(t) = payload.get("decisionEventType").and_then(Value::as_str) {
            self.decision.event_type = parse_decision_event(t);
        }
        if let Some(v) = payload.get("decisionsVisible").and_then(Value::as_bool) {
            self.decision.decisions_visible = v;
        }
        if let Some(v) = payload.get("d1") {
            self.decision.d1 = parse_decision_value(v);
        }
        if let Some(v) = payload.get("d2") {
            self.decision.d2 = parse_decision_value(v);
        }
        if let Some(v) = payload.get("d3") {
            self.decision.d3 = parse_decision_value(v);
        }
        if let Some(v) = payload.get("down").and_then(Value::as_bool) {
            self.decision.down = Some(v);
        }
    }

    /// The "what to show" reduction (spec §4.G "Display-mode reduction").
    /// `session_done` comes from the session lifecycle tracker, which this
    /// snapshot does not own.
    #[must_use]
    pub fn display_mode(&self, session_done: bool) -> DisplayMode {
        let decision_visible =
            self.decision.decisions_visible || self.decision.event_type == Some(DecisionEventType::DownSignal);

        let break_running = self.break_timer.event_type == Some(BreakTimerEventType::StartTime);
        if break_running && !decision_visible {
            return DisplayMode::Break;
        }
        if decision_visible {
            return DisplayMode::Decision;
        }

        let athlete_timer_starting = self.athlete_timer.event_type == Some(AthleteTimerEventType::StartTime);
        let break_paused = self.break_timer.event_type == Some(BreakTimerEventType::Pause);
        if self.is_break && !break_paused && !athlete_timer_starting && !session_done {
            return DisplayMode::Break;
        }

        if self.athlete_timer.event_type.is_some() && self.current_athlete_key.is_some() {
            return DisplayMode::Athlete;
        }
        DisplayMode::None
    }

    /// `mode == "INTERRUPTION"` during a break shows a literal stop label
    /// instead of a countdown (spec §4.G).
    #[must_use]
    pub fn interruption_label(&self, norwegian: bool) -> Option<&'static str> {
        if self.fields.get("mode").and_then(Value::as_str) == Some("INTERRUPTION") {
            Some(if norwegian { "STOPP" } else { "STOP" })
        } else {
            None
        }
    }

    /// Resolve an order-key sequence into athletes/spacers, annotated with
    /// the `current`/`next` classname when not already carried by the
    /// producer (spec §4.G step 4).
    #[must_use]
    pub fn resolve_order<'a>(&'a self, order: &[OrderEntry]) -> Vec<ResolvedEntry<'a>> {
        order
            .iter()
            .map(|entry| match entry {
                OrderEntry::Spacer(kind) => ResolvedEntry::Spacer(*kind),
                OrderEntry::Athlete(key) => {
                    let classname = if self.current_athlete_key.as_deref() == Some(key.as_str()) {
                        Some("current")
                    } else if self.next_athlete_key.as_deref() == Some(key.as_str()) {
                        Some("next")
                    } else {
                        None
                    };
                    match self.session_athletes.iter().find(|a| &a.athlete_key == key) {
                        Some(athlete) => ResolvedEntry::Athlete { athlete, classname },
                        None => ResolvedEntry::Missing(key.clone()),
                    }
                }
            })
            .collect()
    }
}
