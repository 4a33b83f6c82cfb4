// Component F: athlete normalizer (spec §4.F).
//
// Raw athlete payloads are intentionally left untyped at the wire boundary
// (`hub_protocol::raw` keeps them as `serde_json::Value`, see that crate's
// design note) because producers mix at least three attempt-encoding
// conventions in the wild. This module is where the boundary ends: every
// `Athlete` leaving `normalize` is in the one closed shape §3 describes.

use crate::database::{Category, Team};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AthleteKey(pub String);

impl AthleteKey {
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl std::fmt::Display for AthleteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiftStatus {
    Good,
    Bad,
    Current,
    Next,
    Request,
    Empty,
}

impl LiftStatus {
    fn from_wire(s: &str) -> Option<Self> {
        match s {
            "good" => Some(Self::Good),
            "bad" => Some(Self::Bad),
            "current" => Some(Self::Current),
            "next" => Some(Self::Next),
            "request" => Some(Self::Request),
            "empty" => Some(Self::Empty),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptStatus {
    pub string_value: String,
    pub lift_status: LiftStatus,
}

impl AttemptStatus {
    fn empty() -> Self {
        Self {
            string_value: "-".to_owned(),
            lift_status: LiftStatus::Empty,
        }
    }
}

fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(f) = n.as_f64() {
        if f.fract() == 0.0 {
            return format!("{f:.0}");
        }
        return f.to_string();
    }
    n.to_string()
}

fn normalize_legacy_number(n: &Number) -> AttemptStatus {
    let value = n.as_f64().unwrap_or(0.0);
    if value > 0.0 {
        AttemptStatus {
            string_value: format_number(n),
            lift_status: LiftStatus::Good,
        }
    } else if value < 0.0 {
        AttemptStatus {
            string_value: format_number(&Number::from_f64(value.abs()).unwrap_or(Number::from(0))),
            lift_status: LiftStatus::Bad,
        }
    } else {
        AttemptStatus::empty()
    }
}

fn parse_parenthesized(s: &str) -> Option<f64> {
    let inner = s.strip_prefix('(')?.strip_suffix(')')?;
    inner.parse::<f64>().ok()
}

/// Normalize one already-delivered `sattempts`/`cattempts` element (spec §4.F).
#[must_use]
pub fn normalize_attempt(value: &Value) -> AttemptStatus {
    match value {
        Value::Null => AttemptStatus::empty(),
        Value::Object(map) => match map.get("value") {
            Some(Value::Number(n)) => {
                let status = map
                    .get("status")
                    .and_then(Value::as_str)
                    .and_then(LiftStatus::from_wire)
                    .unwrap_or(LiftStatus::Request);
                AttemptStatus {
                    string_value: format_number(n),
                    lift_status: status,
                }
            }
            _ => AttemptStatus::empty(),
        },
        Value::Number(n) => normalize_legacy_number(n),
        Value::String(s) => match parse_parenthesized(s) {
            Some(v) => AttemptStatus {
                string_value: format_number(&Number::from_f64(v.abs()).unwrap_or(Number::from(0))),
                lift_status: LiftStatus::Bad,
            },
            None => AttemptStatus::empty(),
        },
        _ => AttemptStatus::empty(),
    }
}

/// Fallback synthesis from the flat per-attempt fields (`snatch1Declaration`,
/// `snatch1ActualLift`, …) for producers that never send `sattempts` itself.
fn synthesize_attempt(raw: &Map<String, Value>, lift_prefix: &str, attempt_no: u8) -> AttemptStatus {
    let field = |suffix: &str| -> Option<&Value> { raw.get(&format!("{lift_prefix}{attempt_no}{suffix}")) };

    if let Some(actual) = field("ActualLift") {
        if !actual.is_null() {
            if let Some(n) = actual.as_f64() {
                return normalize_legacy_number(&Number::from_f64(n).unwrap_or(Number::from(0)));
            }
        }
    }

    let requested = field("Change2")
        .and_then(Value::as_f64)
        .or_else(|| field("Change1").and_then(Value::as_f64))
        .or_else(|| field("Declaration").and_then(Value::as_f64))
        .or_else(|| field("AutomaticProgression").and_then(Value::as_f64));

    match requested {
        Some(w) if w > 0.0 => AttemptStatus {
            string_value: format_number(&Number::from_f64(w).unwrap_or(Number::from(0))),
            lift_status: LiftStatus::Request,
        },
        _ => AttemptStatus::empty(),
    }
}

fn attempts_from_flat_fields(raw: &Map<String, Value>, lift_prefix: &str) -> [AttemptStatus; 3] {
    [
        synthesize_attempt(raw, lift_prefix, 1),
        synthesize_attempt(raw, lift_prefix, 2),
        synthesize_attempt(raw, lift_prefix, 3),
    ]
}

fn attempts_from_array(raw: &Value) -> Option<[AttemptStatus; 3]> {
    let arr = raw.as_array()?;
    if arr.len() != 3 {
        return None;
    }
    Some([
        normalize_attempt(&arr[0]),
        normalize_attempt(&arr[1]),
        normalize_attempt(&arr[2]),
    ])
}

fn best_of(attempts: &[AttemptStatus]) -> String {
    attempts
        .iter()
        .filter(|a| a.lift_status == LiftStatus::Good)
        .filter_map(|a| a.string_value.parse::<f64>().ok())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
        .map(|v| {
            if v.fract() == 0.0 {
                format!("{v:.0}")
            } else {
                v.to_string()
            }
        })
        .unwrap_or_else(|| "-".to_owned())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Athlete {
    pub athlete_key: String,
    pub first_name: String,
    pub last_name: String,
    pub full_birth_date: Option<String>,
    pub team: Option<i64>,
    pub category_code: Option<String>,
    pub body_weight: Option<f64>,
    pub total: Option<String>,
    pub sinclair: Option<f64>,
    pub full_name: String,
    pub team_name: Option<String>,
    pub category: Option<String>,
    pub year_of_birth: Option<String>,
    pub sattempts: Vec<AttemptStatus>,
    pub cattempts: Vec<AttemptStatus>,
    pub best_snatch: String,
    pub best_clean_jerk: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Merge `{athlete:{...}, displayInfo:{...}}` wrappers, `displayInfo` winning
/// on overlap; pass flat objects through unchanged.
fn unwrap_envelope(value: &Value) -> Map<String, Value> {
    let Some(obj) = value.as_object() else {
        return Map::new();
    };
    if !obj.contains_key("athlete") && !obj.contains_key("displayInfo") {
        return obj.clone();
    }
    let mut merged = obj
        .get("athlete")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    if let Some(display) = obj.get("displayInfo").and_then(Value::as_object) {
        for (k, v) in display {
            merged.insert(k.clone(), v.clone());
        }
    }
    merged
}

fn string_field(raw: &Map<String, Value>, key: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default()
}

/// Normalize one raw athlete record into the closed §3 `Athlete` shape.
#[must_use]
pub fn normalize(
    raw_value: &Value,
    teams_by_id: &HashMap<i64, Team>,
    category_by_code: &HashMap<String, Category>,
) -> Option<Athlete> {
    let mut raw = unwrap_envelope(raw_value);

    let key_value = raw.get("key").or_else(|| raw.get("athleteKey"))?;
    let athlete_key = AthleteKey::from_value(key_value)?.0;

    let first_name = string_field(&raw, "firstName");
    let last_name = string_field(&raw, "lastName");
    let full_name = raw
        .get("fullName")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| compute_full_name(&first_name, &last_name));

    let team = raw.get("team").and_then(Value::as_i64);
    let team_name = raw
        .get("teamName")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .or_else(|| team.and_then(|id| teams_by_id.get(&id)).map(|t| t.name.clone()));

    let category_code = raw.get("categoryCode").and_then(Value::as_str).map(str::to_owned);
    let category = raw
        .get("category")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .or_else(|| {
            category_code
                .as_deref()
                .and_then(|code| category_by_code.get(code))
                .map(|c| c.category_name.clone())
        })
        .or_else(|| category_code.clone());

    let full_birth_date = raw.get("fullBirthDate").and_then(Value::as_str).map(str::to_owned);
    let year_of_birth = raw
        .get("yearOfBirth")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .or_else(|| full_birth_date.as_deref().map(|d| d.chars().take(4).collect()));

    let sattempts = raw
        .get("sattempts")
        .and_then(attempts_from_array)
        .unwrap_or_else(|| attempts_from_flat_fields(&raw, "snatch"))
        .to_vec();
    let cattempts = raw
        .get("cattempts")
        .and_then(attempts_from_array)
        .unwrap_or_else(|| attempts_from_flat_fields(&raw, "cleanJerk"))
        .to_vec();

    let best_snatch = best_of(&sattempts);
    let best_clean_jerk = best_of(&cattempts);

    let body_weight = raw.get("bodyWeight").and_then(Value::as_f64);
    let total = raw.get("total").and_then(Value::as_str).map(str::to_owned);
    let sinclair = raw.get("sinclair").and_then(Value::as_f64);

    for key in [
        "key",
        "athleteKey",
        "firstName",
        "lastName",
        "fullName",
        "team",
        "teamName",
        "categoryCode",
        "category",
        "fullBirthDate",
        "yearOfBirth",
        "sattempts",
        "cattempts",
        "bodyWeight",
        "total",
        "sinclair",
    ] {
        raw.remove(key);
    }

    Some(Athlete {
        athlete_key,
        first_name,
        last_name,
        full_birth_date,
        team,
        category_code,
        body_weight,
        total,
        sinclair,
        full_name,
        team_name,
        category,
        year_of_birth,
        sattempts,
        cattempts,
        best_snatch,
        best_clean_jerk,
        extra: raw,
    })
}

fn compute_full_name(first_name: &str, last_name: &str) -> String {
    match (last_name.is_empty(), first_name.is_empty()) {
        (true, true) => String::new(),
        (true, false) => first_name.to_owned(),
        (false, true) => last_name.to_uppercase(),
        (false, false) => format!("{}, {}", last_name.to_uppercase(), first_name),
    }
}
