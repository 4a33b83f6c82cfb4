// Component E: database assembler (spec §4.E).
//
// Pure assembly lives here; the checksum-dedup/already-loading contention
// decision and the cross-FOP version bump + event emission happen in
// `Hub` (§4.E step 6 spans both a pure build and a stateful commit).

use crate::athlete::{normalize, Athlete};
use hub_protocol::{RawAgeGroup, RawDatabaseBody, RawRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub gender: String,
    pub maximum_weight: f64,
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeGroup {
    pub code: String,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    pub lift_type: String,
    pub body_weight_range: String,
    pub record_value: String,
    pub record_name: String,
    pub federation: String,
    pub group_name_string: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Competition {
    pub name: Option<String>,
    pub date: Option<String>,
    pub federation: Option<String>,
    pub men_team_size: Option<u32>,
    pub women_team_size: Option<u32>,
    pub sinclair_year: Option<u32>,
}

/// `<ageGroupCode>_<gender><W>`, `W = "999"` when `maximumWeight > 130`
/// else the rounded weight (spec §4.E step 3).
#[must_use]
pub fn computed_category_code(age_group_code: &str, gender: &str, maximum_weight: f64) -> String {
    let weight_part = if maximum_weight > 130.0 {
        "999".to_owned()
    } else {
        maximum_weight.round().to_string()
    };
    format!("{age_group_code}_{gender}{weight_part}")
}

#[derive(Debug, Clone)]
pub struct DatabaseSnapshot {
    pub competition: Competition,
    pub athletes: Vec<Athlete>,
    pub teams: Vec<Team>,
    pub age_groups: Vec<AgeGroup>,
    pub records: Vec<Record>,
    pub fops: Vec<String>,
    pub database_checksum: String,
    pub last_update: Instant,
    pub initialized: bool,
    pub teams_by_id: HashMap<i64, Team>,
    pub category_by_computed_code: HashMap<String, Category>,
    pub athlete_index: HashMap<String, usize>,
}

impl DatabaseSnapshot {
    #[must_use]
    pub fn athlete_by_key(&self, key: &str) -> Option<&Athlete> {
        self.athlete_index.get(key).map(|&i| &self.athletes[i])
    }

    /// Create-or-update each athlete by key (spec §4.G step 4) so the
    /// database stays current between full refreshes, instead of only ever
    /// reflecting the last full `assemble_database` snapshot.
    pub fn upsert_athletes(&mut self, athletes: &[Athlete]) {
        for athlete in athletes {
            match self.athlete_index.get(&athlete.athlete_key) {
                Some(&index) => self.athletes[index] = athlete.clone(),
                None => {
                    self.athlete_index.insert(athlete.athlete_key.clone(), self.athletes.len());
                    self.athletes.push(athlete.clone());
                }
            }
        }
    }
}

/// Fallback opaque checksum when the producer omits `databaseChecksum`.
/// Deduplication only, not a security boundary, so a plain non-cryptographic
/// hash of the structurally relevant fields is sufficient.
fn fallback_checksum(body: &RawDatabaseBody) -> String {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    body.teams.len().hash(&mut hasher);
    body.age_groups.len().hash(&mut hasher);
    body.athletes.len().hash(&mut hasher);
    body.records.len().hash(&mut hasher);
    for team in &body.teams {
        team.id.hash(&mut hasher);
        team.name.hash(&mut hasher);
    }
    for athlete in &body.athletes {
        athlete.to_string().hash(&mut hasher);
    }
    format!("{:016x}", hasher.finish())
}

fn extract_fops(competition: &hub_protocol::RawCompetition) -> Vec<String> {
    if !competition.fops.is_empty() {
        return competition.fops.clone();
    }
    if !competition.platforms.is_empty() {
        return competition.platforms.clone();
    }
    vec!["A".to_owned()]
}

fn build_age_groups(raw: &[RawAgeGroup]) -> (Vec<AgeGroup>, HashMap<String, Category>) {
    let mut age_groups = Vec::with_capacity(raw.len());
    let mut index = HashMap::new();
    for group in raw {
        let mut categories = Vec::with_capacity(group.categories.len());
        for category in &group.categories {
            let code = computed_category_code(&group.code, &category.gender, category.maximum_weight);
            let category = Category {
                gender: category.gender.clone(),
                maximum_weight: category.maximum_weight,
                category_name: category.category_name.clone(),
            };
            index.insert(code, category.clone());
            categories.push(category);
        }
        age_groups.push(AgeGroup { code: group.code.clone(), categories });
    }
    (age_groups, index)
}

fn build_records(raw: &[RawRecord]) -> Vec<Record> {
    raw.iter()
        .map(|r| Record {
            lift_type: r.lift_type.clone(),
            body_weight_range: r.body_weight_range.clone(),
            record_value: r.record_value.clone(),
            record_name: r.record_name.clone(),
            federation: r.federation.clone(),
            group_name_string: r.group_name_string.clone(),
        })
        .collect()
}

/// Assemble a full `DatabaseSnapshot` from a flattened raw payload
/// (spec §4.E steps 1-5). Does not decide dedup/contention or emit events.
#[must_use]
pub fn assemble_database(body: RawDatabaseBody) -> DatabaseSnapshot {
    let competition_raw = body.competition.clone().unwrap_or_default();

    let teams: Vec<Team> = body.teams.iter().map(|t| Team { id: t.id, name: t.name.clone() }).collect();
    let teams_by_id: HashMap<i64, Team> = teams.iter().map(|t| (t.id, t.clone())).collect();

    let (age_groups, category_by_computed_code) = build_age_groups(&body.age_groups);

    let mut athletes = Vec::with_capacity(body.athletes.len());
    let mut athlete_index = HashMap::new();
    for raw_athlete in &body.athletes {
        if let Some(athlete) = normalize(raw_athlete, &teams_by_id, &category_by_computed_code) {
            athlete_index.insert(athlete.athlete_key.clone(), athletes.len());
            athletes.push(athlete);
        }
    }

    let records = build_records(&body.records);
    let fops = extract_fops(&competition_raw);
    let database_checksum = body.database_checksum.clone().unwrap_or_else(|| fallback_checksum(&body));

    let competition = Competition {
        name: competition_raw.name,
        date: competition_raw.date,
        federation: competition_raw.federation,
        men_team_size: competition_raw.men_team_size,
        women_team_size: competition_raw.women_team_size,
        sinclair_year: competition_raw.sinclair_year,
    };

    DatabaseSnapshot {
        competition,
        athletes,
        teams,
        age_groups,
        records,
        fops,
        database_checksum,
        last_update: Instant::now(),
        initialized: true,
        teams_by_id,
        category_by_computed_code,
        athlete_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_protocol::{RawCategory, RawCompetition, RawTeam};

    fn sample_body() -> RawDatabaseBody {
        RawDatabaseBody {
            competition: Some(RawCompetition {
                name: Some("Worlds".to_owned()),
                fops: vec!["A".to_owned()],
                ..RawCompetition::default()
            }),
            athletes: vec![serde_json::json!({
                "key": "1", "firstName": "Jo", "lastName": "Doe", "team": 10, "categoryCode": "SR_M89"
            })],
            teams: vec![RawTeam { id: 10, name: "USA".to_owned() }],
            age_groups: vec![RawAgeGroup {
                code: "SR".to_owned(),
                categories: vec![RawCategory { gender: "M".to_owned(), maximum_weight: 89.0, category_name: "M89 Senior".to_owned() }],
            }],
            records: vec![],
            database_checksum: None,
        }
    }

    #[test]
    fn computed_category_code_uses_999_sentinel_over_130kg() {
        assert_eq!(computed_category_code("SR", "M", 89.0), "SR_M89");
        assert_eq!(computed_category_code("SR", "M", 131.0), "SR_M999");
        assert_eq!(computed_category_code("SR", "M", 130.0), "SR_M130");
    }

    #[test]
    fn assembles_indexes_and_resolves_athlete_fields() {
        let snapshot = assemble_database(sample_body());
        assert_eq!(snapshot.fops, vec!["A".to_owned()]);
        assert_eq!(snapshot.athletes.len(), 1);
        assert_eq!(snapshot.athletes[0].team_name.as_deref(), Some("USA"));
        assert_eq!(snapshot.athletes[0].category.as_deref(), Some("M89 Senior"));
        assert_eq!(
            snapshot.category_by_computed_code.get("SR_M89").unwrap().category_name,
            "M89 Senior"
        );
        assert!(snapshot.athlete_by_key("1").is_some());
    }

    #[test]
    fn falls_back_to_singleton_fop_when_absent() {
        let mut body = sample_body();
        body.competition.as_mut().unwrap().fops.clear();
        let snapshot = assemble_database(body);
        assert_eq!(snapshot.fops, vec!["A".to_owned()]);
    }

    #[test]
    fn fallback_checksum_is_deterministic_for_identical_input() {
        let a = assemble_database(sample_body());
        let b = assemble_database(sample_body());
        assert_eq!(a.database_checksum, b.database_checksum);
    }
}
