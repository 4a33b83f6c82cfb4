// Well-typed wire shapes for the parts of the upstream JSON that are
// genuinely regular (teams, categories, records, competition metadata).
//
// Athletes are deliberately NOT modeled as a strict struct here: per
// spec §4.F/§9 ("dynamic JSON fields delivered as either objects or JSON
// strings") the raw athlete payload is heterogeneous enough (arbitrary
// attempt-column naming, an optional `displayInfo` overlay, attempt
// status objects that can be a number, a string, or an object) that it is
// normalized directly off `serde_json::Value` in `competition_hub::athlete`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawTeam {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawCategory {
    pub gender: String,
    #[serde(rename = "maximumWeight")]
    pub maximum_weight: f64,
    #[serde(rename = "categoryName")]
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawAgeGroup {
    pub code: String,
    #[serde(default)]
    pub categories: Vec<RawCategory>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct RawRecord {
    #[serde(rename = "liftType", default)]
    pub lift_type: String,
    #[serde(rename = "bodyWeightRange", default)]
    pub body_weight_range: String,
    #[serde(rename = "recordValue", default)]
    pub record_value: String,
    #[serde(rename = "recordName", default)]
    pub record_name: String,
    #[serde(default)]
    pub federation: String,
    #[serde(rename = "groupNameString", default)]
    pub group_name_string: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct RawCompetition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub federation: Option<String>,
    #[serde(rename = "menTeamSize", default)]
    pub men_team_size: Option<u32>,
    #[serde(rename = "womenTeamSize", default)]
    pub women_team_size: Option<u32>,
    #[serde(rename = "sinclairYear", default)]
    pub sinclair_year: Option<u32>,
    #[serde(default)]
    pub fops: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
}

/// Full-database payload, accepting both the `{database: {...}}` wrapper
/// shape and the flat shape (spec §4.E step 1).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawDatabasePayload {
    #[serde(default)]
    pub database: Option<RawDatabaseBody>,
    #[serde(default)]
    pub competition: Option<RawCompetition>,
    #[serde(default)]
    pub athletes: Vec<serde_json::Value>,
    #[serde(default)]
    pub teams: Vec<RawTeam>,
    #[serde(rename = "ageGroups", default)]
    pub age_groups: Vec<RawAgeGroup>,
    #[serde(default)]
    pub records: Vec<RawRecord>,
    #[serde(rename = "databaseChecksum", default)]
    pub database_checksum: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawDatabaseBody {
    #[serde(default)]
    pub competition: Option<RawCompetition>,
    #[serde(default)]
    pub athletes: Vec<serde_json::Value>,
    #[serde(default)]
    pub teams: Vec<RawTeam>,
    #[serde(rename = "ageGroups", default)]
    pub age_groups: Vec<RawAgeGroup>,
    #[serde(default)]
    pub records: Vec<RawRecord>,
    #[serde(rename = "databaseChecksum", default)]
    pub database_checksum: Option<String>,
}

impl RawDatabasePayload {
    /// Flatten the `{database: {...}}` wrapper into the top-level fields,
    /// preferring the wrapper's contents when both shapes are present.
    #[must_use]
    pub fn flattened(self) -> RawDatabaseBody {
        if let Some(body) = self.database {
            return body;
        }
        RawDatabaseBody {
            competition: self.competition,
            athletes: self.athletes,
            teams: self.teams,
            age_groups: self.age_groups,
            records: self.records,
            database_checksum: self.database_checksum,
        }
    }
}

/// Shape of a `translations.json` entry inside a `translations_zip` frame
/// (spec §4.C): either the `{locales: {...}}` wrapper or a direct
/// `{locale: {k: v}}` map.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawTranslationsPayload {
    Wrapper {
        locales: std::collections::BTreeMap<String, std::collections::BTreeMap<String, String>>,
        #[serde(rename = "translationsChecksum", default)]
        translations_checksum: Option<String>,
    },
    Direct(std::collections::BTreeMap<String, std::collections::BTreeMap<String, String>>),
}
