// Component D: translation store (spec §3 "Translation store", §4.D).
//
// Keeps two layers per locale: the raw per-locale overrides as received
// (needed to redo a base/regional merge correctly when a base language
// arrives *after* its regional variants — spec §4.D step 3) and the
// materialized effective map used for lookups.
//
// Grounded in shape on `services/server/src/repo/announcer_config.rs`'s
// small key-value merge pattern, scaled up to the locale-fallback rule.

use crate::html_entities::decode_entities;
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct TranslationStore {
    overrides: HashMap<String, HashMap<String, String>>,
    effective: HashMap<String, HashMap<String, String>>,
    checksum: Option<String>,
}

fn base_of(locale: &str) -> Option<&str> {
    locale.split_once('-').map(|(base, _)| base)
}

impl TranslationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effective.is_empty()
    }

    #[must_use]
    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    pub fn set_checksum(&mut self, checksum: Option<String>) {
        self.checksum = checksum;
    }

    /// Merge one `(locale, map)` pair per spec §4.D.
    pub fn merge_locale(&mut self, locale: &str, raw_map: &HashMap<String, String>) {
        let decoded: HashMap<String, String> = raw_map
            .iter()
            .map(|(k, v)| (k.clone(), decode_entities(v)))
            .collect();
        self.overrides.insert(locale.to_owned(), decoded);
        self.recompute_effective(locale);

        if base_of(locale).is_none() {
            let variants: Vec<String> = self
                .overrides
                .keys()
                .filter(|candidate| base_of(candidate) == Some(locale))
                .cloned()
                .collect();
            for variant in variants {
                self.recompute_effective(&variant);
            }
        }
    }

    fn recompute_effective(&mut self, locale: &str) {
        let own = self.overrides.get(locale).cloned().unwrap_or_default();
        let merged = match base_of(locale) {
            Some(base) => {
                let mut merged = self.overrides.get(base).cloned().unwrap_or_default();
                merged.extend(own);
                merged
            }
            None => own,
        };
        self.effective.insert(locale.to_owned(), merged);
    }

    /// Lookup with fallback chain `lang-REGION -> lang -> "en" -> {}`.
    #[must_use]
    pub fn get_translations(&self, locale: &str) -> HashMap<String, String> {
        if let Some(map) = self.effective.get(locale) {
            return map.clone();
        }
        if let Some(base) = base_of(locale) {
            if let Some(map) = self.effective.get(base) {
                return map.clone();
            }
        }
        if let Some(map) = self.effective.get("en") {
            return map.clone();
        }
        HashMap::new()
    }
}
