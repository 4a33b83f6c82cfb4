// Component I: precondition negotiator (spec §4.I).

use std::time::{Duration, Instant};

const REQUEST_DEBOUNCE: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceReadiness {
    pub flags: bool,
    pub logos: bool,
    pub pictures: bool,
}

impl ResourceReadiness {
    fn is_ready(&self, name: &str) -> bool {
        match name {
            "flags_zip" => self.flags,
            "logos_zip" => self.logos,
            "pictures_zip" => self.pictures,
            // database/translations_zip are tracked separately and never
            // requested through this on-demand path.
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiationOutcome {
    Proceed,
    WaitingForDatabase,
    PreconditionRequired(Vec<String>),
}

#[derive(Debug, Default)]
pub struct PreconditionNegotiator {
    last_database_request: Option<Instant>,
}

impl PreconditionNegotiator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn missing_required(has_athletes: bool, has_translations: bool) -> Vec<String> {
        let mut missing = Vec::new();
        if !has_athletes {
            missing.push("database".to_owned());
        }
        if !has_translations {
            missing.push("translations_zip".to_owned());
        }
        missing
    }

    /// Decide the response for a text update/timer/decision frame, after its
    /// merge has already been applied to the FOP snapshot (spec §4.I, §7.4).
    pub fn negotiate(&mut self, has_athletes: bool, has_translations: bool) -> NegotiationOutcome {
        let missing = Self::missing_required(has_athletes, has_translations);
        if missing.is_empty() {
            return NegotiationOutcome::Proceed;
        }
        let now = Instant::now();
        if let Some(last) = self.last_database_request {
            if now.duration_since(last) < REQUEST_DEBOUNCE {
                return NegotiationOutcome::WaitingForDatabase;
            }
        }
        self.last_database_request = Some(now);
        NegotiationOutcome::PreconditionRequired(missing)
    }

    /// `requestPluginPreconditions([...])` / `requestResources([...])`:
    /// on-demand resources are never auto-required, only checked when asked.
    #[must_use]
    pub fn plugin_preconditions(readiness: &ResourceReadiness, requested: &[String]) -> Vec<String> {
        requested.iter().filter(|name| !readiness.is_ready(name)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_both_missing_when_nothing_ingested() {
        assert_eq!(
            PreconditionNegotiator::missing_required(false, false),
            vec!["database".to_owned(), "translations_zip".to_owned()]
        );
    }

    #[test]
    fn proceeds_once_both_preconditions_are_met() {
        let mut negotiator = PreconditionNegotiator::new();
        assert_eq!(negotiator.negotiate(true, true), NegotiationOutcome::Proceed);
    }

    #[test]
    fn debounces_repeated_precondition_requests_within_window() {
        let mut negotiator = PreconditionNegotiator::new();
        let first = negotiator.negotiate(false, false);
        assert!(matches!(first, NegotiationOutcome::PreconditionRequired(_)));
        let second = negotiator.negotiate(false, false);
        assert_eq!(second, NegotiationOutcome::WaitingForDatabase);
    }

    #[test]
    fn plugin_preconditions_lists_only_unready_resources() {
        let readiness = ResourceReadiness { flags: true, logos: false, pictures: false };
        let requested = vec!["flags_zip".to_owned(), "logos_zip".to_owned()];
        assert_eq!(
            PreconditionNegotiator::plugin_preconditions(&readiness, &requested),
            vec!["logos_zip".to_owned()]
        );
    }
}
