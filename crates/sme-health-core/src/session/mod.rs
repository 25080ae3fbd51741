pub mod upload;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::{AnalysisResponse, ApiError, BackendApi, RawAssessment, UploadResult};
use crate::locale::Locale;

pub const DEFAULT_COMPANY_ID: i64 = 1;

/// Company label used when a duplicate upload carries its assessment inline;
/// the upload response has no company name of its own.
pub const DEFAULT_COMPANY_LABEL: &str = "Demo SME";

const FALLBACK_SCORE: &str = "N/A";
const FALLBACK_RISK: &str = "Unknown";
const FALLBACK_NARRATIVE: &str = "No narrative available";

/// Canonical assessment, normalized once at the session boundary so the
/// presentation layer never re-derives defaults per render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub score: String,
    pub risk_level: String,
    pub narrative: String,
    pub recommendations: Vec<String>,
}

impl Assessment {
    /// Convert the loosely-typed backend payload, substituting defaults for
    /// every absent or malformed field. An empty recommendation list stays
    /// empty here; the composer supplies the localized notice.
    pub fn normalize(raw: &RawAssessment) -> Self {
        let score = raw
            .score
            .as_ref()
            .and_then(score_text)
            .unwrap_or_else(|| FALLBACK_SCORE.to_string());
        let risk_level = raw
            .risk_level
            .clone()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_RISK.to_string());
        let narrative = raw
            .narrative
            .clone()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_NARRATIVE.to_string());
        let recommendations = match raw.recommendations.as_ref() {
            Some(Value::Array(items)) => {
                items.iter().filter_map(recommendation_text).collect()
            }
            _ => Vec::new(),
        };

        Self {
            score,
            risk_level,
            narrative,
            recommendations,
        }
    }
}

fn score_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Plain entries render verbatim; `{title}` objects render their title.
fn recommendation_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// One company's analysis as held by a loaded session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisData {
    pub company: String,
    pub assessment: Assessment,
}

impl AnalysisData {
    pub fn from_response(response: &AnalysisResponse) -> Self {
        Self {
            company: response.company.clone(),
            assessment: Assessment::normalize(
                response.assessment.as_ref().unwrap_or(&RawAssessment::default()),
            ),
        }
    }
}

/// Exactly one facet of the session is current at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Loading,
    Loaded(AnalysisData),
    Error(String),
}

/// Raised when the language selector is used after data has loaded; the
/// displayed data would no longer match the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("language is locked while analysis data is loaded or loading; start a new session to switch")]
pub struct LocaleLocked;

/// Correlates an in-flight analysis request with the session generation it
/// may commit to. Stale tickets are discarded on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub company_id: i64,
    pub locale: Locale,
}

/// Client-side unit of state tracking one company's upload/analysis
/// lifecycle. Long-lived; replaced wholesale by a new instance on reset.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    company_id: i64,
    locale: Locale,
    phase: SessionPhase,
    fetch_generation: u64,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::with_locale(Locale::En)
    }

    pub fn with_locale(locale: Locale) -> Self {
        Self {
            company_id: DEFAULT_COMPANY_ID,
            locale,
            phase: SessionPhase::Idle,
            fetch_generation: 0,
        }
    }

    pub fn company_id(&self) -> i64 {
        self.company_id
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SessionPhase::Loading)
    }

    /// Update the correlation key. Does not trigger a fetch.
    pub fn set_company_id(&mut self, id: i64) {
        self.company_id = id;
    }

    /// Change the interface language. Locked once a fetch is in flight or
    /// data is loaded, so the selector cannot drift from displayed data.
    pub fn set_locale(&mut self, locale: Locale) -> Result<(), LocaleLocked> {
        match self.phase {
            SessionPhase::Loaded(_) | SessionPhase::Loading => Err(LocaleLocked),
            _ => {
                self.locale = locale;
                Ok(())
            }
        }
    }

    /// Apply a completed upload: a duplicate carrying its assessment is
    /// routed straight into the data slot, anything else only retargets the
    /// session. Must run before any fetch triggered by the same upload.
    pub fn apply_upload(&mut self, result: &UploadResult) {
        if let Some(id) = result.company_id {
            self.company_id = id;
        }
        if result.duplicate {
            if let Some(raw) = &result.assessment {
                self.ingest_duplicate_assessment(raw, DEFAULT_COMPANY_LABEL);
            }
        }
    }

    /// Duplicate short-circuit: populate the data slot without a network
    /// call, bypassing the loading phase entirely. Any in-flight fetch is
    /// invalidated so a late completion cannot clobber this data.
    pub fn ingest_duplicate_assessment(&mut self, raw: &RawAssessment, company_label: &str) {
        self.fetch_generation += 1;
        self.phase = SessionPhase::Loaded(AnalysisData {
            company: company_label.to_string(),
            assessment: Assessment::normalize(raw),
        });
    }

    /// Start a fetch: bump the generation, enter the loading phase and hand
    /// back the ticket that `complete_fetch` requires. Newest ticket wins.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.fetch_generation += 1;
        self.phase = SessionPhase::Loading;
        FetchTicket {
            generation: self.fetch_generation,
            company_id: self.company_id,
            locale: self.locale,
        }
    }

    /// Commit a fetch outcome unless a newer fetch or a duplicate ingestion
    /// superseded the ticket. Success replaces the data wholesale; failures
    /// become the localized session error.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<AnalysisResponse, ApiError>,
    ) {
        if ticket.generation != self.fetch_generation {
            debug!(
                stale = ticket.generation,
                current = self.fetch_generation,
                "discarding superseded analysis response"
            );
            return;
        }
        match outcome {
            Ok(response) => {
                self.phase = SessionPhase::Loaded(AnalysisData::from_response(&response));
            }
            Err(err) => {
                let table = self.locale.resolve();
                let message = match err {
                    ApiError::NoAnalysisData => table.error_no_data.to_string(),
                    other => {
                        warn!(error = %other, company_id = ticket.company_id, "analysis request failed");
                        table.error_analysis.to_string()
                    }
                };
                self.phase = SessionPhase::Error(message);
            }
        }
    }

    /// Sequenced fetch: begin, await the backend, commit. Used by callers
    /// that do not interleave requests; interleaving callers drive the
    /// begin/complete pair themselves.
    pub async fn fetch_analysis(&mut self, api: &dyn BackendApi) {
        let ticket = self.begin_fetch();
        let outcome = api.analyze(ticket.company_id, ticket.locale).await;
        self.complete_fetch(ticket, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::option;
    use proptest::prelude::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawAssessment {
        serde_json::from_value(value).unwrap()
    }

    fn loaded_assessment(session: &AnalysisSession) -> &Assessment {
        match session.phase() {
            SessionPhase::Loaded(data) => &data.assessment,
            other => panic!("expected loaded session, got {other:?}"),
        }
    }

    #[test]
    fn normalize_fills_every_default_for_empty_payload() {
        let assessment = Assessment::normalize(&RawAssessment::default());
        assert_eq!(assessment.score, "N/A");
        assert_eq!(assessment.risk_level, "Unknown");
        assert_eq!(assessment.narrative, "No narrative available");
        assert!(assessment.recommendations.is_empty());
    }

    #[test]
    fn normalize_keeps_numeric_and_textual_scores() {
        assert_eq!(
            Assessment::normalize(&raw(json!({ "score": 78 }))).score,
            "78"
        );
        assert_eq!(
            Assessment::normalize(&raw(json!({ "score": "72/100" }))).score,
            "72/100"
        );
    }

    #[test]
    fn normalize_renders_mixed_recommendation_entries() {
        let assessment = Assessment::normalize(&raw(json!({
            "recommendations": ["Reduce debt", {"title": "Build reserves"}, 42, {"note": "no title"}]
        })));
        assert_eq!(assessment.recommendations, vec!["Reduce debt", "Build reserves"]);
    }

    #[test]
    fn normalize_treats_non_array_recommendations_as_empty() {
        let assessment = Assessment::normalize(&raw(json!({ "recommendations": "none" })));
        assert!(assessment.recommendations.is_empty());
    }

    #[test]
    fn new_session_is_idle_with_default_company() {
        let session = AnalysisSession::new();
        assert_eq!(session.company_id(), 1);
        assert_eq!(*session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn fresh_upload_retargets_without_loading_data() {
        let mut session = AnalysisSession::new();
        let result: UploadResult = serde_json::from_value(json!({
            "message": "Successfully processed 12 records.",
            "company_id": 42,
            "duplicate": false
        }))
        .unwrap();

        session.apply_upload(&result);
        assert_eq!(session.company_id(), 42);
        assert_eq!(*session.phase(), SessionPhase::Idle);

        let ticket = session.begin_fetch();
        assert_eq!(ticket.company_id, 42);
    }

    #[test]
    fn duplicate_with_assessment_short_circuits_to_loaded() {
        let mut session = AnalysisSession::new();
        let result: UploadResult = serde_json::from_value(json!({
            "message": "This file was already uploaded. Showing existing analysis.",
            "company_id": 3,
            "duplicate": true,
            "assessment": { "score": 64, "risk_level": "High" }
        }))
        .unwrap();

        session.apply_upload(&result);
        assert_eq!(session.company_id(), 3);
        let assessment = loaded_assessment(&session);
        assert_eq!(assessment.score, "64");
        assert_eq!(assessment.risk_level, "High");
    }

    #[test]
    fn duplicate_without_assessment_stays_idle() {
        let mut session = AnalysisSession::new();
        let result: UploadResult = serde_json::from_value(json!({
            "message": "File already uploaded. Please click 'Load Analysis' to generate assessment.",
            "company_id": 5,
            "duplicate": true
        }))
        .unwrap();

        session.apply_upload(&result);
        assert_eq!(session.company_id(), 5);
        assert_eq!(*session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn fetch_success_replaces_data_wholesale() {
        let mut session = AnalysisSession::new();
        let ticket = session.begin_fetch();
        assert!(session.is_loading());

        let response: AnalysisResponse = serde_json::from_value(json!({
            "company": "Demo SME",
            "assessment": { "score": 78, "risk_level": "Medium", "narrative": "...", "recommendations": ["Reduce debt"] }
        }))
        .unwrap();
        session.complete_fetch(ticket, Ok(response));

        let assessment = loaded_assessment(&session);
        assert_eq!(assessment.score, "78");
        assert_eq!(assessment.recommendations, vec!["Reduce debt"]);
    }

    #[test]
    fn not_found_and_generic_failure_surface_distinct_messages() {
        let mut session = AnalysisSession::new();
        let ticket = session.begin_fetch();
        session.complete_fetch(ticket, Err(ApiError::NoAnalysisData));
        let not_found = match session.phase() {
            SessionPhase::Error(message) => message.clone(),
            other => panic!("expected error phase, got {other:?}"),
        };

        let ticket = session.begin_fetch();
        session.complete_fetch(
            ticket,
            Err(ApiError::Analysis {
                status: Some(500),
                detail: "boom".into(),
            }),
        );
        let failed = match session.phase() {
            SessionPhase::Error(message) => message.clone(),
            other => panic!("expected error phase, got {other:?}"),
        };

        assert_ne!(not_found, failed);
        assert_eq!(not_found, "No data found. Please upload a file first.");
        assert_eq!(failed, "Analysis failed");
    }

    #[test]
    fn error_messages_follow_session_locale() {
        let mut session = AnalysisSession::with_locale(Locale::Hi);
        let ticket = session.begin_fetch();
        session.complete_fetch(ticket, Err(ApiError::NoAnalysisData));
        assert_eq!(
            *session.phase(),
            SessionPhase::Error(Locale::Hi.resolve().error_no_data.to_string())
        );
    }

    #[test]
    fn stale_ticket_cannot_overwrite_newer_fetch() {
        let mut session = AnalysisSession::new();
        let first = session.begin_fetch();
        let second = session.begin_fetch();

        // The older request resolves late; it must be discarded.
        session.complete_fetch(
            first,
            Ok(serde_json::from_value(json!({ "company": "Stale Co" })).unwrap()),
        );
        assert!(session.is_loading());

        session.complete_fetch(
            second,
            Ok(serde_json::from_value(json!({ "company": "Fresh Co" })).unwrap()),
        );
        match session.phase() {
            SessionPhase::Loaded(data) => assert_eq!(data.company, "Fresh Co"),
            other => panic!("expected loaded session, got {other:?}"),
        }
    }

    #[test]
    fn late_error_cannot_replace_ingested_duplicate_data() {
        let mut session = AnalysisSession::new();
        let ticket = session.begin_fetch();

        // Upload completes with an inline assessment while the fetch hangs.
        session.ingest_duplicate_assessment(&raw(json!({ "score": 55 })), "Demo SME");
        session.complete_fetch(
            ticket,
            Err(ApiError::Analysis {
                status: Some(502),
                detail: "gateway".into(),
            }),
        );

        assert_eq!(loaded_assessment(&session).score, "55");
    }

    #[test]
    fn refresh_is_allowed_from_loaded_and_error_states() {
        let mut session = AnalysisSession::new();
        let ticket = session.begin_fetch();
        session.complete_fetch(ticket, Err(ApiError::NoAnalysisData));

        let ticket = session.begin_fetch();
        assert!(session.is_loading());
        session.complete_fetch(
            ticket,
            Ok(serde_json::from_value(json!({ "company": "Demo SME" })).unwrap()),
        );
        assert!(matches!(session.phase(), SessionPhase::Loaded(_)));

        session.begin_fetch();
        assert!(session.is_loading());
    }

    #[test]
    fn locale_is_free_before_load_and_locked_after() {
        let mut session = AnalysisSession::new();
        session.set_locale(Locale::Ta).unwrap();
        assert_eq!(session.locale(), Locale::Ta);

        let ticket = session.begin_fetch();
        assert_eq!(session.set_locale(Locale::Hi), Err(LocaleLocked));

        session.complete_fetch(
            ticket,
            Ok(serde_json::from_value(json!({ "company": "Demo SME" })).unwrap()),
        );
        assert_eq!(session.set_locale(Locale::Hi), Err(LocaleLocked));
        assert_eq!(session.locale(), Locale::Ta);
    }

    proptest! {
        #[test]
        fn normalize_never_yields_empty_display_fields(
            score in option::of(prop_oneof![
                any::<f64>().prop_map(|n| json!(n)),
                ".{0,24}".prop_map(|s| json!(s)),
            ]),
            risk in option::of(".{0,16}"),
            narrative in option::of(".{0,64}"),
            recommendations in option::of(proptest::collection::vec(".{0,24}", 0..4)),
        ) {
            let raw = RawAssessment {
                score,
                risk_level: risk,
                narrative,
                recommendations: recommendations.map(|items| json!(items)),
            };
            let assessment = Assessment::normalize(&raw);
            prop_assert!(!assessment.score.trim().is_empty());
            prop_assert!(!assessment.risk_level.trim().is_empty());
            prop_assert!(!assessment.narrative.trim().is_empty());
        }
    }
}
