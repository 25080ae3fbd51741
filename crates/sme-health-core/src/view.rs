use std::fmt::Write;

use serde::Serialize;

use crate::export::ReportPolicy;
use crate::locale::{Locale, StringTable};
use crate::session::{AnalysisSession, SessionPhase};

/// Format styles supported by the default renderers.
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Locale-resolved, default-filled structure the presentation layer renders
/// directly. Precedence: loading, then error, then empty, then dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewModel {
    Loading {
        message: String,
    },
    Error {
        message: String,
    },
    /// Nothing loaded yet: offer the language selector and the load action,
    /// with the pick-language-first notice.
    Empty {
        notice: String,
        no_data: String,
        load_label: String,
        languages: Vec<LanguageOption>,
    },
    Dashboard(DashboardView),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageOption {
    pub code: String,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub heading: String,
    pub score_label: String,
    pub score: String,
    pub risk_label: String,
    pub risk_level: String,
    pub assessment_label: String,
    pub narrative: String,
    pub recommendations_label: String,
    pub recommendations: Vec<String>,
    pub refresh_label: String,
    /// Present only when the report policy allows the session's locale.
    pub download_label: Option<String>,
}

/// Derive the renderable view from session state. Pure; assessments arrive
/// already normalized, so only the empty-recommendations notice is filled in
/// here.
pub fn compose(
    session: &AnalysisSession,
    table: &StringTable,
    policy: &ReportPolicy,
) -> ViewModel {
    match session.phase() {
        SessionPhase::Loading => ViewModel::Loading {
            message: table.loading.to_string(),
        },
        SessionPhase::Error(message) => ViewModel::Error {
            message: message.clone(),
        },
        SessionPhase::Idle => ViewModel::Empty {
            notice: table.language_notice.to_string(),
            no_data: table.no_data.to_string(),
            load_label: table.analyze_button.to_string(),
            languages: Locale::ALL
                .iter()
                .map(|locale| LanguageOption {
                    code: locale.code().to_string(),
                    label: locale.native_name().to_string(),
                    active: *locale == session.locale(),
                })
                .collect(),
        },
        SessionPhase::Loaded(data) => {
            let assessment = &data.assessment;
            let recommendations = if assessment.recommendations.is_empty() {
                vec![table.no_recommendations.to_string()]
            } else {
                assessment.recommendations.clone()
            };
            ViewModel::Dashboard(DashboardView {
                heading: format!(
                    "{} for {} ({})",
                    table.assessment_label,
                    data.company,
                    session.locale().native_name()
                ),
                score_label: table.score_label.to_string(),
                score: assessment.score.clone(),
                risk_label: table.risk_label.to_string(),
                risk_level: assessment.risk_level.clone(),
                assessment_label: table.assessment_label.to_string(),
                narrative: assessment.narrative.clone(),
                recommendations_label: table.recommendations_label.to_string(),
                recommendations,
                refresh_label: table.refresh_button.to_string(),
                download_label: policy
                    .allows(session.locale())
                    .then(|| table.download_report.to_string()),
            })
        }
    }
}

/// Produce terminal or JSON output for a composed view.
pub fn render_view(view: &ViewModel, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Human => render_human(view),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
    }
}

fn render_human(view: &ViewModel) -> anyhow::Result<String> {
    let mut out = String::new();
    match view {
        ViewModel::Loading { message } => writeln!(out, "{message}")?,
        ViewModel::Error { message } => writeln!(out, "Error: {message}")?,
        ViewModel::Empty {
            notice,
            no_data,
            load_label,
            languages,
        } => {
            writeln!(out, "{no_data}")?;
            writeln!(out, "{notice}")?;
            let selector = languages
                .iter()
                .map(|option| {
                    if option.active {
                        format!("[{}]", option.label)
                    } else {
                        option.label.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(out, "Languages: {selector}")?;
            writeln!(out, "Action: {load_label}")?;
        }
        ViewModel::Dashboard(dashboard) => {
            writeln!(out, "{}", dashboard.heading)?;
            writeln!(out)?;
            writeln!(out, "{}: {}", dashboard.score_label, dashboard.score)?;
            writeln!(out, "{}: {}", dashboard.risk_label, dashboard.risk_level)?;
            writeln!(out)?;
            writeln!(out, "{}:", dashboard.assessment_label)?;
            writeln!(out, "{}", dashboard.narrative)?;
            writeln!(out)?;
            writeln!(out, "{}:", dashboard.recommendations_label)?;
            for recommendation in &dashboard.recommendations {
                writeln!(out, "  - {recommendation}")?;
            }
            write!(out, "\nActions: {}", dashboard.refresh_label)?;
            if let Some(download) = &dashboard.download_label {
                write!(out, " | {download}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(out)
}
