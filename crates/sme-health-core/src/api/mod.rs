pub mod http;
mod settings;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::locale::Locale;

pub use settings::BackendSettings;

/// Response body of `POST /upload`.
///
/// `company_id` and `assessment` are both optional: a fresh upload carries
/// only the id, a duplicate of an analyzed file carries both.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub company_id: Option<i64>,
    #[serde(default)]
    pub duplicate: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub assessment: Option<RawAssessment>,
}

/// Assessment payload exactly as the backend emits it. Every field may be
/// absent, `score` is string-or-number and `recommendations` is an array of
/// strings or `{title}` objects, so the loose shapes stay `serde_json::Value`
/// until [`crate::session::Assessment::normalize`] canonicalizes them once.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAssessment {
    #[serde(default)]
    pub score: Option<serde_json::Value>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub narrative: Option<String>,
    #[serde(default)]
    pub recommendations: Option<serde_json::Value>,
}

/// Response body of `POST /analyze/{company_id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub assessment: Option<RawAssessment>,
}

/// Failure taxonomy for backend calls. Every operation converts transport
/// and status failures at its own boundary; nothing crosses it as a panic.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx or malformed reply from `/upload`.
    #[error("upload failed: {detail}")]
    Upload { status: Option<u16>, detail: String },
    /// 404 from `/analyze`: the company has no uploaded data yet. Kept
    /// separate from [`ApiError::Analysis`] because it is user-correctable.
    #[error("no analysis data for this company")]
    NoAnalysisData,
    /// Any other non-2xx from `/analyze`.
    #[error("analysis failed: {detail}")]
    Analysis { status: Option<u16>, detail: String },
    /// Non-2xx from `/download-report`.
    #[error("report download failed ({status}): {detail}")]
    Report { status: u16, detail: String },
    /// Non-2xx from `/reset-db`. No client state is mutated on this path.
    #[error("database reset failed: {detail}")]
    Reset { detail: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed backend response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// Client abstraction over the SME health backend, so sessions can be driven
/// by the HTTP implementation or an in-memory fake in tests.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// `POST /upload` with a multipart `file` field.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadResult, ApiError>;

    /// `POST /analyze/{company_id}?language={locale}`.
    async fn analyze(
        &self,
        company_id: i64,
        locale: Locale,
    ) -> Result<AnalysisResponse, ApiError>;

    /// `GET /download-report/{company_id}`. The document is opaque bytes.
    async fn download_report(&self, company_id: i64) -> Result<Vec<u8>, ApiError>;

    /// `POST /reset-db`. Destructive; callers must confirm with the user
    /// before invoking this.
    async fn reset_db(&self) -> Result<(), ApiError>;
}
