use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::{AnalysisResponse, ApiError, BackendApi, BackendSettings, UploadResult};
use crate::locale::Locale;

/// HTTP implementation of [`BackendApi`] against the platform backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(settings: &BackendSettings) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent("sme-health/0.3")
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadResult, ApiError> {
        debug!(file_name, size = bytes.len(), "uploading document");
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        let response = self
            .http
            .post(self.endpoint("/upload"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ApiError::Upload {
                status: Some(status.as_u16()),
                detail,
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn analyze(
        &self,
        company_id: i64,
        locale: Locale,
    ) -> Result<AnalysisResponse, ApiError> {
        let url = format!(
            "{}/analyze/{}?language={}",
            self.base_url, company_id, locale
        );
        debug!(company_id, language = %locale, "requesting analysis");
        let response = self.http.post(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NoAnalysisData);
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ApiError::Analysis {
                status: Some(status.as_u16()),
                detail,
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn download_report(&self, company_id: i64) -> Result<Vec<u8>, ApiError> {
        let response = self
            .http
            .get(self.endpoint(&format!("/download-report/{company_id}")))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ApiError::Report {
                status: status.as_u16(),
                detail,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn reset_db(&self) -> Result<(), ApiError> {
        let response = self.http.post(self.endpoint("/reset-db")).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ApiError::Reset { detail });
        }
        Ok(())
    }
}
