use crate::api::{ApiError, BackendApi, BackendSettings};
use crate::locale::Locale;

/// Capability gate for report downloads. The backend renders reports in
/// English today; `all_locales` (settings-driven) widens the offer without a
/// code change once multi-language rendering lands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportPolicy {
    pub all_locales: bool,
}

impl ReportPolicy {
    pub fn from_settings(settings: &BackendSettings) -> Self {
        Self {
            all_locales: settings.report_all_locales,
        }
    }

    pub fn allows(&self, locale: Locale) -> bool {
        self.all_locales || locale == Locale::En
    }
}

/// Fetch the rendered report document for a company. Fire-and-forget from
/// the session's perspective; the caller decides where the bytes go.
pub async fn request_report(
    api: &dyn BackendApi,
    company_id: i64,
) -> Result<Vec<u8>, ApiError> {
    api.download_report(company_id).await
}
