pub mod api;
pub mod export;
pub mod locale;
pub mod session;
pub mod view;

pub use api::{
    http::HttpBackend, AnalysisResponse, ApiError, BackendApi, BackendSettings, RawAssessment,
    UploadResult,
};
pub use export::{request_report, ReportPolicy};
pub use locale::{Locale, StringTable};
pub use session::{
    upload::{UploadCoordinator, UploadOutcome, UploadRejected},
    AnalysisData, AnalysisSession, Assessment, FetchTicket, LocaleLocked, SessionPhase,
    DEFAULT_COMPANY_ID, DEFAULT_COMPANY_LABEL,
};
pub use view::{compose, render_view, DashboardView, OutputFormat, ViewModel};
