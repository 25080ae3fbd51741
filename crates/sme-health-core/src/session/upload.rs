use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};

use crate::api::{BackendApi, UploadResult};
use crate::locale::StringTable;

/// Document extensions the upload UI advertises. Advisory only; submission
/// never rejects a file by extension.
pub const ADVISORY_EXTENSIONS: [&str; 2] = ["csv", "xlsx"];

pub fn has_advisory_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ADVISORY_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Classified result of a successful upload submission.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// Duplicate of an analyzed file; the response carries the assessment
    /// inline and no analysis call is needed.
    AutoLoaded(UploadResult),
    /// Duplicate of a known file the backend has not analyzed yet; analysis
    /// must still be triggered manually.
    DuplicateAwaitingAnalysis(UploadResult),
    /// New upload carrying a fresh company id.
    Fresh(UploadResult),
}

impl UploadOutcome {
    pub fn classify(result: UploadResult) -> Self {
        if result.duplicate && result.assessment.is_some() {
            Self::AutoLoaded(result)
        } else if result.duplicate {
            Self::DuplicateAwaitingAnalysis(result)
        } else {
            Self::Fresh(result)
        }
    }

    pub fn result(&self) -> &UploadResult {
        match self {
            Self::AutoLoaded(result)
            | Self::DuplicateAwaitingAnalysis(result)
            | Self::Fresh(result) => result,
        }
    }

    /// Status line shown after the submission, echoing the backend message.
    pub fn status_line(&self) -> String {
        match self {
            Self::AutoLoaded(result) => {
                format!("{} Analysis loaded automatically.", result.message)
            }
            Self::DuplicateAwaitingAnalysis(result) => result.message.clone(),
            Self::Fresh(result) => format!("Success: {}", result.message),
        }
    }
}

/// Precondition violations for [`UploadCoordinator::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UploadRejected {
    #[error("no file selected")]
    NoFileSelected,
    #[error("an upload is already in flight")]
    AlreadyInFlight,
}

/// Tracks one pending file and at most one submission in flight.
#[derive(Debug, Default)]
pub struct UploadCoordinator {
    pending: Option<PathBuf>,
    uploading: bool,
    status: Option<String>,
}

impl UploadCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the file to submit. Any path is accepted; extension filtering
    /// is a UI hint, not a rule.
    pub fn select_file(&mut self, path: impl Into<PathBuf>) {
        self.pending = Some(path.into());
    }

    pub fn pending_file(&self) -> Option<&Path> {
        self.pending.as_deref()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Latest status line, kept until dismissed or replaced.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Submit the pending file. Network and read failures become the
    /// retained status and yield `Ok(None)`; the selection is preserved so
    /// the user can retry. Precondition violations are the only errors.
    pub async fn submit(
        &mut self,
        api: &dyn BackendApi,
        table: &StringTable,
    ) -> Result<Option<UploadOutcome>, UploadRejected> {
        let path = self
            .pending
            .clone()
            .ok_or(UploadRejected::NoFileSelected)?;
        if self.uploading {
            return Err(UploadRejected::AlreadyInFlight);
        }

        self.uploading = true;
        self.status = Some(table.uploading.to_string());

        let submitted = self.run_submission(api, table, &path).await;
        self.uploading = false;
        Ok(submitted)
    }

    async fn run_submission(
        &mut self,
        api: &dyn BackendApi,
        table: &StringTable,
        path: &Path,
    ) -> Option<UploadOutcome> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not read upload file");
                self.status = Some(format!("{}: {err}", table.error_upload));
                return None;
            }
        };
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        match api.upload(&file_name, bytes).await {
            Ok(result) => {
                let outcome = UploadOutcome::classify(result);
                info!(
                    file = %file_name,
                    duplicate = outcome.result().duplicate,
                    "upload completed"
                );
                self.status = Some(outcome.status_line());
                Some(outcome)
            }
            Err(err) => {
                warn!(file = %file_name, error = %err, "upload failed");
                self.status = Some(format!("{}: {err}", table.error_upload));
                None
            }
        }
    }
}
