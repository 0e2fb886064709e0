use thiserror::Error;

/// Every failure the client can surface to the user.
///
/// The `Display` text is what the UI shows, so keep it readable.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Please upload a job description and at least one resume.")]
    MissingInput,

    #[error("Please log in to upload files.")]
    Unauthenticated,

    #[error("Your session has expired. Please log in again.")]
    SessionExpired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("An error occurred while processing the files: {0}")]
    UploadFailed(String),

    #[error("No results to export.")]
    NothingToExport,

    #[error("An upload is already in progress")]
    UploadInProgress,

    #[error("Could not reach the matching service: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Export failed: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

impl ClientError {
    /// Failures that mean the stored credential is no longer usable.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthenticated | ClientError::SessionExpired
        )
    }
}
