use thiserror::Error;

/// Everything that can end a download task.
///
/// Only `TransferCancelled` is kept away from the user; every other kind ends
/// in the failure dialog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownloadError {
    #[error("Not an absolute http(s) URL: {0}")]
    InvalidUrl(String),

    #[error("No download directory available: {0}")]
    DirectoryUnavailable(String),

    #[error("Transfer canceled")]
    TransferCancelled,

    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    #[error("Download registration failed: {0}")]
    RegistrationFailed(String),
}

impl DownloadError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DownloadError::TransferCancelled)
    }
}

/// Start-up failures of the shell itself.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UI error: {0}")]
    Ui(#[from] iced::Error),
}
