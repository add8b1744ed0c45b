use std::path::{Path, PathBuf};
use std::time::SystemTime;

use url::Url;

/// One navigation attempt raised by the embedded web content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub url: String,
}

impl NavigationEvent {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Which of the two storage locations a download directory lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadLocation {
    /// `<downloads>/<folder>`
    Primary(PathBuf),
    /// `<documents>/<folder>`, used when the primary one cannot be created.
    Fallback(PathBuf),
}

impl DownloadLocation {
    pub fn path(&self) -> &Path {
        match self {
            DownloadLocation::Primary(path) | DownloadLocation::Fallback(path) => path,
        }
    }

    /// Name of the storage area as the user sees it in a file browser.
    pub fn area_label(&self) -> &'static str {
        match self {
            DownloadLocation::Primary(_) => "Download",
            DownloadLocation::Fallback(_) => "Documents",
        }
    }
}

/// Where a task writes its file. Computed once per task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDestination {
    pub location: DownloadLocation,
    pub file_name: String,
    pub file_path: PathBuf,
}

impl ResolvedDestination {
    pub fn new(location: DownloadLocation, file_name: String) -> Self {
        let file_path = location.path().join(&file_name);
        Self {
            location,
            file_name,
            file_path,
        }
    }

    pub fn directory(&self) -> &Path {
        self.location.path()
    }

    /// `Download > Kota-Career > report_2024-01-02_03-04-05.pdf`
    pub fn display_location(&self) -> String {
        let folder = self
            .directory()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!(
            "{} > {} > {}",
            self.location.area_label(),
            folder,
            self.file_name
        )
    }
}

/// Progress milestones a transfer reports, in percent.
pub const PROGRESS_STEP: u8 = 25;

/// The transfer a download task is running.
#[derive(Debug, Clone)]
pub struct DownloadTask {
    pub source_url: Url,
    pub target_path: PathBuf,
    pub started_at: SystemTime,
    pub bytes_received: u64,
    pub bytes_total: Option<u64>,
    last_milestone: u8,
}

impl DownloadTask {
    pub fn new(source_url: Url, target_path: PathBuf) -> Self {
        Self {
            source_url,
            target_path,
            started_at: SystemTime::now(),
            bytes_received: 0,
            bytes_total: None,
            last_milestone: 0,
        }
    }

    /// Records a progress report and returns the milestone (25, 50, 75, 100)
    /// that was newly reached, if any.
    ///
    /// Byte counts never move backwards. Without a known total nothing is
    /// reported.
    pub fn record_progress(&mut self, received: u64, total: Option<u64>) -> Option<u8> {
        self.bytes_received = self.bytes_received.max(received);
        if total.is_some() {
            self.bytes_total = total;
        }

        let percent = self.percent()?;
        let milestone = percent / PROGRESS_STEP * PROGRESS_STEP;
        if milestone > self.last_milestone {
            self.last_milestone = milestone;
            Some(milestone)
        } else {
            None
        }
    }

    /// `floor(received / total * 100)`, capped at 100.
    pub fn percent(&self) -> Option<u8> {
        let total = self.bytes_total.filter(|total| *total > 0)?;
        let percent = (u128::from(self.bytes_received) * 100 / u128::from(total)).min(100);
        Some(percent as u8)
    }
}

/// Entry handed to the OS download index once a file is on disk.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CompletedDownload {
    pub title: String,
    pub description: String,
    pub mime_type: String,
    pub file_path: PathBuf,
    pub notify: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogLevel {
    Info,
    Error,
}

/// A blocking message with a single acknowledgement action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub level: DialogLevel,
    pub title: String,
    pub body: String,
}

impl Dialog {
    pub fn download_complete(destination: &ResolvedDestination) -> Self {
        Self {
            level: DialogLevel::Info,
            title: "Download Complete!".to_string(),
            body: format!(
                "File saved successfully!\n\nLocation:\n{}\n\nOr check notification area and tap to open.",
                destination.display_location()
            ),
        }
    }

    pub fn download_failed() -> Self {
        Self {
            level: DialogLevel::Error,
            title: "Download Failed".to_string(),
            body: "Please try again.".to_string(),
        }
    }
}

/// What the shell shows the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackEvent {
    /// Short-lived, non-blocking notice.
    Notice(String),
    Dialog(Dialog),
}
