use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::domain::{CompletedDownload, DownloadError};

/// The platform facility listing finished downloads.
#[async_trait]
pub trait DownloadRegistry: Send + Sync {
    async fn register(&self, entry: &CompletedDownload) -> Result<(), DownloadError>;
}

/// Desktop stand-in for the download index: one JSON line per file in
/// `<data dir>/downloads.jsonl`.
#[derive(Debug, Clone)]
pub struct JournalRegistry {
    journal_path: PathBuf,
}

#[derive(Serialize)]
struct JournalLine<'a> {
    #[serde(flatten)]
    entry: &'a CompletedDownload,
    registered_at: String,
}

impl JournalRegistry {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            journal_path: data_dir.as_ref().join("downloads.jsonl"),
        }
    }

    pub fn journal_path(&self) -> &Path {
        &self.journal_path
    }
}

#[async_trait]
impl DownloadRegistry for JournalRegistry {
    async fn register(&self, entry: &CompletedDownload) -> Result<(), DownloadError> {
        let failed = |e: &dyn std::fmt::Display| DownloadError::RegistrationFailed(e.to_string());

        if let Some(parent) = self.journal_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| failed(&e))?;
        }

        let line = JournalLine {
            entry,
            registered_at: chrono::Local::now().to_rfc3339(),
        };
        let mut json = serde_json::to_string(&line).map_err(|e| failed(&e))?;
        json.push('\n');

        let mut journal = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.journal_path)
            .await
            .map_err(|e| failed(&e))?;
        journal.write_all(json.as_bytes()).await.map_err(|e| failed(&e))?;

        log::info!(
            "registered {} ({}) at {}",
            entry.title,
            entry.mime_type,
            entry.file_path.display()
        );
        Ok(())
    }
}
