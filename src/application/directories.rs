use std::path::{Path, PathBuf};

use crate::config::ShellConfig;
use crate::domain::{DownloadError, DownloadLocation};

/// Locates the dedicated download folder.
///
/// The folder lives under the public downloads root. When it cannot be
/// created there, the same folder name under the private documents root is
/// used instead.
#[derive(Debug, Clone)]
pub struct DownloadDirectories {
    primary_root: PathBuf,
    fallback_root: PathBuf,
    folder_name: String,
}

impl DownloadDirectories {
    pub fn new(
        primary_root: impl Into<PathBuf>,
        fallback_root: impl Into<PathBuf>,
        folder_name: impl Into<String>,
    ) -> Self {
        Self {
            primary_root: primary_root.into(),
            fallback_root: fallback_root.into(),
            folder_name: folder_name.into(),
        }
    }

    pub fn from_config(config: &ShellConfig) -> Self {
        Self::new(
            &config.primary_root,
            &config.fallback_root,
            &config.folder_name,
        )
    }

    pub fn primary_dir(&self) -> PathBuf {
        self.primary_root.join(&self.folder_name)
    }

    pub fn fallback_dir(&self) -> PathBuf {
        self.fallback_root.join(&self.folder_name)
    }

    /// Returns an existing directory, creating it if needed. Idempotent.
    ///
    /// # Errors
    ///
    /// `DirectoryUnavailable` when neither location can be materialized.
    pub async fn resolve(&self) -> Result<DownloadLocation, DownloadError> {
        let primary = self.primary_dir();
        if ensure_dir(&primary).await {
            return Ok(DownloadLocation::Primary(primary));
        }

        let fallback = self.fallback_dir();
        log::warn!(
            "{} unavailable, falling back to {}",
            primary.display(),
            fallback.display()
        );
        if ensure_dir(&fallback).await {
            Ok(DownloadLocation::Fallback(fallback))
        } else {
            Err(DownloadError::DirectoryUnavailable(format!(
                "neither {} nor {} could be created",
                primary.display(),
                fallback.display()
            )))
        }
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}

async fn ensure_dir(path: &Path) -> bool {
    if is_dir(path).await {
        return true;
    }
    match tokio::fs::create_dir_all(path).await {
        Ok(()) => log::info!("Folder created: {}", path.display()),
        Err(e) => log::warn!("mkdir failed for {}: {}", path.display(), e),
    }
    is_dir(path).await
}
