use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::api::ApiClient;
use crate::domain::DownloadError;

/// Progress callback: `(received_bytes, total_bytes)`.
pub type ProgressFn<'a> = dyn Fn(u64, Option<u64>) + Send + Sync + 'a;

/// Streams a remote file to a local path.
///
/// Dropping the returned future abandons the transfer; implementations must
/// not leave a half-written file at `target` when that happens.
#[async_trait]
pub trait Transfer: Send + Sync {
    async fn fetch(
        &self,
        url: &Url,
        target: &Path,
        progress: &ProgressFn<'_>,
    ) -> Result<(), DownloadError>;
}

/// HTTP transfer writing through a `.part` file that is renamed on success.
#[derive(Clone)]
pub struct HttpTransfer {
    client: ApiClient,
}

impl HttpTransfer {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transfer for HttpTransfer {
    async fn fetch(
        &self,
        url: &Url,
        target: &Path,
        progress: &ProgressFn<'_>,
    ) -> Result<(), DownloadError> {
        let mut part = PartFile::for_target(target);

        let mut file = tokio::fs::File::create(part.path())
            .await
            .map_err(|e| DownloadError::TransferFailed(format!("Failed to create file: {}", e)))?;

        let (total, stream) = self
            .client
            .download_file_stream(url.as_str())
            .await
            .map_err(|e| DownloadError::TransferFailed(e.to_string()))?;
        let mut stream = stream.boxed();

        let mut received: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| DownloadError::TransferFailed(e.to_string()))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| DownloadError::TransferFailed(format!("Write error: {}", e)))?;
            received += chunk.len() as u64;
            progress(received, total);
        }

        file.sync_all()
            .await
            .map_err(|e| DownloadError::TransferFailed(format!("Failed to sync file: {}", e)))?;
        drop(file);

        tokio::fs::rename(part.path(), target)
            .await
            .map_err(|e| DownloadError::TransferFailed(format!("Failed to finalize file: {}", e)))?;
        part.keep();

        log::debug!("{} -> {} ({} bytes)", url, target.display(), received);
        Ok(())
    }
}

/// Distinguishes part files of transfers that share a target name.
static NEXT_PART: AtomicU64 = AtomicU64::new(1);

/// `<target>.<n>.part`, removed on drop unless the transfer finished.
struct PartFile {
    path: PathBuf,
    keep: bool,
}

impl PartFile {
    fn for_target(target: &Path) -> Self {
        let mut path = target.as_os_str().to_owned();
        path.push(format!(".{}.part", NEXT_PART.fetch_add(1, Ordering::Relaxed)));
        Self {
            path: PathBuf::from(path),
            keep: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn keep(&mut self) {
        self.keep = true;
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("could not remove {}: {}", self.path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiConfig;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn transfer() -> HttpTransfer {
        HttpTransfer::new(ApiClient::new(ApiConfig::default()))
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn writes_file_and_reports_progress() {
        let mut server = mockito::Server::new_async().await;
        let body = vec![7u8; 64 * 1024];
        server
            .mock("GET", "/files/doc.pdf")
            .with_status(200)
            .with_body(&body)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("doc.pdf");
        let url = Url::parse(&format!("{}/files/doc.pdf", server.url())).unwrap();

        let reports = Mutex::new(Vec::new());
        let progress = |received: u64, total: Option<u64>| {
            reports.lock().unwrap().push((received, total));
        };
        transfer().fetch(&url, &target, &progress).await.unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), body);
        assert_eq!(dir_entries(dir.path()), vec!["doc.pdf"]);

        let reports = reports.into_inner().unwrap();
        assert!(!reports.is_empty());
        assert!(reports.windows(2).all(|w| w[0].0 <= w[1].0));
        assert_eq!(reports.last(), Some(&(body.len() as u64, Some(body.len() as u64))));
    }

    #[tokio::test]
    async fn http_error_fails_without_leftovers() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing.pdf")
            .with_status(404)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing.pdf");
        let url = Url::parse(&format!("{}/missing.pdf", server.url())).unwrap();

        let err = transfer()
            .fetch(&url, &target, &|_, _| {})
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::TransferFailed(_)));
        assert!(dir_entries(dir.path()).is_empty());
    }

    #[test]
    fn part_file_is_removed_unless_kept() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a.zip");

        let part = PartFile::for_target(&target);
        std::fs::write(part.path(), b"partial").unwrap();
        let part_path = part.path().to_path_buf();
        drop(part);
        assert!(!part_path.exists());

        let mut part = PartFile::for_target(&target);
        std::fs::write(part.path(), b"done").unwrap();
        part.keep();
        let part_path = part.path().to_path_buf();
        drop(part);
        assert!(part_path.exists());
    }

    #[test]
    fn part_files_for_same_target_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("report_2024-01-02_03-04-05.pdf");

        let superseded = PartFile::for_target(&target);
        let current = PartFile::for_target(&target);
        assert_ne!(superseded.path(), current.path());

        std::fs::write(superseded.path(), b"old").unwrap();
        std::fs::write(current.path(), b"new").unwrap();
        drop(superseded);

        assert_eq!(std::fs::read(current.path()).unwrap(), b"new");
        std::fs::rename(current.path(), &target).unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"new");
    }
}
