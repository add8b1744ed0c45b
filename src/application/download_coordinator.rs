use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    application::{
        directories::DownloadDirectories, feedback::Feedback, registry::DownloadRegistry,
        transfer::Transfer,
    },
    domain::{CompletedDownload, Dialog, DownloadError, DownloadTask, ResolvedDestination},
    utils::{derive_name, epoch_millis, original_name_from_url, resolve_mime},
};

/// Identifies one accepted download request.
pub type TaskId = u64;

/// Collaborators the coordinator drives.
#[derive(Clone)]
pub struct DownloadServices {
    pub transfer: Arc<dyn Transfer>,
    pub registry: Arc<dyn DownloadRegistry>,
    pub feedback: Arc<dyn Feedback>,
    pub directories: DownloadDirectories,
}

/// The in-flight download as seen from outside its worker.
struct ActiveDownload {
    id: TaskId,
    source_url: Url,
    started_at: SystemTime,
    cancel: CancellationToken,
}

struct Inner {
    services: DownloadServices,
    runtime: Handle,
    active: Mutex<Option<ActiveDownload>>,
    next_id: AtomicU64,
}

/// Owns the single download slot.
///
/// A new request cancels whatever is in flight; the newest request always
/// wins. Results reach the user through [`Feedback`], never as return values.
#[derive(Clone)]
pub struct DownloadCoordinator {
    inner: Arc<Inner>,
}

struct Finished {
    destination: ResolvedDestination,
}

impl DownloadCoordinator {
    pub fn new(services: DownloadServices, runtime: Handle) -> Self {
        Self {
            inner: Arc::new(Inner {
                services,
                runtime,
                active: Mutex::new(None),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Accepts `url` for download, superseding any in-flight task.
    ///
    /// Returns `None` without side effects when `url` is not an absolute
    /// http(s) URL.
    pub fn start_download(&self, url: &str) -> Option<TaskId> {
        let source_url = match parse_source_url(url) {
            Ok(source_url) => source_url,
            Err(e) => {
                log::debug!("ignoring download request: {}", e);
                return None;
            }
        };

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        {
            let mut slot = self.lock_slot();
            if let Some(previous) = slot.take() {
                log::info!(
                    "superseding download {} of {} (running for {:?})",
                    previous.id,
                    previous.source_url,
                    previous.started_at.elapsed().unwrap_or_default()
                );
                previous.cancel.cancel();
            }
            *slot = Some(ActiveDownload {
                id,
                source_url: source_url.clone(),
                started_at: SystemTime::now(),
                cancel: cancel.clone(),
            });
        }

        let coordinator = self.clone();
        self.inner.runtime.spawn(async move {
            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => Err(DownloadError::TransferCancelled),
                outcome = coordinator.execute(&source_url, &cancel) => outcome,
            };
            coordinator.finish(id, outcome);
        });

        Some(id)
    }

    /// Cancels the in-flight download, if any. The user sees nothing further
    /// from it.
    pub fn cancel_active(&self) -> bool {
        match self.lock_slot().take() {
            Some(active) => {
                log::info!("download {} of {} cancelled", active.id, active.source_url);
                active.cancel.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.lock_slot().is_some()
    }

    pub fn active_url(&self) -> Option<Url> {
        self.lock_slot()
            .as_ref()
            .map(|active| active.source_url.clone())
    }

    fn lock_slot(&self) -> MutexGuard<'_, Option<ActiveDownload>> {
        self.inner
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    async fn execute(
        &self,
        source_url: &Url,
        cancel: &CancellationToken,
    ) -> Result<Finished, DownloadError> {
        let services = &self.inner.services;

        let location = services.directories.resolve().await?;
        let original_name = original_name_from_url(source_url, epoch_millis());
        let file_name = derive_name(&original_name, chrono::Local::now().naive_local());
        let destination = ResolvedDestination::new(location, file_name);

        services
            .feedback
            .notice(format!("Downloading: {}", destination.file_name));

        let task = Mutex::new(DownloadTask::new(
            source_url.clone(),
            destination.file_path.clone(),
        ));
        let progress = |received: u64, total: Option<u64>| {
            let milestone = task
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .record_progress(received, total);
            if let Some(percent) = milestone {
                if !cancel.is_cancelled() {
                    services.feedback.notice(format!("{}%", percent));
                }
            }
        };
        services
            .transfer
            .fetch(source_url, &destination.file_path, &progress)
            .await?;

        let task = task.into_inner().unwrap_or_else(PoisonError::into_inner);
        log::info!(
            "{} -> {} ({} bytes in {:?})",
            task.source_url,
            task.target_path.display(),
            task.bytes_received,
            task.started_at.elapsed().unwrap_or_default()
        );

        let entry = CompletedDownload {
            title: destination.file_name.clone(),
            description: "Tap to open".to_string(),
            mime_type: resolve_mime(&destination.file_name).to_string(),
            file_path: destination.file_path.clone(),
            notify: true,
        };
        if let Err(e) = services.registry.register(&entry).await {
            log::warn!("{} stays on disk unregistered: {}", entry.file_path.display(), e);
        }

        Ok(Finished { destination })
    }

    /// Turns a task outcome into at most one dialog.
    ///
    /// The slot lock is held while the dialog is emitted, so a superseding
    /// request either lands before this check (and this outcome is dropped)
    /// or after the dialog was already sent.
    fn finish(&self, id: TaskId, outcome: Result<Finished, DownloadError>) {
        let mut slot = self.lock_slot();
        if slot.as_ref().map(|active| active.id) != Some(id) {
            log::debug!("download {} no longer current, outcome dropped", id);
            return;
        }
        *slot = None;

        let feedback = &self.inner.services.feedback;
        match outcome {
            Ok(Finished { destination }) => {
                log::info!("download saved to {}", destination.file_path.display());
                feedback.dialog(Dialog::download_complete(&destination));
            }
            Err(e) if e.is_cancelled() => {
                log::info!("download {} cancelled", id);
            }
            Err(e) => {
                log::error!("Download error: {}", e);
                feedback.dialog(Dialog::download_failed());
            }
        }
    }
}

fn parse_source_url(url: &str) -> Result<Url, DownloadError> {
    let parsed = Url::parse(url).map_err(|_| DownloadError::InvalidUrl(url.to_string()))?;
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(parsed),
        _ => Err(DownloadError::InvalidUrl(url.to_string())),
    }
}
