//! Fakes shared by the application tests.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use url::Url;

use super::feedback::Feedback;
use super::registry::DownloadRegistry;
use super::transfer::{ProgressFn, Transfer};
use crate::domain::{CompletedDownload, Dialog, DownloadError, FeedbackEvent};

/// Polls `condition` until it holds; panics after five seconds.
pub async fn wait_until(condition: impl Fn() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[derive(Default)]
pub struct FakeTransfer {
    progress: Vec<(u64, Option<u64>)>,
    failure: Option<DownloadError>,
    gate: Option<Semaphore>,
    calls: Mutex<Vec<Url>>,
}

impl FakeTransfer {
    pub fn with_progress(progress: Vec<(u64, Option<u64>)>) -> Self {
        Self {
            progress,
            ..Self::default()
        }
    }

    pub fn failing(error: DownloadError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Every fetch waits for a [`FakeTransfer::release`] permit.
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    pub fn calls(&self) -> Vec<Url> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transfer for FakeTransfer {
    async fn fetch(
        &self,
        url: &Url,
        target: &Path,
        progress: &ProgressFn<'_>,
    ) -> Result<(), DownloadError> {
        self.calls.lock().unwrap().push(url.clone());
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        for (received, total) in &self.progress {
            progress(*received, *total);
        }
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        tokio::fs::write(target, b"%PDF-1.4")
            .await
            .map_err(|e| DownloadError::TransferFailed(e.to_string()))
    }
}

#[derive(Default)]
pub struct FakeRegistry {
    fail: bool,
    entries: Mutex<Vec<CompletedDownload>>,
}

impl FakeRegistry {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn entries(&self) -> Vec<CompletedDownload> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DownloadRegistry for FakeRegistry {
    async fn register(&self, entry: &CompletedDownload) -> Result<(), DownloadError> {
        if self.fail {
            return Err(DownloadError::RegistrationFailed("index unavailable".into()));
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingFeedback {
    events: Mutex<Vec<FeedbackEvent>>,
}

impl RecordingFeedback {
    pub fn events(&self) -> Vec<FeedbackEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                FeedbackEvent::Notice(text) => Some(text),
                FeedbackEvent::Dialog(_) => None,
            })
            .collect()
    }

    pub fn dialogs(&self) -> Vec<Dialog> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                FeedbackEvent::Dialog(dialog) => Some(dialog),
                FeedbackEvent::Notice(_) => None,
            })
            .collect()
    }
}

impl Feedback for RecordingFeedback {
    fn notice(&self, text: String) {
        self.events.lock().unwrap().push(FeedbackEvent::Notice(text));
    }

    fn dialog(&self, dialog: Dialog) {
        self.events.lock().unwrap().push(FeedbackEvent::Dialog(dialog));
    }
}
