use std::time::{Duration, Instant};

use crate::application::download_coordinator::{DownloadCoordinator, TaskId};
use crate::domain::NavigationEvent;

/// Markers that make a navigation a download.
///
/// Matched as substrings anywhere in the lowercased URL, not as suffixes, so
/// `https://x.com/a.pdf?x=1` and `https://x.com/a.docs/page` both count.
pub const DOWNLOAD_MARKERS: [&str; 6] = [".pdf", ".doc", ".docx", ".zip", ".jpg", ".png"];

pub fn is_download_url(url: &str) -> bool {
    let lowered = url.to_lowercase();
    DOWNLOAD_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Anything able to take over a download-classified URL.
pub trait DownloadLauncher {
    fn launch(&self, url: &str) -> Option<TaskId>;
}

impl DownloadLauncher for DownloadCoordinator {
    fn launch(&self, url: &str) -> Option<TaskId> {
        self.start_download(url)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Let the web view navigate.
    Allow,
    /// Keep the current page; the URL went to the downloader.
    Download,
}

impl NavigationDecision {
    pub fn allows_navigation(self) -> bool {
        self == NavigationDecision::Allow
    }
}

#[derive(Debug)]
struct LastSeen {
    url: String,
    expires_at: Option<Instant>,
}

/// Decides, per navigation intent, whether the web view may proceed.
pub struct NavigationInterceptor<L = DownloadCoordinator> {
    launcher: L,
    dedup_window: Duration,
    last_seen: Option<LastSeen>,
}

impl<L: DownloadLauncher> NavigationInterceptor<L> {
    pub fn new(launcher: L, dedup_window: Duration) -> Self {
        Self {
            launcher,
            dedup_window,
            last_seen: None,
        }
    }

    pub fn on_navigation(&mut self, event: &NavigationEvent) -> bool {
        self.should_allow_navigation(&event.url)
    }

    pub fn should_allow_navigation(&mut self, url: &str) -> bool {
        self.decide(url, Instant::now()).allows_navigation()
    }

    /// A repeat of the last URL is let through without reclassifying, so a
    /// download link is not launched twice while its dedup window is open.
    pub fn decide(&mut self, url: &str, now: Instant) -> NavigationDecision {
        if let Some(last) = &self.last_seen {
            let live = last.expires_at.map_or(true, |expires_at| now < expires_at);
            if live && last.url == url {
                log::debug!("repeated navigation to {}", url);
                return NavigationDecision::Allow;
            }
        }

        if is_download_url(url) {
            self.last_seen = Some(LastSeen {
                url: url.to_string(),
                expires_at: Some(now + self.dedup_window),
            });
            if self.launcher.launch(url).is_none() {
                log::warn!("download link {} could not be started", url);
            }
            NavigationDecision::Download
        } else {
            self.last_seen = Some(LastSeen {
                url: url.to_string(),
                expires_at: None,
            });
            NavigationDecision::Allow
        }
    }
}
