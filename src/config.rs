//! Shell configuration.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SITE_URL: &str = "https://kotacareer.rusofterp.com";
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://kotacareer.rusofterp.com/api/saveDeviceToken";
pub const DEFAULT_FOLDER_NAME: &str = "Kota-Career";

/// Configuration for the shell and its download pipeline.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// The single site rendered by the shell.
    pub site_url: String,
    /// Backend endpoint receiving device-token registrations.
    pub token_endpoint: String,
    /// Dedicated folder created under the download roots.
    pub folder_name: String,
    /// Public downloads location.
    pub primary_root: PathBuf,
    /// Private documents location used when the primary folder cannot be created.
    pub fallback_root: PathBuf,
    /// Where the download journal lives.
    pub data_dir: PathBuf,
    /// How long a repeated download URL is not reclassified.
    pub dedup_window: Duration,
    /// How long a transient notice stays visible.
    pub notice_ttl: Duration,
    /// Push token handed over by the notification subsystem.
    pub device_token: Option<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let fallback_root = dirs::document_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| home.join(".local").join("share"))
            .join("kota-shell");

        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            token_endpoint: DEFAULT_TOKEN_ENDPOINT.to_string(),
            folder_name: DEFAULT_FOLDER_NAME.to_string(),
            primary_root: dirs::download_dir().unwrap_or_else(|| home.join("Downloads")),
            fallback_root,
            data_dir,
            dedup_window: Duration::from_secs(1),
            notice_ttl: Duration::from_secs(2),
            device_token: None,
        }
    }
}

impl ShellConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `KOTA_SHELL_SITE_URL`, `KOTA_SHELL_DOWNLOAD_ROOT`,
    /// `KOTA_SHELL_DEDUP_MS` and `KOTA_SHELL_DEVICE_TOKEN`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new();
        if let Some(site_url) = lookup("KOTA_SHELL_SITE_URL") {
            config = config.with_site_url(site_url);
        }
        if let Some(root) = lookup("KOTA_SHELL_DOWNLOAD_ROOT") {
            config = config.with_primary_root(root);
        }
        if let Some(millis) = lookup("KOTA_SHELL_DEDUP_MS") {
            match millis.trim().parse::<u64>() {
                Ok(millis) => config = config.with_dedup_window(Duration::from_millis(millis)),
                Err(e) => log::warn!("ignoring KOTA_SHELL_DEDUP_MS={}: {}", millis, e),
            }
        }
        if let Some(token) = lookup("KOTA_SHELL_DEVICE_TOKEN").filter(|t| !t.is_empty()) {
            config = config.with_device_token(token);
        }
        config
    }

    #[must_use]
    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = site_url.into();
        self
    }

    #[must_use]
    pub fn with_primary_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.primary_root = root.into();
        self
    }

    #[must_use]
    pub const fn with_dedup_window(mut self, window: Duration) -> Self {
        self.dedup_window = window;
        self
    }

    #[must_use]
    pub fn with_device_token(mut self, token: impl Into<String>) -> Self {
        self.device_token = Some(token.into());
        self
    }
}
