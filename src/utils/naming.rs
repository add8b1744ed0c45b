use chrono::NaiveDateTime;
use url::Url;

/// Extension assumed when a name carries none.
pub const DEFAULT_EXTENSION: &str = "pdf";

/// `2024-01-02_03-04-05`; no colons so the name stays filesystem-safe.
pub fn timestamp_token(now: NaiveDateTime) -> String {
    now.format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// Turns `report.pdf` into `report_2024-01-02_03-04-05.pdf`.
///
/// Only the first `.<ext>` occurrence is removed from the base name, so
/// `a.pdf.pdf` keeps one `.pdf` in its base.
pub fn derive_name(original_name: &str, now: NaiveDateTime) -> String {
    let extension = match original_name.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => DEFAULT_EXTENSION,
    };
    let base = original_name.replacen(&format!(".{extension}"), "", 1);
    format!("{}_{}.{}", base, timestamp_token(now), extension)
}

/// Last path segment of `url`, query string excluded.
///
/// Falls back to `file_<epoch millis>.pdf` when the path has no usable segment.
pub fn original_name_from_url(url: &Url, epoch_millis: u128) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(super::sanitize_filename)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("file_{epoch_millis}.{DEFAULT_EXTENSION}"))
}
