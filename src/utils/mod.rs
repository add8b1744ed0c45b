pub mod mime;
pub mod naming;

use std::time::{SystemTime, UNIX_EPOCH};

pub use mime::resolve_mime;
pub use naming::{derive_name, original_name_from_url};

/// Current Unix timestamp in milliseconds
pub fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}

/// Sanitize filename to remove invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_millis() {
        let ts = epoch_millis();
        assert!(ts > 1_700_000_000_000); // Sanity check
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("test:file.pdf"), "test_file.pdf");
        assert_eq!(sanitize_filename("normal-name.pdf"), "normal-name.pdf");
    }
}
