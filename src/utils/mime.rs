/// Content type used when the extension is unknown or missing.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Content type for `file_name`, judged by its extension only.
pub fn resolve_mime(file_name: &str) -> &'static str {
    let Some((_, extension)) = file_name.rsplit_once('.') else {
        return FALLBACK_MIME;
    };
    match extension.to_ascii_lowercase().as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "zip" => "application/zip",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => FALLBACK_MIME,
    }
}
