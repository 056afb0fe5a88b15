//! Turns a user-selected image file into an opaque cover reference.
//!
//! The reference is a `data:` URI that any image element can display. The
//! rest of the crate never looks inside it.

use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD};

#[derive(Debug, thiserror::Error)]
pub enum CoverError {
    #[error("reading cover file: {0}")]
    Io(#[from] std::io::Error),
}

/// Encodes raw image bytes as a `data:` URI.
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Best-effort MIME type from the file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Reads `path` and returns its cover reference.
pub async fn load_cover(path: impl AsRef<Path>) -> Result<String, CoverError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "cover image read");
    Ok(encode_data_uri(mime_for_path(path), &bytes))
}

/// Cover for a saved form: the newly selected file if any, else `previous`.
pub async fn resolve_cover(
    previous: &str,
    selection: Option<&Path>,
) -> Result<String, CoverError> {
    match selection {
        Some(path) => load_cover(path).await,
        None => Ok(previous.to_string()),
    }
}
