// Image preview preparation: read the picked file and render it as a
// data URL the frontend can show directly.

use crate::types::SelectedImage;
use base64::{engine::general_purpose, Engine as _};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// MIME type derived from the file extension. The picker filters to image
/// types, so anything unrecognized is declared as a generic byte stream.
pub fn mime_for_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Read the picked file into a [`SelectedImage`].
pub async fn load_image(path: &Path) -> Result<SelectedImage, PreviewError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| PreviewError::Read {
        path: path.display().to_string(),
        source: e,
    })?;

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();
    let mime = mime_for_extension(path).to_string();

    Ok(SelectedImage { bytes, name, mime })
}

/// Encode the image as a `data:` URL for the preview element.
pub fn data_url(image: &SelectedImage) -> String {
    format!(
        "data:{};base64,{}",
        image.mime,
        general_purpose::STANDARD.encode(&image.bytes)
    )
}
