// Image acquisition: local files become data-URIs

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{debug, warn};

/// Image types accepted from the device, by extension.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("avif", "image/avif"),
];

/// MIME type for an image path, or None if the extension is not an image type.
pub fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Read an image file into a data-URI.
///
/// Resolves to None when the path is not an image type, cannot be read, or is
/// larger than `max_bytes`. Nothing is reported to the user in those cases.
pub async fn read_data_uri(path: PathBuf, max_bytes: u64) -> Option<String> {
    let Some(mime) = image_mime(&path) else {
        debug!("Skipping {}: not an image type", path.display());
        return None;
    };

    let size = match smol::fs::metadata(&path).await {
        Ok(meta) => meta.len(),
        Err(e) => {
            debug!("Skipping {}: {}", path.display(), e);
            return None;
        }
    };
    if size > max_bytes {
        warn!(
            "Skipping {}: {} bytes exceeds the {} byte upload limit",
            path.display(),
            size,
            max_bytes
        );
        return None;
    }

    match smol::fs::read(&path).await {
        Ok(bytes) => Some(encode_data_uri(mime, &bytes)),
        Err(e) => {
            debug!("Skipping {}: {}", path.display(), e);
            None
        }
    }
}
