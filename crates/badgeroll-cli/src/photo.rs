//! Photo files to `data:` URIs.

use std::path::Path;

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Refuse photos larger than this; they travel inline with every record
const MAX_PHOTO_BYTES: u64 = 2 * 1024 * 1024;

fn mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

pub fn to_data_uri(path: &Path) -> Result<String> {
    let Some(mime) = mime_type(path) else {
        bail!("Unsupported photo format: {} (use jpg, png, gif or webp)", path.display());
    };

    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to read photo: {}", path.display()))?
        .len();
    if size > MAX_PHOTO_BYTES {
        bail!("Photo is too large ({} KB, max {} KB)", size / 1024, MAX_PHOTO_BYTES / 1024);
    }

    let bytes = std::fs::read(path).with_context(|| format!("Failed to read photo: {}", path.display()))?;
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}
