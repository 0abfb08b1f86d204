// Product image loading
//
// The generation step sends the image inline (base64) to the model.

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fs;
use std::path::Path;

/// A product image ready to be sent to the model.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub data: Vec<u8>,
    /// Mime type, e.g. "image/png"
    pub media_type: String,
}

impl ImagePayload {
    /// Load an image from a file, inferring the mime type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let media_type = media_type_for(path)?;
        let data = fs::read(path)
            .with_context(|| format!("Failed to read image file {}", path.display()))?;
        if data.is_empty() {
            bail!("Image file {} is empty", path.display());
        }
        Ok(Self { data, media_type })
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

fn media_type_for(path: &Path) -> Result<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let media_type = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => bail!(
            "Unsupported image extension {:?} for {}",
            ext,
            path.display()
        ),
    };
    Ok(media_type.to_string())
}
