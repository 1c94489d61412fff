//! Re-encoding accepted images as RGB JPEG files

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to encode JPEG: {0}")]
    Encode(String),

    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Encode as baseline RGB JPEG; any alpha channel is dropped.
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, SaveError> {
    let rgb = image.to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality)
        .encode_image(&rgb)
        .map_err(|e| SaveError::Encode(e.to_string()))?;
    Ok(bytes)
}

/// Encode and write to `path`, creating the parent directory if needed.
pub async fn save_jpeg(image: &DynamicImage, path: &Path, quality: u8) -> Result<(), SaveError> {
    let bytes = encode_jpeg(image, quality)?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
}
