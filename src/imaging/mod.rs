//! Decoding, quality filtering, fingerprinting and saving of candidate images

pub mod fingerprint;
pub mod quality;
pub mod save;

use image::DynamicImage;
use thiserror::Error;

pub use fingerprint::{Fingerprint, PerceptualHasher};
pub use quality::{QualityFilter, QualityRejection};
pub use save::{SaveError, encode_jpeg, save_jpeg};

/// Fetched bytes that are not a decodable raster image
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("not a decodable image: {0}")]
pub struct DecodeError(pub String);

/// Decode fetched bytes, sniffing the format from the content.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    image::load_from_memory(bytes).map_err(|e| DecodeError(e.to_string()))
}
