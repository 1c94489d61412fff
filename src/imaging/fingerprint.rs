//! Perceptual fingerprints used as the per-product dedup key
//!
//! The image is converted to grayscale, resized to a fixed square and hashed
//! with a DCT-preprocessed median hash (the pHash construction). Fingerprints
//! are only ever compared for exact equality; two near-duplicates whose bits
//! differ are treated as distinct images.

use image::DynamicImage;
use image::imageops::FilterType;
use image_hasher::{HashAlg, Hasher, HasherConfig};
use std::fmt;

use super::{DecodeError, decode};

/// Fixed-size perceptual hash of one image
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(Box<[u8]>);

impl Fingerprint {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}

pub struct PerceptualHasher {
    hasher: Hasher,
    resolution: u32,
}

impl PerceptualHasher {
    /// `resolution` is the edge of the square grayscale rendering (256 by default).
    #[must_use]
    pub fn new(resolution: u32) -> Self {
        let hasher = HasherConfig::new()
            .hash_size(8, 8)
            .hash_alg(HashAlg::Median)
            .preproc_dct()
            .to_hasher();
        Self { hasher, resolution }
    }

    /// Decode and fingerprint raw bytes.
    pub fn fingerprint(&self, bytes: &[u8]) -> Result<Fingerprint, DecodeError> {
        let image = decode(bytes)?;
        Ok(self.fingerprint_image(&image))
    }

    /// Fingerprint an already decoded image.
    #[must_use]
    pub fn fingerprint_image(&self, image: &DynamicImage) -> Fingerprint {
        let normalized = DynamicImage::ImageLuma8(image.to_luma8()).resize_exact(
            self.resolution,
            self.resolution,
            FilterType::CatmullRom,
        );
        let hash = self.hasher.hash_image(&normalized);
        Fingerprint(hash.as_bytes().into())
    }
}

impl fmt::Debug for PerceptualHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerceptualHasher")
            .field("resolution", &self.resolution)
            .finish_non_exhaustive()
    }
}
