//! Minimum-resolution and blank-placeholder rejection

use image::DynamicImage;
use std::fmt;

use crate::config::QualityThresholds;

/// Why the quality filter turned an image down
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QualityRejection {
    /// Smaller than the minimum width or height (icons, thumbnails)
    TooSmall { width: u32, height: u32 },
    /// Not enough non-background pixels (blank placeholder tiles)
    MostlyBackground { non_background_ratio: f64 },
}

impl fmt::Display for QualityRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooSmall { width, height } => write!(f, "too small ({width}x{height})"),
            Self::MostlyBackground {
                non_background_ratio,
            } => write!(
                f,
                "mostly background ({:.1}% non-background)",
                non_background_ratio * 100.0
            ),
        }
    }
}

/// Stateless acceptance check applied in the strict pass.
#[derive(Debug, Clone, Copy)]
pub struct QualityFilter {
    thresholds: QualityThresholds,
}

impl QualityFilter {
    #[must_use]
    pub fn new(thresholds: QualityThresholds) -> Self {
        Self { thresholds }
    }

    #[must_use]
    pub fn is_acceptable(&self, image: &DynamicImage) -> bool {
        self.assess(image).is_ok()
    }

    /// Resolution first, then the non-background share of the grayscale image.
    pub fn assess(&self, image: &DynamicImage) -> Result<(), QualityRejection> {
        let (width, height) = (image.width(), image.height());
        if width < self.thresholds.min_width || height < self.thresholds.min_height {
            return Err(QualityRejection::TooSmall { width, height });
        }

        let ratio = non_background_ratio(image, self.thresholds.background_luma);
        if ratio < self.thresholds.min_non_background_ratio {
            return Err(QualityRejection::MostlyBackground {
                non_background_ratio: ratio,
            });
        }

        Ok(())
    }
}

/// Share of grayscale pixels at or below `background_luma`.
///
/// An empty image has no content, so its ratio is 0.
#[must_use]
pub fn non_background_ratio(image: &DynamicImage, background_luma: u8) -> f64 {
    let gray = image.to_luma8();
    let total = u64::from(gray.width()) * u64::from(gray.height());
    if total == 0 {
        return 0.0;
    }

    let background = gray
        .pixels()
        .filter(|pixel| pixel.0[0] > background_luma)
        .count() as u64;

    (total - background) as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn filter() -> QualityFilter {
        QualityFilter::new(QualityThresholds::default())
    }

    /// White canvas with the top `dark_rows` rows painted black.
    fn canvas(width: u32, height: u32, dark_rows: u32) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |_, y| {
            if y < dark_rows {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn rejects_small_images_regardless_of_content() {
        let dark = DynamicImage::ImageRgb8(RgbImage::from_pixel(199, 400, Rgb([10, 20, 30])));
        assert_eq!(
            filter().assess(&dark),
            Err(QualityRejection::TooSmall {
                width: 199,
                height: 400
            })
        );

        let short = DynamicImage::ImageRgb8(RgbImage::from_pixel(400, 150, Rgb([10, 20, 30])));
        assert!(!filter().is_acceptable(&short));
    }

    #[test]
    fn rejects_mostly_white_placeholders() {
        // 10% dark rows
        let img = canvas(200, 200, 20);
        assert!(matches!(
            filter().assess(&img),
            Err(QualityRejection::MostlyBackground { .. })
        ));
    }

    #[test]
    fn accepts_when_content_reaches_threshold() {
        // exactly 20% dark rows
        let img = canvas(200, 200, 40);
        assert!(filter().is_acceptable(&img));
    }

    #[test]
    fn luma_at_threshold_is_content() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 300, Rgb([245, 245, 245])));
        assert!((non_background_ratio(&img, 245) - 1.0).abs() < f64::EPSILON);

        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 300, Rgb([246, 246, 246])));
        assert!(non_background_ratio(&img, 245).abs() < f64::EPSILON);
    }

    #[test]
    fn assessment_is_repeatable() {
        let img = canvas(256, 256, 60);
        assert_eq!(filter().is_acceptable(&img), filter().is_acceptable(&img));
    }
}
