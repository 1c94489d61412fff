//! Core configuration types for image collection
//!
//! `CollectorConfig` carries every knob the fetcher, quality filter,
//! perceptual hasher, renderer and collector read. It is built once per run
//! through [`CollectorConfig::builder`] and shared by reference afterwards.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::{
    BACKGROUND_LUMA_THRESHOLD, CHROME_USER_AGENT, DEFAULT_MARKETPLACE_TOKEN,
    DEFAULT_MAX_IMAGES_PER_PRODUCT, FETCH_TIMEOUT_SECS, FINGERPRINT_RESOLUTION, MIN_IMAGE_HEIGHT,
    MIN_IMAGE_WIDTH, MIN_NON_BACKGROUND_RATIO, PAGE_LOAD_TIMEOUT_SECS, SAVED_JPEG_QUALITY,
    SETTLE_DELAY_MS,
};

/// Thresholds applied by the quality filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityThresholds {
    pub min_width: u32,
    pub min_height: u32,
    /// Luma strictly above this value counts as background.
    pub background_luma: u8,
    /// Minimum share of non-background pixels, in `0.0..=1.0`.
    pub min_non_background_ratio: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_width: MIN_IMAGE_WIDTH,
            min_height: MIN_IMAGE_HEIGHT,
            background_luma: BACKGROUND_LUMA_THRESHOLD,
            min_non_background_ratio: MIN_NON_BACKGROUND_RATIO,
        }
    }
}

/// Main configuration struct for one collection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Root of the `<category>/<subcategory>/<product_id>/` output tree.
    pub(crate) output_root: PathBuf,

    /// Per-product cap on accepted images.
    pub(crate) max_images_per_product: usize,

    pub(crate) quality: QualityThresholds,

    /// Edge of the square grayscale rendering that gets fingerprinted.
    pub(crate) fingerprint_resolution: u32,

    pub(crate) jpeg_quality: u8,

    /// Timeout in seconds for a single image GET.
    ///
    /// Default: 12 seconds
    pub(crate) fetch_timeout_secs: u64,

    /// Timeout in seconds for browser navigation.
    ///
    /// Default: 30 seconds
    pub(crate) page_load_timeout_secs: u64,

    /// Upper bound on the readiness wait after navigation, in milliseconds.
    pub(crate) settle_delay_ms: u64,

    /// Substring of a source host that marks a marketplace listing.
    pub(crate) marketplace_token: String,

    /// Resolve generic (non-image, non-marketplace) source pages to their
    /// single best image instead of fetching the page URL itself.
    ///
    /// Off by default for the nested JSON catalog. Tabular runs always turn it on.
    pub(crate) resolve_generic_pages: bool,

    pub(crate) headless: bool,

    pub(crate) user_agent: String,

    /// Chrome user data directory. When unset a per-process temp directory is used.
    pub(crate) chrome_data_dir: Option<PathBuf>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("./catalog_images"),
            max_images_per_product: DEFAULT_MAX_IMAGES_PER_PRODUCT,
            quality: QualityThresholds::default(),
            fingerprint_resolution: FINGERPRINT_RESOLUTION,
            jpeg_quality: SAVED_JPEG_QUALITY,
            fetch_timeout_secs: FETCH_TIMEOUT_SECS,
            page_load_timeout_secs: PAGE_LOAD_TIMEOUT_SECS,
            settle_delay_ms: SETTLE_DELAY_MS,
            marketplace_token: DEFAULT_MARKETPLACE_TOKEN.to_string(),
            resolve_generic_pages: false,
            headless: true,
            user_agent: CHROME_USER_AGENT.to_string(),
            chrome_data_dir: None,
        }
    }
}
