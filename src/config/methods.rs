//! Builder methods available for all states
//!
//! Every optional knob can be set before or after the output root.

use std::path::PathBuf;

use super::builder::CollectorConfigBuilder;
use super::types::QualityThresholds;

impl<State> CollectorConfigBuilder<State> {
    /// Cap on accepted images per product (25 for the JSON catalog, 15 for CSV).
    #[must_use]
    pub fn max_images_per_product(mut self, max: usize) -> Self {
        self.draft.max_images_per_product = max;
        self
    }

    #[must_use]
    pub fn quality(mut self, quality: QualityThresholds) -> Self {
        self.draft.quality = quality;
        self
    }

    #[must_use]
    pub fn min_dimensions(mut self, width: u32, height: u32) -> Self {
        self.draft.quality.min_width = width;
        self.draft.quality.min_height = height;
        self
    }

    #[must_use]
    pub fn min_non_background_ratio(mut self, ratio: f64) -> Self {
        self.draft.quality.min_non_background_ratio = ratio;
        self
    }

    #[must_use]
    pub fn background_luma(mut self, luma: u8) -> Self {
        self.draft.quality.background_luma = luma;
        self
    }

    #[must_use]
    pub fn fingerprint_resolution(mut self, edge: u32) -> Self {
        self.draft.fingerprint_resolution = edge;
        self
    }

    #[must_use]
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.draft.jpeg_quality = quality;
        self
    }

    #[must_use]
    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.draft.fetch_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn page_load_timeout_secs(mut self, secs: u64) -> Self {
        self.draft.page_load_timeout_secs = secs;
        self
    }

    /// Upper bound on the post-navigation readiness wait.
    #[must_use]
    pub fn settle_delay_ms(mut self, millis: u64) -> Self {
        self.draft.settle_delay_ms = millis;
        self
    }

    /// Host substring that routes a source URL to the gallery extractor.
    ///
    /// # Example
    /// ```rust
    /// # use catalog_scrape::config::CollectorConfig;
    /// # fn main() -> anyhow::Result<()> {
    /// let config = CollectorConfig::builder()
    ///     .output_root("./images")
    ///     .marketplace_token("amazon.")
    ///     .build()?;
    /// assert_eq!(config.marketplace_token(), "amazon.");
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn marketplace_token(mut self, token: impl Into<String>) -> Self {
        self.draft.marketplace_token = token.into();
        self
    }

    #[must_use]
    pub fn resolve_generic_pages(mut self, resolve: bool) -> Self {
        self.draft.resolve_generic_pages = resolve;
        self
    }

    /// Set browser headless mode.
    ///
    /// Headed mode is honored in debug builds only; release builds force
    /// headless with a warning.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.draft.headless = headless;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.draft.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.draft.chrome_data_dir = Some(dir.into());
        self
    }
}
