//! Getter methods for `CollectorConfig`

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::types::{CollectorConfig, QualityThresholds};

impl CollectorConfig {
    #[must_use]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    #[must_use]
    pub fn max_images_per_product(&self) -> usize {
        self.max_images_per_product
    }

    #[must_use]
    pub fn quality(&self) -> QualityThresholds {
        self.quality
    }

    #[must_use]
    pub fn fingerprint_resolution(&self) -> u32 {
        self.fingerprint_resolution
    }

    #[must_use]
    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    #[must_use]
    pub fn page_load_timeout_secs(&self) -> u64 {
        self.page_load_timeout_secs
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    #[must_use]
    pub fn marketplace_token(&self) -> &str {
        &self.marketplace_token
    }

    #[must_use]
    pub fn resolve_generic_pages(&self) -> bool {
        self.resolve_generic_pages
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&PathBuf> {
        self.chrome_data_dir.as_ref()
    }
}
