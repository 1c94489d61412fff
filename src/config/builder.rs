//! Type-safe builder for `CollectorConfig` using the typestate pattern
//!
//! `build()` only exists once the output root has been set, so a run can
//! never start without knowing where its images go.

use anyhow::{Result, anyhow};
use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::CollectorConfig;

// Type states for the builder
pub struct WithOutputRoot;

pub struct CollectorConfigBuilder<State = ()> {
    pub(crate) draft: CollectorConfig,
    pub(crate) output_root: Option<PathBuf>,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for CollectorConfigBuilder<()> {
    fn default() -> Self {
        Self {
            draft: CollectorConfig::default(),
            output_root: None,
            _phantom: PhantomData,
        }
    }
}

impl CollectorConfig {
    /// Create a builder for configuring a `CollectorConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> CollectorConfigBuilder<()> {
        CollectorConfigBuilder::default()
    }
}

impl CollectorConfigBuilder<()> {
    pub fn output_root(self, dir: impl Into<PathBuf>) -> CollectorConfigBuilder<WithOutputRoot> {
        CollectorConfigBuilder {
            draft: self.draft,
            output_root: Some(dir.into()),
            _phantom: PhantomData,
        }
    }
}

// Build method only available when the output root is set
impl CollectorConfigBuilder<WithOutputRoot> {
    pub fn build(self) -> Result<CollectorConfig> {
        let mut config = self.draft;
        config.output_root = self
            .output_root
            .ok_or_else(|| anyhow!("output_root is required"))?;

        if config.max_images_per_product == 0 {
            return Err(anyhow!("max_images_per_product must be at least 1"));
        }

        let ratio = config.quality.min_non_background_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(anyhow!(
                "min_non_background_ratio must be within 0.0..=1.0, got {ratio}"
            ));
        }

        if !(1..=100).contains(&config.jpeg_quality) {
            return Err(anyhow!(
                "jpeg_quality must be within 1..=100, got {}",
                config.jpeg_quality
            ));
        }

        if config.fingerprint_resolution < 8 {
            return Err(anyhow!(
                "fingerprint_resolution must be at least 8, got {}",
                config.fingerprint_resolution
            ));
        }

        if config.marketplace_token.trim().is_empty() {
            return Err(anyhow!("marketplace_token must not be empty"));
        }

        // Headed browsers are for local debugging only
        if cfg!(not(debug_assertions)) && !config.headless {
            tracing::warn!(
                "Forcing headless mode in release build. \
                Headed mode is only available in debug builds for development."
            );
            config.headless = true;
        }

        Ok(config)
    }
}
