//! Per-product image collection
//!
//! For one product: walk its source URLs in order, turn each into candidate
//! image URLs, then fetch, decode, quality-filter, dedup and save candidates
//! until the per-product cap is reached. When the strict pass saves nothing
//! the first source is rendered once more and every image on it is tried
//! without the quality filter.
//!
//! No failure aborts a product. Each one is logged and counted in the
//! product's [`CollectionReport`].

pub mod accepted;
pub mod report;

use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

use crate::config::CollectorConfig;
use crate::extractors::{extract_all, extract_best, extract_gallery};
use crate::fetcher::Fetch;
use crate::imaging::{PerceptualHasher, QualityFilter, decode, save_jpeg};
use crate::renderer::Render;
use crate::source::{SourceKind, classify};
use crate::utils::sanitize_name;

pub use accepted::AcceptedImageSet;
pub use report::{CollectionReport, FailureTally};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Strict,
    Relaxed,
}

/// One product's inputs to the collector.
#[derive(Debug, Clone, Copy)]
pub struct ProductSources<'a> {
    /// Key used for the file stem (`{id}_img{n}.jpg`); sanitized before use.
    pub product_id: &'a str,
    pub sources: &'a [String],
    /// Directory the product's images are written into.
    pub output_dir: &'a Path,
}

pub struct ProductImageCollector<'a, F, R> {
    config: &'a CollectorConfig,
    fetcher: &'a F,
    renderer: &'a R,
    quality: QualityFilter,
    hasher: PerceptualHasher,
}

impl<'a, F: Fetch, R: Render> ProductImageCollector<'a, F, R> {
    #[must_use]
    pub fn new(config: &'a CollectorConfig, fetcher: &'a F, renderer: &'a R) -> Self {
        Self {
            config,
            fetcher,
            renderer,
            quality: QualityFilter::new(config.quality()),
            hasher: PerceptualHasher::new(config.fingerprint_resolution()),
        }
    }

    /// Collect, dedup and save images for one product.
    pub async fn collect(&self, product: ProductSources<'_>) -> CollectionReport {
        let mut report = CollectionReport::new(product.product_id);
        let mut accepted = AcceptedImageSet::new(self.config.max_images_per_product());
        let stem = sanitize_name(product.product_id);

        let sources: Vec<&str> = product
            .sources
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        for source in &sources {
            if accepted.is_full() {
                break;
            }

            let Some(candidates) = self.candidates_for(source, &mut report).await else {
                continue;
            };
            if candidates.is_empty() {
                report.failures.empty_sources += 1;
                continue;
            }

            for candidate in &candidates {
                if accepted.is_full() {
                    break;
                }
                self.try_candidate(
                    candidate,
                    Pass::Strict,
                    &mut accepted,
                    product.output_dir,
                    &stem,
                    &mut report,
                )
                .await;
            }
        }

        if accepted.count() == 0
            && let Some(first) = sources.first()
        {
            info!(
                target: "catalog_scrape::collector",
                "{}: strict pass saved nothing, falling back to every image on {first}",
                product.product_id
            );
            report.fallback_used = true;

            let candidates = match self.renderer.render(first).await {
                Ok(html) => extract_all(&html, first),
                Err(e) => {
                    warn!(target: "catalog_scrape::collector", "Fallback render of {first} failed: {e}");
                    report.failures.render += 1;
                    Vec::new()
                }
            };

            for candidate in &candidates {
                if accepted.is_full() {
                    break;
                }
                self.try_candidate(
                    candidate,
                    Pass::Relaxed,
                    &mut accepted,
                    product.output_dir,
                    &stem,
                    &mut report,
                )
                .await;
            }
        }

        report.accepted = accepted.count();
        if report.accepted == 0 {
            warn!(
                target: "catalog_scrape::collector",
                "{}: no images saved ({} candidate failures)",
                product.product_id,
                report.failures.total()
            );
        } else {
            info!(
                target: "catalog_scrape::collector",
                "{}: saved {} images{}",
                product.product_id,
                report.accepted,
                if report.fallback_used { " (fallback)" } else { "" }
            );
        }
        report
    }

    /// Candidate URLs for one source; `None` when its page could not be rendered.
    async fn candidates_for(&self, source: &str, report: &mut CollectionReport) -> Option<Vec<String>> {
        match classify(source, self.config.marketplace_token()) {
            SourceKind::MarketplaceSource(url) => {
                debug!(target: "catalog_scrape::collector", "Rendering marketplace page {url}");
                let html = self.render_source(&url, report).await?;
                Some(extract_gallery(&html, &url))
            }
            SourceKind::DirectImageLink(url) => Some(vec![url]),
            SourceKind::GenericPage(url) if self.config.resolve_generic_pages() => {
                debug!(target: "catalog_scrape::collector", "Resolving best image on {url}");
                let html = self.render_source(&url, report).await?;
                Some(extract_best(&html, &url).into_iter().collect())
            }
            SourceKind::GenericPage(url) => Some(vec![url]),
        }
    }

    async fn render_source(&self, url: &str, report: &mut CollectionReport) -> Option<String> {
        match self.renderer.render(url).await {
            Ok(html) => Some(html),
            Err(e) => {
                warn!(target: "catalog_scrape::collector", "Render of {url} failed: {e}");
                report.failures.render += 1;
                None
            }
        }
    }

    async fn try_candidate(
        &self,
        url: &str,
        pass: Pass,
        accepted: &mut AcceptedImageSet,
        output_dir: &Path,
        stem: &str,
        report: &mut CollectionReport,
    ) {
        let bytes = match self.fetcher.fetch(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                trace!(target: "catalog_scrape::collector", "Skipping {url}: {e}");
                report.failures.fetch += 1;
                return;
            }
        };

        let image = match decode(&bytes) {
            Ok(image) => image,
            Err(e) => {
                trace!(target: "catalog_scrape::collector", "Skipping {url}: {e}");
                report.failures.decode += 1;
                return;
            }
        };

        if pass == Pass::Strict
            && let Err(rejection) = self.quality.assess(&image)
        {
            trace!(target: "catalog_scrape::collector", "Rejected {url}: {rejection}");
            report.failures.quality += 1;
            return;
        }

        let fingerprint = self.hasher.fingerprint_image(&image);
        if !accepted.mark(fingerprint) {
            trace!(target: "catalog_scrape::collector", "Duplicate image at {url}");
            report.failures.duplicate += 1;
            return;
        }

        let path: PathBuf =
            output_dir.join(format!("{stem}_img{}.jpg", accepted.next_number()));
        match save_jpeg(&image, &path, self.config.jpeg_quality()).await {
            Ok(()) => {
                accepted.record_saved();
                debug!(target: "catalog_scrape::collector", "Saved {} from {url}", path.display());
                report.saved.push(path);
            }
            Err(e) => {
                warn!(target: "catalog_scrape::collector", "Failed to save {}: {e}", path.display());
                report.failures.save += 1;
            }
        }
    }
}
