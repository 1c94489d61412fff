//! Whole-run drivers for both catalog shapes
//!
//! A run owns exactly one renderer. `collect_catalog` and `collect_rows`
//! launch it, walk every product in input order and shut it down once at the
//! end. The `run_*` functions take the fetcher and renderer from the caller.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

use super::{Catalog, TabularRow};
use crate::collector::{CollectionReport, ProductImageCollector, ProductSources};
use crate::config::CollectorConfig;
use crate::fetcher::{Fetch, HttpFetcher};
use crate::renderer::{BrowserRenderer, Render, ShutdownResult};

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub products: usize,
    pub images_saved: usize,
    pub fallbacks: usize,
    pub products_without_images: Vec<String>,
    pub reports: Vec<CollectionReport>,
}

impl RunSummary {
    fn record(&mut self, report: CollectionReport) {
        self.products += 1;
        self.images_saved += report.accepted;
        if report.fallback_used {
            self.fallbacks += 1;
        }
        if report.accepted == 0 {
            self.products_without_images.push(report.product_id.clone());
        }
        self.reports.push(report);
    }

    fn log(&self) {
        info!(
            target: "catalog_scrape::runner",
            "Run complete: {} products, {} images saved, {} fallbacks, {} without images",
            self.products,
            self.images_saved,
            self.fallbacks,
            self.products_without_images.len()
        );
    }
}

/// Collect images for every product of a nested catalog.
///
/// With `only`, products whose id is not in the set are skipped.
pub async fn run_catalog<F: Fetch, R: Render>(
    catalog: &Catalog,
    config: &CollectorConfig,
    fetcher: &F,
    renderer: &R,
    only: Option<&HashSet<String>>,
) -> RunSummary {
    let collector = ProductImageCollector::new(config, fetcher, renderer);
    let mut summary = RunSummary::default();

    for placed in catalog.products() {
        let product = placed.product;
        if only.is_some_and(|ids| !ids.contains(&product.product_id)) {
            continue;
        }

        let output_dir = placed.output_dir(config.output_root());
        info!(
            target: "catalog_scrape::runner",
            "Processing {} ({})",
            product.product_id,
            product.product_name
        );

        let report = collector
            .collect(ProductSources {
                product_id: &product.product_id,
                sources: &product.image_urls,
                output_dir: &output_dir,
            })
            .await;
        summary.record(report);
    }

    summary.log();
    summary
}

/// Collect images for every row of a tabular export.
///
/// Generic page sources in a row always resolve to their best image,
/// whatever `config` says.
pub async fn run_rows<F: Fetch, R: Render>(
    rows: &[TabularRow],
    config: &CollectorConfig,
    fetcher: &F,
    renderer: &R,
) -> RunSummary {
    let config = tabular_config(config);
    let collector = ProductImageCollector::new(&config, fetcher, renderer);
    let mut summary = RunSummary::default();

    for row in rows {
        let key = row.product_key();
        let sources = row.image_urls();
        let output_dir = config.output_root().join(&key);
        info!(target: "catalog_scrape::runner", "Processing row {key}");

        let report = collector
            .collect(ProductSources {
                product_id: &key,
                sources: &sources,
                output_dir: &output_dir,
            })
            .await;
        summary.record(report);
    }

    summary.log();
    summary
}

fn tabular_config(config: &CollectorConfig) -> CollectorConfig {
    let mut tabular = config.clone();
    tabular.resolve_generic_pages = true;
    tabular
}

async fn launch(config: &CollectorConfig) -> Result<(HttpFetcher, BrowserRenderer)> {
    let fetcher = HttpFetcher::new(config.user_agent(), config.fetch_timeout())?;
    let renderer = BrowserRenderer::launch(config).await?;
    Ok((fetcher, renderer))
}

async fn release(mut renderer: BrowserRenderer) {
    if let ShutdownResult::PartialFailure(errors) = renderer.shutdown().await {
        warn!(
            target: "catalog_scrape::runner",
            "Browser shutdown reported {} problem(s)",
            errors.len()
        );
    }
}

/// Launch the browser, run the nested catalog, release the browser.
pub async fn collect_catalog(
    catalog: &Catalog,
    config: &CollectorConfig,
    only: Option<&HashSet<String>>,
) -> Result<RunSummary> {
    let (fetcher, renderer) = launch(config).await?;
    let summary = run_catalog(catalog, config, &fetcher, &renderer, only).await;
    release(renderer).await;
    Ok(summary)
}

/// Launch the browser, run the tabular rows, release the browser.
pub async fn collect_rows(rows: &[TabularRow], config: &CollectorConfig) -> Result<RunSummary> {
    let (fetcher, renderer) = launch(config).await?;
    let summary = run_rows(rows, config, &fetcher, &renderer).await;
    release(renderer).await;
    Ok(summary)
}
