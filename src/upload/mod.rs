//! Publishing the output tree to an image host
//!
//! Every image under the output root is uploaded under its relative path
//! (minus extension) as the hosted public id. The product id is the name of
//! the directory holding the file. The result is a `product_id → [url]`
//! mapping that [`attach_hosted_urls`] can splice back into a catalog.

pub mod cloudinary;

use anyhow::{Context, Result};
use jwalk::WalkDir;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::{Catalog, OrderedEntries};
use crate::utils::constants::IMAGE_EXTENSIONS;

pub use cloudinary::{CloudinaryClient, CloudinaryConfig};

/// Ordered `product_id → hosted URLs`.
pub type HostedMapping = OrderedEntries<Vec<String>>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("failed to read image: {0}")]
    Io(String),

    #[error("upload request failed: {0}")]
    Http(String),

    #[error("host rejected upload ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("host response had no URL")]
    MissingUrl,
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Somewhere images can be published.
#[allow(async_fn_in_trait)]
pub trait ImageHost {
    /// Upload `file` as `public_id` and return its public URL.
    async fn upload(&self, file: &Path, public_id: &str) -> Result<String, UploadError>;
}

/// One image found under the output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalImage {
    pub path: PathBuf,
    /// Relative path without extension, `/`-separated
    pub public_id: String,
    pub product_id: String,
}

fn has_upload_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Every uploadable image under `root`, sorted by path.
///
/// Files sitting directly in `root` have no product directory and are
/// skipped with a warning.
pub fn discover_images(root: &Path) -> Result<Vec<LocalImage>> {
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(root).sort(true).skip_hidden(true) {
        let entry = entry.context("Failed to walk output tree")?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !has_upload_extension(&path) {
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .with_context(|| format!("{} escaped the walk root", path.display()))?
            .with_extension("");
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        if parts.len() < 2 {
            warn!(
                target: "catalog_scrape::upload",
                "Skipping {}: not inside a product directory",
                path.display()
            );
            continue;
        }

        images.push(LocalImage {
            product_id: parts[parts.len() - 2].clone(),
            public_id: parts.join("/"),
            path,
        });
    }

    images.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(images)
}

/// Upload everything under `root`. Failed uploads are logged and left out.
pub async fn upload_tree<H: ImageHost>(root: &Path, host: &H) -> Result<HostedMapping> {
    let images = discover_images(root)?;
    info!(
        target: "catalog_scrape::upload",
        "Uploading {} images from {}",
        images.len(),
        root.display()
    );

    let mut mapping = HostedMapping::new();
    let mut failed = 0usize;
    for image in &images {
        match host.upload(&image.path, &image.public_id).await {
            Ok(url) => match mapping.get_mut(&image.product_id) {
                Some(urls) => urls.push(url),
                None => mapping.insert(image.product_id.clone(), vec![url]),
            },
            Err(e) => {
                warn!(
                    target: "catalog_scrape::upload",
                    "Failed to upload {}: {e}",
                    image.path.display()
                );
                failed += 1;
            }
        }
    }

    info!(
        target: "catalog_scrape::upload",
        "Uploaded {} images for {} products ({failed} failed)",
        images.len() - failed,
        mapping.len()
    );
    Ok(mapping)
}

pub async fn write_mapping(path: &Path, mapping: &HostedMapping) -> Result<()> {
    let text = serde_json::to_string_pretty(mapping)?;
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

pub async fn read_mapping(path: &Path) -> Result<HostedMapping> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Replace each product's `image_urls` with its hosted URLs.
///
/// Products without a (non-empty) mapping entry keep their original URLs.
/// Returns how many products were updated.
pub fn attach_hosted_urls(catalog: &mut Catalog, mapping: &HostedMapping) -> usize {
    let mut updated = 0;
    for product in catalog.products_mut() {
        if let Some(urls) = mapping.get(&product.product_id)
            && !urls.is_empty()
        {
            product.image_urls = urls.clone();
            updated += 1;
        }
    }
    updated
}
