//! Test utilities and helper functions for the catalog_scrape test suite

use catalog_scrape::config::{CollectorConfig, QualityThresholds};
use catalog_scrape::imaging::{PerceptualHasher, QualityFilter};
use catalog_scrape::renderer::{Render, RenderError};
use catalog_scrape::utils::FINGERPRINT_RESOLUTION;
use image::{DynamicImage, Rgb, RgbImage};
use mockito::{Mock, Server};
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::path::Path;
use std::sync::Mutex;

/// Edge of the generated test images, comfortably above the minimum size
#[allow(dead_code)]
pub const IMAGE_EDGE: u32 = 320;

/// Start a mock HTTP server for image and page fixtures
#[allow(dead_code)]
pub async fn setup_mock_server() -> mockito::ServerGuard {
    Server::new_async().await
}

/// Build a test URL from a mock server and path
#[allow(dead_code)]
pub fn test_url(server: &Server, path: &str) -> String {
    format!("{}{}", server.url(), path)
}

/// Serve PNG bytes at `path`, expecting exactly `hits` requests
#[allow(dead_code)]
pub async fn create_image_mock(server: &mut Server, path: &str, png: &[u8], hits: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(png)
        .expect(hits)
        .create_async()
        .await
}

/// Mock that returns an error status
#[allow(dead_code)]
pub async fn create_error_mock(server: &mut Server, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .create_async()
        .await
}

#[allow(dead_code)]
pub fn encode_png(image: &DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("PNG encoding of a test image");
    bytes
}

/// 4x4 grid of dark and light blocks, one bit of `pattern` per block.
///
/// Light blocks stay well under the background luma so every image passes
/// the quality filter.
#[allow(dead_code)]
pub fn block_pattern(pattern: u16, edge: u32) -> DynamicImage {
    let cell = edge / 4;
    let img = RgbImage::from_fn(edge, edge, |x, y| {
        let bit = (y / cell).min(3) * 4 + (x / cell).min(3);
        if pattern & (1 << bit) != 0 {
            Rgb([25, 25, 25])
        } else {
            Rgb([190, 190, 190])
        }
    });
    DynamicImage::ImageRgb8(img)
}

/// `n` PNG images that pass the default quality filter and have pairwise
/// distinct fingerprints.
#[allow(dead_code)]
pub fn distinct_images(n: usize) -> Vec<Vec<u8>> {
    let hasher = PerceptualHasher::new(FINGERPRINT_RESOLUTION);
    let filter = QualityFilter::new(QualityThresholds::default());
    let mut seen = HashSet::new();
    let mut images = Vec::with_capacity(n);

    for pattern in 1..=u16::MAX {
        if images.len() == n {
            break;
        }
        let image = block_pattern(pattern, IMAGE_EDGE);
        if filter.is_acceptable(&image) && seen.insert(hasher.fingerprint_image(&image)) {
            images.push(encode_png(&image));
        }
    }

    assert_eq!(images.len(), n, "not enough distinct test images");
    images
}

/// Pure white canvas: big enough, but rejected as a blank placeholder
#[allow(dead_code)]
pub fn white_image() -> Vec<u8> {
    let img = RgbImage::from_pixel(IMAGE_EDGE, IMAGE_EDGE, Rgb([255, 255, 255]));
    encode_png(&DynamicImage::ImageRgb8(img))
}

/// Renderer serving canned HTML and recording every request
#[allow(dead_code)]
#[derive(Default)]
pub struct StubRenderer {
    pages: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl StubRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Render for StubRenderer {
    async fn render(&self, url: &str) -> Result<String, RenderError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| RenderError::Navigation {
                url: url.to_string(),
                reason: "no such page".to_string(),
            })
    }
}

/// Collector config writing into `root`, with the default thresholds
#[allow(dead_code)]
pub fn test_config(root: &Path, max_images: usize) -> CollectorConfig {
    CollectorConfig::builder()
        .output_root(root)
        .max_images_per_product(max_images)
        .marketplace_token("marketplace.example")
        .fetch_timeout_secs(5)
        .build()
        .unwrap()
}

/// Sorted file names directly inside `dir`; empty when it does not exist
#[allow(dead_code)]
pub fn file_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
