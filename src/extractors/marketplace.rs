//! Gallery extraction for marketplace product pages
//!
//! Three independent heuristics, unioned in this order:
//!
//! 1. The main image element (`#imgTagWrapperId img`) carries a
//!    `data-a-dynamic-image` attribute whose value is a JSON object keyed by
//!    image URL. Its `src` follows.
//! 2. Inline scripts that define the colour/gallery blobs (`colorImages`,
//!    `imageGalleryData`) contain the hi-res URLs as quoted strings.
//! 3. Every `<img>` on the page contributes `data-old-hires`, `data-src` and
//!    `src`.
//!
//! Every URL loses its query string and is resolved to absolute http(s).

use scraper::{Html, Selector};
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::trace;
use url::Url;

use super::CandidateList;
use crate::utils::url_utils::normalize_gallery_url;

static MAIN_IMAGE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("#imgTagWrapperId img").expect("MAIN_IMAGE: hardcoded selector is valid")
});

static SCRIPT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("SCRIPT: hardcoded selector is valid"));

static IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("IMG: hardcoded selector is valid"));

const GALLERY_SCRIPT_MARKERS: [&str; 2] = ["colorImages", "imageGalleryData"];
const IMG_ATTRIBUTES: [&str; 3] = ["data-old-hires", "data-src", "src"];
const SCRIPT_IMAGE_SUFFIXES: [&str; 4] = [".jpg", ".jpeg", ".png", ".webp"];

/// Extract every gallery candidate from a rendered marketplace page.
///
/// `base_url` resolves root-relative attribute values; when it does not parse
/// such values are dropped.
#[must_use]
pub fn extract_gallery(html: &str, base_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let base = Url::parse(base_url).ok();

    let raw = main_image_urls(&document)
        .into_iter()
        .chain(script_urls(&document))
        .chain(img_attribute_urls(&document));

    let mut candidates = CandidateList::default();
    for value in raw {
        if let Some(url) = normalize_gallery_url(&value, base.as_ref()) {
            candidates.push(url);
        }
    }

    let candidates = candidates.into_vec();
    trace!(
        target: "catalog_scrape::extractors",
        "{} gallery candidates on {base_url}",
        candidates.len()
    );
    candidates
}

fn main_image_urls(document: &Html) -> Vec<String> {
    let Some(element) = document.select(&MAIN_IMAGE).next() else {
        return Vec::new();
    };

    let mut urls = element
        .value()
        .attr("data-a-dynamic-image")
        .map(dynamic_image_keys)
        .unwrap_or_default();

    if let Some(src) = element.value().attr("src") {
        urls.push(src.to_string());
    }
    urls
}

/// Keys of the dynamic image map, in document order.
///
/// Anything that is not a JSON object yields nothing.
fn dynamic_image_keys(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Map<String, Value>>(raw) {
        Ok(map) => map.into_iter().map(|(key, _)| key).collect(),
        Err(e) => {
            trace!(target: "catalog_scrape::extractors", "Ignoring malformed dynamic image map: {e}");
            Vec::new()
        }
    }
}

fn script_urls(document: &Html) -> Vec<String> {
    let mut urls = Vec::new();
    for script in document.select(&SCRIPT) {
        let text: String = script.text().collect();
        if !GALLERY_SCRIPT_MARKERS.iter().any(|marker| text.contains(marker)) {
            continue;
        }

        urls.extend(
            text.split('"')
                .filter(|piece| looks_like_image_url(piece))
                .map(str::to_string),
        );
    }
    urls
}

fn looks_like_image_url(piece: &str) -> bool {
    let lower = piece.to_ascii_lowercase();
    lower.starts_with("http")
        && SCRIPT_IMAGE_SUFFIXES
            .iter()
            .any(|suffix| lower.ends_with(suffix))
}

fn img_attribute_urls(document: &Html) -> Vec<String> {
    document
        .select(&IMG)
        .flat_map(|img| {
            IMG_ATTRIBUTES
                .iter()
                .filter_map(move |attr| img.value().attr(attr))
                .map(str::to_string)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.amazon.in/Some-Product/dp/B0TEST";

    #[test]
    fn dynamic_image_map_comes_first() {
        let html = r#"
            <html><body>
              <div id="imgTagWrapperId">
                <img src="https://m.media-amazon.com/I/main._SX300_.jpg?x=1"
                     data-a-dynamic-image='{"https://m.media-amazon.com/I/a.jpg":[500,500],"https://m.media-amazon.com/I/b.jpg?crop=1":[800,800]}'>
              </div>
            </body></html>"#;

        assert_eq!(
            extract_gallery(html, BASE),
            vec![
                "https://m.media-amazon.com/I/a.jpg",
                "https://m.media-amazon.com/I/b.jpg",
                "https://m.media-amazon.com/I/main._SX300_.jpg",
            ]
        );
    }

    #[test]
    fn malformed_dynamic_map_does_not_stop_other_heuristics() {
        let html = r#"
            <div id="imgTagWrapperId"><img data-a-dynamic-image="{not json"></div>
            <img data-old-hires="//m.media-amazon.com/I/hires.jpg">"#;

        assert_eq!(
            extract_gallery(html, BASE),
            vec!["https://m.media-amazon.com/I/hires.jpg"]
        );
    }

    #[test]
    fn gallery_scripts_are_scanned() {
        let html = r#"
            <script>var data = {"colorImages": {"initial": [{"hiRes":"https://m.media-amazon.com/I/h1.JPG","thumb":"https://m.media-amazon.com/I/t1.gif"}]}};</script>
            <script>var other = {"url":"https://m.media-amazon.com/I/ignored.jpg"};</script>"#;

        assert_eq!(
            extract_gallery(html, BASE),
            vec!["https://m.media-amazon.com/I/h1.JPG"]
        );
    }

    #[test]
    fn img_attributes_are_normalized_and_deduplicated() {
        let html = r#"
            <img src="/images/local.png" data-src="https://cdn.example/x.jpg?q=9">
            <img src="https://cdn.example/x.jpg">
            <img src="data:image/gif;base64,R0lGOD">"#;

        assert_eq!(
            extract_gallery(html, BASE),
            vec![
                "https://cdn.example/x.jpg",
                "https://www.amazon.in/images/local.png",
            ]
        );
    }

    #[test]
    fn empty_page_yields_nothing() {
        assert!(extract_gallery("", BASE).is_empty());
        assert!(extract_gallery("<html><p>no images</p></html>", BASE).is_empty());
    }
}
