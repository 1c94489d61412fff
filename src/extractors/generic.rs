//! Image extraction for arbitrary pages

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

use super::CandidateList;
use crate::utils::url_utils::resolve_candidate;

static OG_IMAGE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="og:image"]"#).expect("OG_IMAGE: hardcoded selector is valid")
});

static IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("IMG: hardcoded selector is valid"));

/// Lazy-loading attributes checked by [`extract_all`], highest priority first.
const LAZY_SOURCE_ATTRIBUTES: [&str; 4] = ["src", "data-src", "data-lazy-src", "data-original"];

/// Pick the single most likely product image on a page.
///
/// The social preview image (`og:image`) wins outright. Otherwise every
/// `<img>` with a `src` or `data-src` is scored by its declared
/// `width × height`; missing or non-numeric dimensions score 0 and the
/// earliest image wins a tie.
#[must_use]
pub fn extract_best(html: &str, base_url: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let base = Url::parse(base_url).ok();

    let og_image = document
        .select(&OG_IMAGE)
        .filter_map(|meta| meta.value().attr("content"))
        .find_map(|content| resolve_candidate(content, base.as_ref()));
    if og_image.is_some() {
        return og_image;
    }

    let mut best: Option<(u64, String)> = None;
    for img in document.select(&IMG) {
        let Some(src) = first_attr(img, &["src", "data-src"]) else {
            continue;
        };
        let Some(url) = resolve_candidate(src, base.as_ref()) else {
            continue;
        };

        let score = declared_area(img);
        if best.as_ref().is_none_or(|(top, _)| score > *top) {
            best = Some((score, url));
        }
    }

    best.map(|(_, url)| url)
}

/// Every image on the page, in document order, without ranking.
///
/// Used by the relaxed fallback pass where recall matters more than
/// precision.
#[must_use]
pub fn extract_all(html: &str, base_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let base = Url::parse(base_url).ok();

    let mut candidates = CandidateList::default();
    for img in document.select(&IMG) {
        if let Some(url) = first_attr(img, &LAZY_SOURCE_ATTRIBUTES)
            .and_then(|src| resolve_candidate(src, base.as_ref()))
        {
            candidates.push(url);
        }
    }
    candidates.into_vec()
}

/// First attribute in `names` that is present with a non-blank value.
fn first_attr<'a>(element: ElementRef<'a>, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|name| element.value().attr(name))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

fn declared_area(img: ElementRef<'_>) -> u64 {
    let dimension = |name: &str| {
        img.value()
            .attr(name)
            .and_then(|value| value.trim().parse::<u64>().ok())
    };

    match (dimension("width"), dimension("height")) {
        (Some(width), Some(height)) => width.saturating_mul(height),
        _ => 0,
    }
}
