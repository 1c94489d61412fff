//! URL normalization for scraped image candidates.
//!
//! Attribute values pulled out of rendered markup come in every shape:
//! absolute, protocol-relative, root-relative, document-relative, with
//! resizing query strings, or not URLs at all (`data:` URIs, `javascript:`).
//! Everything that leaves an extractor goes through this module.

use url::Url;

use super::constants::IMAGE_EXTENSIONS;

/// Drop everything from the first `?` on.
///
/// Marketplace CDNs encode resize and crop hints in the query; the bare path
/// serves the original asset.
#[must_use]
pub fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(head, _)| head)
}

/// Turn a raw attribute value into an absolute http(s) URL.
///
/// * `//host/path` always becomes `https://host/path`.
/// * Root-relative and document-relative values are joined onto `base`.
/// * Values that do not end up as http(s) return `None`.
#[must_use]
pub fn resolve_candidate(raw: &str, base: Option<&Url>) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let resolved = if let Some(rest) = raw.strip_prefix("//") {
        Url::parse(&format!("https://{rest}")).ok()?
    } else if let Ok(absolute) = Url::parse(raw) {
        absolute
    } else {
        base?.join(raw).ok()?
    };

    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

/// Gallery normalization: strip the query, then resolve.
#[must_use]
pub fn normalize_gallery_url(raw: &str, base: Option<&Url>) -> Option<String> {
    resolve_candidate(strip_query(raw.trim()), base)
}

/// Whether the URL path ends with a recognized image extension.
///
/// The query string is ignored and the comparison is case-insensitive.
#[must_use]
pub fn has_image_extension(url: &str) -> bool {
    let path = strip_query(url);
    let path = path.split_once('#').map_or(path, |(head, _)| head);
    let lower = path.to_ascii_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://shop.example.com/catalog/item/42").unwrap()
    }

    #[test]
    fn protocol_relative_becomes_https() {
        assert_eq!(
            resolve_candidate("//cdn.example.com/a.jpg", Some(&base())).as_deref(),
            Some("https://cdn.example.com/a.jpg")
        );
        assert_eq!(
            resolve_candidate("//cdn.example.com/a.jpg", None).as_deref(),
            Some("https://cdn.example.com/a.jpg")
        );
    }

    #[test]
    fn root_relative_joins_base() {
        assert_eq!(
            resolve_candidate("/img/a.png", Some(&base())).as_deref(),
            Some("https://shop.example.com/img/a.png")
        );
        assert_eq!(
            resolve_candidate("thumbs/a.png", Some(&base())).as_deref(),
            Some("https://shop.example.com/catalog/item/thumbs/a.png")
        );
        assert_eq!(resolve_candidate("/img/a.png", None), None);
    }

    #[test]
    fn non_http_is_dropped() {
        assert_eq!(resolve_candidate("data:image/png;base64,AAAA", Some(&base())), None);
        assert_eq!(resolve_candidate("javascript:void(0)", Some(&base())), None);
        assert_eq!(resolve_candidate("   ", Some(&base())), None);
    }

    #[test]
    fn gallery_urls_lose_their_query() {
        assert_eq!(
            normalize_gallery_url("https://m.media.example/I/abc._SX300_.jpg?v=2", None).as_deref(),
            Some("https://m.media.example/I/abc._SX300_.jpg")
        );
        assert_eq!(
            normalize_gallery_url("//m.media.example/I/abc.jpg?x=1", None).as_deref(),
            Some("https://m.media.example/I/abc.jpg")
        );
    }

    #[test]
    fn image_extension_detection() {
        assert!(has_image_extension("https://x.example/a/B.JPG"));
        assert!(has_image_extension("https://x.example/a/b.webp?w=200"));
        assert!(!has_image_extension("https://x.example/product/123"));
        assert!(!has_image_extension("https://x.example/a.gif"));
    }
}
