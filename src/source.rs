//! Routing of product source URLs

use url::Url;

use crate::utils::url_utils::has_image_extension;

/// What a product source URL points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Product page on the marketplace whose gallery markup we understand
    MarketplaceSource(String),
    /// URL that already names an image file
    DirectImageLink(String),
    /// Any other page
    GenericPage(String),
}

/// Classify one source URL.
///
/// A host containing `marketplace_token` wins over an image extension, so a
/// marketplace image URL still goes through the gallery extractor.
/// Protocol-relative URLs are upgraded to https; URLs that still do not
/// parse are generic pages.
#[must_use]
pub fn classify(url: &str, marketplace_token: &str) -> SourceKind {
    let trimmed = match url.trim() {
        relative if relative.starts_with("//") => format!("https:{relative}"),
        other => other.to_string(),
    };
    let Ok(parsed) = Url::parse(&trimmed) else {
        return SourceKind::GenericPage(trimmed);
    };

    let host_matches = parsed
        .host_str()
        .is_some_and(|host| host.to_ascii_lowercase().contains(marketplace_token));

    if host_matches {
        SourceKind::MarketplaceSource(trimmed)
    } else if has_image_extension(parsed.path()) {
        SourceKind::DirectImageLink(trimmed)
    } else {
        SourceKind::GenericPage(trimmed)
    }
}
