//! Name sanitization for output folders and files
//!
//! Category, subcategory and product names come straight from scraped
//! catalog data and can contain slashes, ampersands, emoji and so on. Only a
//! conservative subset survives into the output tree.

use super::constants::UNKNOWN_NAME;

/// Reduce a display name to a filesystem-safe folder or file stem.
///
/// Keeps alphanumerics, spaces, `_` and `-`, trims the result and replaces
/// the remaining spaces with underscores. An empty result becomes `Unknown`.
///
/// # Examples
/// ```
/// # use catalog_scrape::utils::string_utils::sanitize_name;
/// assert_eq!(sanitize_name("Home & Kitchen"), "Home__Kitchen");
/// assert_eq!(sanitize_name("  "), "Unknown");
/// ```
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    sanitize_name_or(name, UNKNOWN_NAME)
}

/// Same as [`sanitize_name`] with a caller-chosen placeholder.
#[must_use]
pub fn sanitize_name_or(name: &str, placeholder: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    let cleaned = kept.trim().replace(' ', "_");

    if cleaned.is_empty() {
        placeholder.to_string()
    } else {
        cleaned
    }
}

/// Whether a tabular cell holds no usable value.
///
/// Spreadsheet exports spell missing cells as empty strings, `nan` or `none`.
#[must_use]
pub fn is_blank_cell(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("none")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_safe_characters() {
        assert_eq!(sanitize_name("prod_0007"), "prod_0007");
        assert_eq!(sanitize_name("Medical Devices"), "Medical_Devices");
        assert_eq!(sanitize_name("Tools-&-Hardware"), "Tools--Hardware");
    }

    #[test]
    fn strips_unsafe_characters() {
        assert_eq!(sanitize_name("a/b\\c:d*e?"), "abcde");
        assert_eq!(sanitize_name("  Beauty & Care  "), "Beauty__Care");
    }

    #[test]
    fn empty_names_use_placeholder() {
        assert_eq!(sanitize_name(""), "Unknown");
        assert_eq!(sanitize_name("&&&"), "Unknown");
        assert_eq!(sanitize_name_or("", "Unknown_Product"), "Unknown_Product");
    }

    #[test]
    fn blank_cells() {
        assert!(is_blank_cell(""));
        assert!(is_blank_cell("  NaN "));
        assert!(is_blank_cell("None"));
        assert!(!is_blank_cell("https://example.com/a.jpg"));
    }
}
