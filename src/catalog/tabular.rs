//! Spreadsheet export adapter
//!
//! One product per row with `product_name`, `product_title` and up to four
//! image columns. Spreadsheet tools write missing cells as empty, `nan` or
//! `none`; those cells are ignored.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::utils::constants::UNKNOWN_PRODUCT_NAME;
use crate::utils::{is_blank_cell, sanitize_name_or};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TabularRow {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_title: Option<String>,
    #[serde(default)]
    pub product_image1: Option<String>,
    #[serde(default)]
    pub product_image2: Option<String>,
    #[serde(default)]
    pub product_image3: Option<String>,
    #[serde(default)]
    pub product_image4: Option<String>,
}

fn usable(cell: Option<&String>) -> Option<&str> {
    cell.map(|s| s.trim()).filter(|s| !is_blank_cell(s))
}

impl TabularRow {
    /// Folder name and file stem for this row.
    ///
    /// The sanitized name, else the sanitized title, else `Unknown_Product`.
    #[must_use]
    pub fn product_key(&self) -> String {
        usable(self.product_name.as_ref())
            .or_else(|| usable(self.product_title.as_ref()))
            .map_or_else(
                || UNKNOWN_PRODUCT_NAME.to_string(),
                |name| sanitize_name_or(name, UNKNOWN_PRODUCT_NAME),
            )
    }

    /// Non-blank image cells in column order.
    #[must_use]
    pub fn image_urls(&self) -> Vec<String> {
        [
            &self.product_image1,
            &self.product_image2,
            &self.product_image3,
            &self.product_image4,
        ]
        .into_iter()
        .filter_map(|cell| usable(cell.as_ref()))
        .map(str::to_string)
        .collect()
    }
}

/// Parse every row of a CSV export with a header line.
pub fn parse_rows<R: std::io::Read>(reader: R) -> Result<Vec<TabularRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    reader
        .deserialize()
        .enumerate()
        .map(|(idx, row)| row.with_context(|| format!("Malformed CSV row {}", idx + 1)))
        .collect()
}

pub async fn read_rows(path: &Path) -> Result<Vec<TabularRow>> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_rows(bytes.as_slice()).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_image_cells() {
        let csv = "product_name,product_title,product_image1,product_image2,product_image3,product_image4\n\
                   Steam Inhaler,,https://a.example/1.jpg,nan,,None\n";
        let rows = parse_rows(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_key(), "Steam_Inhaler");
        assert_eq!(rows[0].image_urls(), vec!["https://a.example/1.jpg"]);
    }

    #[test]
    fn falls_back_to_title_then_placeholder() {
        let row = TabularRow {
            product_name: Some("NaN".into()),
            product_title: Some("Digital / Timer".into()),
            ..TabularRow::default()
        };
        assert_eq!(row.product_key(), "Digital__Timer");

        assert_eq!(TabularRow::default().product_key(), "Unknown_Product");

        let row = TabularRow {
            product_name: Some("%%%".into()),
            ..TabularRow::default()
        };
        assert_eq!(row.product_key(), "Unknown_Product");
    }

    #[test]
    fn missing_columns_are_tolerated() {
        let csv = "product_name,product_image2\nLamp,//cdn.example/l.png\n";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].image_urls(), vec!["//cdn.example/l.png"]);
    }
}
