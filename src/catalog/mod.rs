//! Catalog documents: the nested JSON snapshot and the tabular export
//!
//! The nested catalog is `categories → subcategories → products`, each level
//! keyed by display name. Fields this crate does not model are carried
//! through untouched so rewriting a catalog (for example to attach hosted
//! image URLs) loses nothing.

pub mod ordered;
pub mod runner;
pub mod tabular;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::utils::sanitize_name;

pub use ordered::OrderedEntries;
pub use runner::{RunSummary, collect_catalog, collect_rows, run_catalog, run_rows};
pub use tabular::{TabularRow, parse_rows, read_rows};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub product_title: String,
    #[serde(default)]
    pub product_description: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    #[serde(default)]
    pub subcategory_id: String,
    #[serde(default)]
    pub subcategory_name: String,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub subcategories: OrderedEntries<Subcategory>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: OrderedEntries<Category>,
}

/// A product together with the names of the category and subcategory it
/// sits under.
#[derive(Debug, Clone, Copy)]
pub struct PlacedProduct<'a> {
    pub category_key: &'a str,
    pub category: &'a Category,
    pub subcategory_key: &'a str,
    pub subcategory: &'a Subcategory,
    pub product: &'a Product,
}

impl PlacedProduct<'_> {
    /// `<root>/<category>/<subcategory>/<product_id>`, every segment sanitized.
    #[must_use]
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(sanitize_name(self.category_key))
            .join(sanitize_name(self.subcategory_key))
            .join(sanitize_name(&self.product.product_id))
    }
}

impl Catalog {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Catalog JSON does not match the expected layout")
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Pretty-printed, non-ASCII kept as is.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, text)
            .await
            .with_context(|| format!("Failed to write catalog {}", path.display()))
    }

    /// Every product in document order.
    pub fn products(&self) -> impl Iterator<Item = PlacedProduct<'_>> {
        self.categories.iter().flat_map(|(category_key, category)| {
            category
                .subcategories
                .iter()
                .flat_map(move |(subcategory_key, subcategory)| {
                    subcategory.products.iter().map(move |product| PlacedProduct {
                        category_key,
                        category,
                        subcategory_key,
                        subcategory,
                        product,
                    })
                })
        })
    }

    pub fn products_mut(&mut self) -> impl Iterator<Item = &mut Product> {
        self.categories.iter_mut().flat_map(|(_, category)| {
            category
                .subcategories
                .iter_mut()
                .flat_map(|(_, subcategory)| subcategory.products.iter_mut())
        })
    }

    #[must_use]
    pub fn product_count(&self) -> usize {
        self.products().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
      "categories": {
        "Medical Devices": {
          "category_id": "cat_001",
          "category_name": "Medical Devices",
          "subcategories": {
            "Diagnostic / Tools": {
              "subcategory_id": "subcat_001",
              "subcategory_name": "Diagnostic / Tools",
              "products": [
                {
                  "product_id": "prod_0007",
                  "product_name": "Pulse Oximeter",
                  "product_title": "Fingertip Pulse Oximeter",
                  "product_description": "Reads SpO2",
                  "image_urls": ["https://example.com/a.jpg"],
                  "price": 499
                }
              ]
            }
          }
        },
        "Beauty": {
          "category_id": "cat_002",
          "category_name": "Beauty",
          "subcategories": {}
        }
      }
    }"#;

    #[test]
    fn walks_products_with_their_placement() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let placed: Vec<_> = catalog.products().collect();

        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].category.category_id, "cat_001");
        assert_eq!(placed[0].subcategory.subcategory_id, "subcat_001");
        assert_eq!(
            placed[0].output_dir(Path::new("out")),
            Path::new("out/Medical_Devices/Diagnostic__Tools/prod_0007")
        );
    }

    #[test]
    fn unknown_fields_survive_a_rewrite() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let rewritten = serde_json::to_value(&catalog).unwrap();

        assert_eq!(
            rewritten["categories"]["Medical Devices"]["subcategories"]["Diagnostic / Tools"]
                ["products"][0]["price"],
            499
        );
        let keys: Vec<_> = rewritten["categories"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["Medical Devices", "Beauty"]);
    }

    #[test]
    fn wrong_layout_is_an_error() {
        assert!(Catalog::from_json(r#"{"products": []}"#).is_err());
    }
}
