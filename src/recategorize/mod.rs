//! Regrouping a catalog under six master categories
//!
//! Subcategories disappear: every product lands directly in one master
//! category and loses its `subcategory`/`subcategory_id` fields.

pub mod rules;

use serde::Serialize;
use tracing::info;

use crate::catalog::{Catalog, OrderedEntries, Product};

pub use rules::{CATEGORY_RULES, CategoryRule, guess_category};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasterCategory {
    pub category_id: String,
    pub category_name: String,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecategorizedCatalog {
    pub categories: OrderedEntries<MasterCategory>,
}

/// Assign every product of `catalog` to a master category.
///
/// All six categories are present in the output, in fixed order, even when
/// empty.
#[must_use]
pub fn recategorize(catalog: &Catalog) -> RecategorizedCatalog {
    let mut buckets: Vec<Vec<Product>> = vec![Vec::new(); CATEGORY_RULES.len()];

    for placed in catalog.products() {
        let product = placed.product;
        let idx = guess_category(
            placed.category_key,
            &product.product_name,
            &product.product_title,
            &product.product_description,
        );

        let mut flattened = product.clone();
        flattened.extra.remove("subcategory");
        flattened.extra.remove("subcategory_id");
        buckets[idx].push(flattened);
    }

    let categories = CATEGORY_RULES
        .iter()
        .zip(buckets)
        .map(|(rule, products)| {
            info!(
                target: "catalog_scrape::recategorize",
                "{}: {} products",
                rule.name,
                products.len()
            );
            (
                rule.name,
                MasterCategory {
                    category_id: rule.id.to_string(),
                    category_name: rule.name.to_string(),
                    products,
                },
            )
        })
        .collect();

    RecategorizedCatalog { categories }
}
