//! Document id naming per collection

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdConvention {
    pub collection: &'static str,
    pub prefix: &'static str,
    /// Zero-padded width of the numeric part
    pub width: usize,
    pub description: &'static str,
}

impl IdConvention {
    #[must_use]
    pub fn format(&self, number: u32) -> String {
        format!("{}{:0width$}", self.prefix, number, width = self.width)
    }

    /// Human-readable pattern, e.g. `prod_{:04}`.
    #[must_use]
    pub fn pattern(&self) -> String {
        format!("{}{{:0{}}}", self.prefix, self.width)
    }
}

pub const CATEGORIES: IdConvention = IdConvention {
    collection: "categories",
    prefix: "cat_",
    width: 3,
    description: "Category IDs: cat_001 to cat_999",
};

pub const SUBCATEGORIES: IdConvention = IdConvention {
    collection: "subcategories",
    prefix: "subcat_",
    width: 3,
    description: "Subcategory IDs: subcat_001 to subcat_999",
};

pub const PRODUCTS: IdConvention = IdConvention {
    collection: "products",
    prefix: "prod_",
    width: 4,
    description: "Product IDs: prod_0001 to prod_9999",
};

pub const ADMINS: IdConvention = IdConvention {
    collection: "admins",
    prefix: "admin_",
    width: 3,
    description: "Admin IDs: admin_001 to admin_999",
};

pub const ID_CONVENTIONS: [IdConvention; 4] = [CATEGORIES, SUBCATEGORIES, PRODUCTS, ADMINS];

/// Convention for a collection name, if it has one.
#[must_use]
pub fn convention_for(collection: &str) -> Option<&'static IdConvention> {
    ID_CONVENTIONS.iter().find(|c| c.collection == collection)
}

/// Stored form of a convention in the `id_conventions` collection
#[derive(Debug, Serialize)]
pub(crate) struct ConventionDocument {
    #[serde(rename = "_id")]
    pub id: &'static str,
    pub collection_name: &'static str,
    pub prefix: &'static str,
    pub format: String,
    pub description: &'static str,
    pub example: String,
    pub created_at: String,
}

impl ConventionDocument {
    pub(crate) fn new(convention: &IdConvention, created_at: &str) -> Self {
        Self {
            id: convention.collection,
            collection_name: convention.collection,
            prefix: convention.prefix,
            format: convention.pattern(),
            description: convention.description,
            example: convention.format(1),
            created_at: created_at.to_string(),
        }
    }
}
