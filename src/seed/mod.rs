//! Loading a catalog into the storefront's document collections
//!
//! Categories and subcategories carry the ids of the products under them,
//! products carry their category and subcategory ids. One admin account is
//! created with a hashed password.

pub mod conventions;
pub mod store;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::catalog::Catalog;

pub use conventions::{ID_CONVENTIONS, IdConvention, convention_for};
pub use store::DocumentStore;

use conventions::ConventionDocument;

const COLLECTIONS: [&str; 5] = ["categories", "subcategories", "products", "admins", "id_conventions"];

const ADMIN_PERMISSIONS: [&str; 5] = ["read", "write", "delete", "manage_users", "manage_products"];

/// The account seeded into `admins`
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl AdminAccount {
    /// Hex SHA-256 of the password; the only form that gets stored.
    #[must_use]
    pub fn password_hash(&self) -> String {
        hex::encode(Sha256::digest(self.password.as_bytes()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub categories: usize,
    pub subcategories: usize,
    pub products: usize,
    pub admins: usize,
    pub conventions: usize,
}

/// Everything one seeding run inserts, per collection.
#[derive(Debug, Default)]
pub struct SeedDocuments {
    pub categories: Vec<Value>,
    pub subcategories: Vec<Value>,
    pub products: Vec<Value>,
    pub admins: Vec<Value>,
    pub id_conventions: Vec<Value>,
}

#[allow(clippy::too_many_arguments)]
fn product_document(
    id: &str,
    name: &str,
    title: &str,
    description: &str,
    image_urls: &[String],
    category_id: &str,
    subcategory_id: &str,
    now: &str,
) -> Value {
    json!({
        "_id": id,
        "product_id": id,
        "product_name": name,
        "product_title": title,
        "product_description": description,
        "image_urls": image_urls,
        "image_count": image_urls.len(),
        "subcategory_id": subcategory_id,
        "category_id": category_id,
        "status": "active",
        "created_at": now,
        "updated_at": now,
    })
}

/// Build every document for `catalog` stamped with `now`.
pub fn build_documents(catalog: &Catalog, admin: &AdminAccount, now: &str) -> Result<SeedDocuments> {
    let mut docs = SeedDocuments::default();

    for category in catalog.categories.values() {
        let mut category_products = Vec::new();
        let mut subcategory_ids = Vec::new();

        for subcategory in category.subcategories.values() {
            let product_ids: Vec<&str> = subcategory
                .products
                .iter()
                .map(|p| p.product_id.as_str())
                .collect();

            docs.subcategories.push(json!({
                "_id": subcategory.subcategory_id,
                "subcategory_name": subcategory.subcategory_name,
                "category_id": category.category_id,
                "product_ids": product_ids,
                "product_count": product_ids.len(),
                "created_at": now,
                "updated_at": now,
            }));

            for product in &subcategory.products {
                docs.products.push(product_document(
                    &product.product_id,
                    &product.product_name,
                    &product.product_title,
                    &product.product_description,
                    &product.image_urls,
                    &category.category_id,
                    &subcategory.subcategory_id,
                    now,
                ));
            }

            subcategory_ids.push(subcategory.subcategory_id.as_str());
            category_products.extend(product_ids);
        }

        docs.categories.push(json!({
            "_id": category.category_id,
            "category_name": category.category_name,
            "product_ids": category_products,
            "subcategory_ids": subcategory_ids,
            "product_count": category_products.len(),
            "subcategory_count": subcategory_ids.len(),
            "created_at": now,
            "updated_at": now,
        }));
    }

    docs.admins.push(json!({
        "_id": conventions::ADMINS.format(1),
        "username": admin.username,
        "password": admin.password_hash(),
        "role": "admin",
        "permissions": ADMIN_PERMISSIONS,
        "email": admin.email,
        "created_at": now,
        "last_login": null,
        "is_active": true,
    }));

    for convention in &ID_CONVENTIONS {
        docs.id_conventions
            .push(serde_json::to_value(ConventionDocument::new(convention, now))?);
    }

    Ok(docs)
}

/// Replace the store's collections with the contents of `catalog`.
///
/// Clearing and every insert share one transaction; on error the store keeps
/// its previous contents.
pub async fn seed(store: &DocumentStore, catalog: &Catalog, admin: &AdminAccount) -> Result<SeedSummary> {
    let now = Utc::now().to_rfc3339();
    let docs = build_documents(catalog, admin, &now)?;

    let mut tx = store.begin().await?;
    store::clear_collections(&mut tx, &COLLECTIONS).await?;

    let batches: [(&str, &[Value]); 5] = [
        ("categories", &docs.categories),
        ("subcategories", &docs.subcategories),
        ("products", &docs.products),
        ("admins", &docs.admins),
        ("id_conventions", &docs.id_conventions),
    ];
    for (collection, documents) in batches {
        for document in documents {
            store::insert_document(&mut tx, collection, document).await?;
        }
    }
    tx.commit().await.context("Failed to commit seed")?;

    let summary = SeedSummary {
        categories: docs.categories.len(),
        subcategories: docs.subcategories.len(),
        products: docs.products.len(),
        admins: docs.admins.len(),
        conventions: docs.id_conventions.len(),
    };

    info!(
        target: "catalog_scrape::seed",
        "Seeded {} categories, {} subcategories, {} products, {} admins",
        summary.categories,
        summary.subcategories,
        summary.products,
        summary.admins
    );
    Ok(summary)
}

/// A product added after the initial seed
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: String,
    pub subcategory_id: String,
    pub product_name: String,
    pub product_title: String,
    pub product_description: String,
    pub image_urls: Vec<String>,
}

fn append_product_id(document: &mut Value, product_id: &str, now: &str) {
    let Some(object) = document.as_object_mut() else {
        return;
    };

    match object.get_mut("product_ids").and_then(Value::as_array_mut) {
        Some(ids) => ids.push(json!(product_id)),
        None => {
            object.insert("product_ids".into(), json!([product_id]));
        }
    }

    let count = object
        .get("product_count")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    object.insert("product_count".into(), json!(count + 1));
    object.insert("updated_at".into(), json!(now));
}

/// Insert a product under the next free product id and link it from its
/// category and subcategory. Returns the new id.
///
/// A missing parent is left alone with a warning.
pub async fn add_product(store: &DocumentStore, product: &NewProduct) -> Result<String> {
    let now = Utc::now().to_rfc3339();
    let mut tx = store.begin().await?;

    let id = store::next_id(&mut tx, &conventions::PRODUCTS).await?;
    let document = product_document(
        &id,
        &product.product_name,
        &product.product_title,
        &product.product_description,
        &product.image_urls,
        &product.category_id,
        &product.subcategory_id,
        &now,
    );
    store::insert_document(&mut tx, "products", &document).await?;

    for (collection, parent) in [
        ("categories", &product.category_id),
        ("subcategories", &product.subcategory_id),
    ] {
        let found = store::update_document(&mut tx, collection, parent, |doc| {
            append_product_id(doc, &id, &now);
        })
        .await?;
        if !found {
            warn!(
                target: "catalog_scrape::seed",
                "{collection}/{parent} does not exist; {id} is not linked from it"
            );
        }
    }

    tx.commit().await.context("Failed to commit new product")?;
    info!(target: "catalog_scrape::seed", "Added product {id}: {}", product.product_name);
    Ok(id)
}
