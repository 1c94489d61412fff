//! SQLite-backed document collections
//!
//! Each record is a JSON body stored under `(collection, id)`. Lookups the
//! storefront needs are covered by expression indexes on `json_extract`, and
//! product text goes into an FTS5 table.

use anyhow::{Context, Result};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use super::conventions::IdConvention;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    body TEXT NOT NULL,
    PRIMARY KEY (collection, id)
);

CREATE INDEX IF NOT EXISTS idx_categories_name
    ON documents(json_extract(body, '$.category_name')) WHERE collection = 'categories';

CREATE INDEX IF NOT EXISTS idx_subcategories_category
    ON documents(json_extract(body, '$.category_id')) WHERE collection = 'subcategories';
CREATE INDEX IF NOT EXISTS idx_subcategories_name
    ON documents(json_extract(body, '$.subcategory_name')) WHERE collection = 'subcategories';

CREATE INDEX IF NOT EXISTS idx_products_category
    ON documents(json_extract(body, '$.category_id')) WHERE collection = 'products';
CREATE INDEX IF NOT EXISTS idx_products_subcategory
    ON documents(json_extract(body, '$.subcategory_id')) WHERE collection = 'products';
CREATE INDEX IF NOT EXISTS idx_products_name
    ON documents(json_extract(body, '$.product_name')) WHERE collection = 'products';
CREATE INDEX IF NOT EXISTS idx_products_status
    ON documents(json_extract(body, '$.status')) WHERE collection = 'products';

CREATE UNIQUE INDEX IF NOT EXISTS idx_admins_username
    ON documents(json_extract(body, '$.username')) WHERE collection = 'admins';
CREATE INDEX IF NOT EXISTS idx_admins_role
    ON documents(json_extract(body, '$.role')) WHERE collection = 'admins';
CREATE INDEX IF NOT EXISTS idx_admins_active
    ON documents(json_extract(body, '$.is_active')) WHERE collection = 'admins';

CREATE VIRTUAL TABLE IF NOT EXISTS product_search USING fts5(
    id UNINDEXED,
    product_name,
    product_title,
    product_description
);
"#;

#[derive(Debug, Clone)]
pub struct DocumentStore {
    pool: SqlitePool,
}

impl DocumentStore {
    /// Open (or create) the database file.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open SQLite database {}", path.display()))?;

        Self::with_pool(pool).await
    }

    /// Private in-memory database; a single connection keeps it alive.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::query(SCHEMA_SQL)
            .execute(&pool)
            .await
            .context("Failed to initialize database schema")?;
        Ok(Self { pool })
    }

    /// Drop every document of the given collections.
    pub async fn clear(&self, collections: &[&str]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        clear_collections(&mut tx, collections).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Insert documents keyed by their `_id`, all or nothing.
    pub async fn insert_many(&self, collection: &str, documents: &[Value]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        for document in documents {
            insert_document(&mut tx, collection, document).await?;
        }
        tx.commit().await?;
        Ok(documents.len())
    }

    pub async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT body FROM documents WHERE collection = ? AND id = ?")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .context("Failed to load document")?;

        row.map(|(body,)| serde_json::from_str(&body).context("Stored document is not JSON"))
            .transpose()
    }

    pub async fn count(&self, collection: &str) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM documents WHERE collection = ?")
                .bind(collection)
                .fetch_one(&self.pool)
                .await
                .context("Failed to count documents")?;
        Ok(count)
    }

    /// Ids of products whose name, title or description match an FTS5 query.
    pub async fn search_products(&self, query: &str) -> Result<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT id FROM product_search WHERE product_search MATCH ? ORDER BY rank")
                .bind(query)
                .fetch_all(&self.pool)
                .await
                .context("Failed to search products")?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Next free id in `collection` according to its naming convention.
    pub async fn next_available_id(&self, convention: &IdConvention) -> Result<String> {
        let mut conn = self.pool.acquire().await?;
        next_id(&mut conn, convention).await
    }

    pub(crate) async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }
}

pub(crate) async fn next_id(
    conn: &mut sqlx::SqliteConnection,
    convention: &IdConvention,
) -> Result<String> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT id FROM documents WHERE collection = ? AND id LIKE ? || '%'")
            .bind(convention.collection)
            .bind(convention.prefix)
            .fetch_all(&mut *conn)
            .await
            .context("Failed to scan existing ids")?;

    let highest = rows
        .iter()
        .filter_map(|(id,)| id.strip_prefix(convention.prefix)?.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    Ok(convention.format(highest + 1))
}

pub(crate) async fn clear_collections(
    tx: &mut Transaction<'static, Sqlite>,
    collections: &[&str],
) -> Result<()> {
    for collection in collections {
        sqlx::query("DELETE FROM documents WHERE collection = ?")
            .bind(*collection)
            .execute(&mut **tx)
            .await
            .with_context(|| format!("Failed to clear {collection}"))?;
        if *collection == "products" {
            sqlx::query("DELETE FROM product_search")
                .execute(&mut **tx)
                .await
                .context("Failed to clear product search index")?;
        }
    }
    Ok(())
}

pub(crate) async fn insert_document(
    tx: &mut Transaction<'static, Sqlite>,
    collection: &str,
    document: &Value,
) -> Result<()> {
    let id = document
        .get("_id")
        .and_then(Value::as_str)
        .with_context(|| format!("{collection} document without a string _id"))?;

    sqlx::query("INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)")
        .bind(collection)
        .bind(id)
        .bind(document.to_string())
        .execute(&mut **tx)
        .await
        .with_context(|| format!("Failed to insert {collection}/{id}"))?;

    if collection == "products" {
        let text = |field: &str| {
            document
                .get(field)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        sqlx::query(
            "INSERT INTO product_search (id, product_name, product_title, product_description) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(text("product_name"))
        .bind(text("product_title"))
        .bind(text("product_description"))
        .execute(&mut **tx)
        .await
        .with_context(|| format!("Failed to index product {id}"))?;
    }

    Ok(())
}

/// Load, mutate and write back one document inside a transaction.
///
/// Returns `false` when the document does not exist.
pub(crate) async fn update_document<F>(
    tx: &mut Transaction<'static, Sqlite>,
    collection: &str,
    id: &str,
    mutate: F,
) -> Result<bool>
where
    F: FnOnce(&mut Value),
{
    let row: Option<(String,)> =
        sqlx::query_as("SELECT body FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
            .with_context(|| format!("Failed to load {collection}/{id}"))?;

    let Some((body,)) = row else {
        return Ok(false);
    };

    let mut document: Value = serde_json::from_str(&body).context("Stored document is not JSON")?;
    mutate(&mut document);

    sqlx::query("UPDATE documents SET body = ? WHERE collection = ? AND id = ?")
        .bind(document.to_string())
        .bind(collection)
        .bind(id)
        .execute(&mut **tx)
        .await
        .with_context(|| format!("Failed to update {collection}/{id}"))?;

    Ok(true)
}
