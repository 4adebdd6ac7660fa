//! SQLite-backed [`ProductRepository`].

use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::error::ErrorKind;
use sqlx::SqlitePool;

use super::models::{Product, ProductDraft};
use super::store::{ProductRepository, StoreError};

/// Schema of the `products` table. Prices are stored as decimal text, scale kept.
pub(super) const CREATE_PRODUCTS_TABLE: &str = r#"
    CREATE TABLE products (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL CHECK (length(name) > 0),
        price       TEXT NOT NULL,
        description TEXT NOT NULL
    );
"#;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price: String,
    description: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Decimal::from_str(&row.price).map_err(|err| {
            StoreError::Unavailable(anyhow::anyhow!(
                "product {} has unreadable price '{}': {}",
                row.id,
                row.price,
                err
            ))
        })?;

        Ok(Product {
            id: row.id,
            name: row.name,
            price,
            description: row.description,
        })
    }
}

/// Map driver errors onto the store's two failure tiers.
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if matches!(
            db_err.kind(),
            ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation
        ) {
            return StoreError::Rejected {
                reason: db_err.message().to_string(),
            };
        }
    }
    StoreError::Unavailable(err.into())
}

#[derive(Clone)]
pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn all(&self) -> Result<Vec<Product>, StoreError> {
        sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price, description FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?
        .into_iter()
        .map(Product::try_from)
        .collect()
    }

    async fn find(&self, id: i64) -> Result<Option<Product>, StoreError> {
        sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price, description FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?
        .map(Product::try_from)
        .transpose()
    }

    async fn insert(&self, draft: &ProductDraft) -> Result<Product, StoreError> {
        let result = sqlx::query("INSERT INTO products (name, price, description) VALUES (?, ?, ?)")
            .bind(&draft.name)
            .bind(draft.price.to_string())
            .bind(&draft.description)
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        Ok(Product::from_draft(result.last_insert_rowid(), draft.clone()))
    }

    async fn update(&self, product: &Product) -> Result<u64, StoreError> {
        let result =
            sqlx::query("UPDATE products SET name = ?, price = ?, description = ? WHERE id = ?")
                .bind(&product.name)
                .bind(product.price.to_string())
                .bind(&product.description)
                .bind(product.id)
                .execute(&self.pool)
                .await
                .map_err(classify)?;

        Ok(result.rows_affected())
    }

    async fn remove(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: i64) -> Result<bool, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;

        Ok(count > 0)
    }
}
