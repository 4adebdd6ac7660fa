//! Product lifecycle on top of a [`ProductRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::models::{Product, ProductDraft};

/// Outcome of a failed store operation.
///
/// `NotFound` and `Rejected` are recoverable and rendered to the caller;
/// `Conflict` and `Unavailable` are fatal.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("product not found")]
    NotFound,

    /// A write matched no row although the row still exists.
    #[error("product {id} was modified concurrently")]
    Conflict { id: i64 },

    #[error("product could not be saved: {reason}")]
    Rejected { reason: String },

    #[error("product store unavailable")]
    Unavailable(#[source] anyhow::Error),
}

impl StoreError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StoreError::NotFound | StoreError::Rejected { .. })
    }
}

/// Persistence capability backing [`ProductStore`].
///
/// Implementations report constraint failures as [`StoreError::Rejected`] and
/// connectivity failures as [`StoreError::Unavailable`].
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every product, ascending by id
    async fn all(&self) -> Result<Vec<Product>, StoreError>;

    async fn find(&self, id: i64) -> Result<Option<Product>, StoreError>;

    /// Insert a new row and return it with its assigned id
    async fn insert(&self, draft: &ProductDraft) -> Result<Product, StoreError>;

    /// Overwrite the mutable fields of `product.id`, returning the rows affected
    async fn update(&self, product: &Product) -> Result<u64, StoreError>;

    /// Remove the row, returning whether one existed
    async fn remove(&self, id: i64) -> Result<bool, StoreError>;

    async fn exists(&self, id: i64) -> Result<bool, StoreError>;
}

/// CRUD entry point used by the HTTP handlers.
#[derive(Clone)]
pub struct ProductStore {
    repository: Arc<dyn ProductRepository>,
}

impl ProductStore {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<Product>, StoreError> {
        self.repository.all().await
    }

    /// Look up a product; an unset id is treated like a missing row.
    pub async fn get(&self, id: Option<i64>) -> Result<Product, StoreError> {
        let id = id.ok_or(StoreError::NotFound)?;
        self.repository
            .find(id)
            .await?
            .ok_or(StoreError::NotFound)
    }

    pub async fn create(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        match self.repository.insert(&draft).await {
            Ok(product) => {
                tracing::info!(product_id = product.id, "product created");
                Ok(product)
            }
            Err(err) => Err(rejected("create", err)),
        }
    }

    /// Replace every mutable field of product `id`.
    ///
    /// `product.id` must equal `id`; a mismatch is reported as not found and
    /// nothing is written.
    pub async fn update(&self, id: i64, product: &Product) -> Result<Product, StoreError> {
        if product.id != id {
            return Err(StoreError::NotFound);
        }

        let affected = match self.repository.update(product).await {
            Ok(affected) => affected,
            Err(err) => return Err(rejected("update", err)),
        };

        if affected == 0 {
            // Either deleted underneath us or a genuine write conflict
            if !self.exists(id).await? {
                return Err(StoreError::NotFound);
            }
            tracing::error!(product_id = id, "update matched no row although the product exists");
            return Err(StoreError::Conflict { id });
        }

        tracing::info!(product_id = id, "product updated");
        Ok(product.clone())
    }

    /// Remove product `id`; removing an absent product succeeds.
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        if self.repository.remove(id).await? {
            tracing::info!(product_id = id, "product deleted");
        } else {
            tracing::debug!(product_id = id, "delete of absent product ignored");
        }
        Ok(())
    }

    pub async fn exists(&self, id: i64) -> Result<bool, StoreError> {
        self.repository.exists(id).await
    }
}

/// Writes never crash the request: every failure becomes a recoverable rejection.
fn rejected(operation: &'static str, err: StoreError) -> StoreError {
    if matches!(err, StoreError::Rejected { .. }) {
        tracing::warn!(operation, error = %err, "product write rejected");
        return err;
    }

    tracing::warn!(operation, error = ?err, "product write failed");
    StoreError::Rejected {
        reason: err.to_string(),
    }
}
