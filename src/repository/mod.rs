use thiserror::Error;

use crate::domain::{
    product::{NewProduct, Product, ProductListQuery},
    promotion::{NewPromotion, Promotion},
};

pub mod memory;

#[cfg(test)]
pub mod mock;

pub use memory::{CatalogSnapshot, MemoryRepository, SnapshotError};

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("unexpected repository error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Read-only operations over promotion records.
pub trait PromotionReader {
    fn get_promotion_by_id(&self, id: i64) -> RepositoryResult<Option<Promotion>>;
    fn list_promotions(&self) -> RepositoryResult<Vec<Promotion>>;
}

/// Write operations over promotion records.
pub trait PromotionWriter {
    fn create_promotion(&self, new_promotion: &NewPromotion) -> RepositoryResult<Promotion>;
    /// Replace every field of an existing promotion; the id is kept.
    fn update_promotion(&self, id: i64, updates: &NewPromotion) -> RepositoryResult<Promotion>;
    fn set_promotion_active(&self, id: i64, active: bool) -> RepositoryResult<Promotion>;
    /// Hard delete. Deleting an unknown id is not an error.
    fn delete_promotion(&self, id: i64) -> RepositoryResult<()>;
}

/// Read-only operations over catalog products.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i64) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
}

/// Write operations over catalog products.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn create_products(&self, new_products: &[NewProduct]) -> RepositoryResult<usize>;
}
