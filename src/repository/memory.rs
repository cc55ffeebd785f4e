use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    product::{NewProduct, Product, ProductListQuery},
    promotion::{NewPromotion, Promotion, TargetType},
};
use crate::engine::validation::{
    PromotionRequest, PromotionValidationError, ValidationMode, validate_promotion,
};
use crate::repository::{
    ProductReader, ProductWriter, PromotionReader, PromotionWriter, RepositoryError,
    RepositoryResult,
};

/// Serialized catalog used to seed a [`MemoryRepository`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub promotions: Vec<Promotion>,
}

/// Errors raised while loading a catalog snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate {kind} id {id} in snapshot")]
    DuplicateId { kind: &'static str, id: i64 },
    #[error("product {id} in snapshot has invalid base price {value}")]
    InvalidBasePrice { id: i64, value: Decimal },
    #[error("promotion {id} in snapshot is invalid: {source}")]
    InvalidPromotion {
        id: i64,
        source: PromotionValidationError,
    },
}

impl CatalogSnapshot {
    /// Parse a JSON snapshot from `reader`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parse the JSON snapshot stored at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

#[derive(Debug, Default)]
struct MemoryStore {
    products: BTreeMap<i64, Product>,
    promotions: BTreeMap<i64, Promotion>,
    last_product_id: i64,
    last_promotion_id: i64,
}

impl MemoryStore {
    fn next_product_id(&mut self) -> i64 {
        self.last_product_id += 1;
        self.last_product_id
    }

    fn next_promotion_id(&mut self) -> i64 {
        self.last_promotion_id += 1;
        self.last_promotion_id
    }
}

/// In-process repository keeping products and promotions behind a lock.
///
/// Writers are serialized; the last write wins. Cloning shares the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository seeded with the records of `snapshot`.
    ///
    /// Every record must satisfy the rules enforced on edit: positive prices,
    /// valid discount values and date ranges, and targets present in the
    /// snapshot. New ids continue after the highest id found in the snapshot.
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Result<Self, SnapshotError> {
        let mut store = MemoryStore::default();

        for product in snapshot.products {
            let id = product.id;
            if !product.has_valid_base_price() {
                return Err(SnapshotError::InvalidBasePrice {
                    id,
                    value: product.base_price,
                });
            }
            if store.products.insert(id, product).is_some() {
                return Err(SnapshotError::DuplicateId {
                    kind: "product",
                    id,
                });
            }
            store.last_product_id = store.last_product_id.max(id);
        }

        for promotion in snapshot.promotions {
            let id = promotion.id;
            let products = &store.products;
            let catalog = |_: TargetType, target_id: i64| products.contains_key(&target_id);
            validate_promotion(
                &PromotionRequest::from(&promotion),
                promotion.start_date,
                ValidationMode::Edit,
                &catalog,
            )
            .map_err(|source| SnapshotError::InvalidPromotion { id, source })?;

            if store.promotions.insert(id, promotion).is_some() {
                return Err(SnapshotError::DuplicateId {
                    kind: "promotion",
                    id,
                });
            }
            store.last_promotion_id = store.last_promotion_id.max(id);
        }

        Ok(Self {
            store: Arc::new(RwLock::new(store)),
        })
    }

    /// Copy the current contents into a snapshot.
    pub fn snapshot(&self) -> RepositoryResult<CatalogSnapshot> {
        let store = self.read()?;
        Ok(CatalogSnapshot {
            products: store.products.values().cloned().collect(),
            promotions: store.promotions.values().cloned().collect(),
        })
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, MemoryStore>> {
        self.store
            .read()
            .map_err(|err| RepositoryError::Unexpected(err.to_string()))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, MemoryStore>> {
        self.store
            .write()
            .map_err(|err| RepositoryError::Unexpected(err.to_string()))
    }
}

impl PromotionReader for MemoryRepository {
    fn get_promotion_by_id(&self, id: i64) -> RepositoryResult<Option<Promotion>> {
        Ok(self.read()?.promotions.get(&id).cloned())
    }

    fn list_promotions(&self) -> RepositoryResult<Vec<Promotion>> {
        Ok(self.read()?.promotions.values().cloned().collect())
    }
}

impl PromotionWriter for MemoryRepository {
    fn create_promotion(&self, new_promotion: &NewPromotion) -> RepositoryResult<Promotion> {
        let mut store = self.write()?;
        let id = store.next_promotion_id();
        let promotion = new_promotion.clone().into_promotion(id);
        store.promotions.insert(id, promotion.clone());
        Ok(promotion)
    }

    fn update_promotion(&self, id: i64, updates: &NewPromotion) -> RepositoryResult<Promotion> {
        let mut store = self.write()?;
        let slot = store
            .promotions
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = updates.clone().into_promotion(id);
        Ok(slot.clone())
    }

    fn set_promotion_active(&self, id: i64, active: bool) -> RepositoryResult<Promotion> {
        let mut store = self.write()?;
        let slot = store
            .promotions
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        slot.active = active;
        Ok(slot.clone())
    }

    fn delete_promotion(&self, id: i64) -> RepositoryResult<()> {
        self.write()?.promotions.remove(&id);
        Ok(())
    }
}

impl ProductReader for MemoryRepository {
    fn get_product_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>> {
        Ok(self
            .read()?
            .products
            .values()
            .filter(|product| query.matches(product))
            .cloned()
            .collect())
    }
}

impl ProductWriter for MemoryRepository {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product> {
        let mut store = self.write()?;
        let id = store.next_product_id();
        let product = new_product.clone().into_product(id);
        store.products.insert(id, product.clone());
        Ok(product)
    }

    fn create_products(&self, new_products: &[NewProduct]) -> RepositoryResult<usize> {
        let mut store = self.write()?;
        for new_product in new_products {
            let id = store.next_product_id();
            store
                .products
                .insert(id, new_product.clone().into_product(id));
        }
        Ok(new_products.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::promotion::DiscountType;

    fn new_promotion(name: &str) -> NewPromotion {
        NewPromotion {
            name: name.to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::from(10),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap_or_default(),
            target_type: TargetType::Global,
            target_id: None,
            active: true,
        }
    }

    #[test]
    fn ids_are_assigned_sequentially() {
        let repo = MemoryRepository::new();

        let first = repo.create_promotion(&new_promotion("A")).expect("create");
        let second = repo.create_promotion(&new_promotion("B")).expect("create");

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn update_keeps_id_and_replaces_fields() {
        let repo = MemoryRepository::new();
        let created = repo.create_promotion(&new_promotion("A")).expect("create");

        let mut updates = new_promotion("Renamed");
        updates.active = false;
        let updated = repo.update_promotion(created.id, &updates).expect("update");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Renamed");
        assert!(!updated.active);
    }

    #[test]
    fn update_and_toggle_unknown_id_return_not_found() {
        let repo = MemoryRepository::new();

        assert!(matches!(
            repo.update_promotion(5, &new_promotion("A")),
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            repo.set_promotion_active(5, false),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn delete_is_idempotent() {
        let repo = MemoryRepository::new();
        let created = repo.create_promotion(&new_promotion("A")).expect("create");

        repo.delete_promotion(created.id).expect("delete");
        repo.delete_promotion(created.id).expect("second delete");

        assert!(repo.get_promotion_by_id(created.id).expect("get").is_none());
    }

    #[test]
    fn snapshot_seeds_ids_after_highest_existing() {
        let snapshot = CatalogSnapshot {
            products: vec![
                NewProduct::new("Drill", "TOOLS", Decimal::from(100), 1).into_product(40),
            ],
            promotions: vec![new_promotion("Seeded").into_promotion(7)],
        };
        let repo = MemoryRepository::from_snapshot(snapshot).expect("seed");

        let product = repo
            .create_product(&NewProduct::new("Saw", "TOOLS", Decimal::from(50), 2))
            .expect("create");
        let promotion = repo.create_promotion(&new_promotion("New")).expect("create");

        assert_eq!(product.id, 41);
        assert_eq!(promotion.id, 8);
    }

    #[test]
    fn snapshot_rejects_duplicate_ids() {
        let snapshot = CatalogSnapshot {
            products: Vec::new(),
            promotions: vec![
                new_promotion("A").into_promotion(1),
                new_promotion("B").into_promotion(1),
            ],
        };

        assert!(matches!(
            MemoryRepository::from_snapshot(snapshot),
            Err(SnapshotError::DuplicateId {
                kind: "promotion",
                id: 1
            })
        ));
    }

    #[test]
    fn snapshot_rejects_promotion_for_unknown_target() {
        let mut promotion = new_promotion("Orphan");
        promotion.target_type = TargetType::Product;
        promotion.target_id = Some(99);
        let snapshot = CatalogSnapshot {
            products: Vec::new(),
            promotions: vec![promotion.into_promotion(3)],
        };

        assert!(matches!(
            MemoryRepository::from_snapshot(snapshot),
            Err(SnapshotError::InvalidPromotion {
                id: 3,
                source: PromotionValidationError::MissingOrInvalidTarget { .. }
            })
        ));
    }

    #[test]
    fn snapshot_rejects_non_positive_base_price() {
        let snapshot = CatalogSnapshot {
            products: vec![NewProduct::new("Drill", "TOOLS", Decimal::ZERO, 1).into_product(8)],
            promotions: Vec::new(),
        };

        assert!(matches!(
            MemoryRepository::from_snapshot(snapshot),
            Err(SnapshotError::InvalidBasePrice { id: 8, .. })
        ));
    }

    #[test]
    fn snapshot_accepts_promotions_that_started_in_the_past() {
        let mut promotion = new_promotion("Old");
        promotion.start_date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default();
        let snapshot = CatalogSnapshot {
            products: Vec::new(),
            promotions: vec![promotion.into_promotion(1)],
        };

        assert!(MemoryRepository::from_snapshot(snapshot).is_ok());
    }

    #[test]
    fn clones_share_the_store() {
        let repo = MemoryRepository::new();
        let clone = repo.clone();

        clone.create_promotion(&new_promotion("A")).expect("create");

        assert_eq!(repo.list_promotions().expect("list").len(), 1);
    }
}
