//! Helpers for integration tests.
#![allow(dead_code)]

use std::io::Write;

use chrono::NaiveDate;
use tempfile::NamedTempFile;

use pushkind_promotions::repository::{CatalogSnapshot, MemoryRepository};

/// Catalog used by the integration tests. Evaluated against [`today`].
pub const CATALOG_JSON: &str = r#"{
  "products": [
    { "id": 1, "name": "Cordless Drill", "category": "POWER TOOLS", "basePrice": 25000, "stockQuantity": 3 },
    { "id": 2, "name": "Hammer", "category": "HAND TOOLS", "basePrice": 1000, "stockQuantity": 40, "reorderLevel": 10 },
    { "id": 3, "name": "Installation", "category": "SERVICES", "basePrice": 200, "stockQuantity": 0, "reorderLevel": 0 }
  ],
  "promotions": [
    { "id": 1, "name": "Drill week", "discountType": "PERCENTAGE", "discountValue": 20,
      "startDate": "2025-06-01", "endDate": "2025-06-30", "targetType": "PRODUCT", "targetId": 1, "active": true },
    { "id": 2, "name": "Flat 300", "discountType": "FIXED_AMOUNT", "discountValue": 300,
      "startDate": "2025-06-10", "endDate": "2025-06-20", "targetType": "GLOBAL", "active": true },
    { "id": 3, "name": "Summer sale", "discountType": "PERCENTAGE", "discountValue": 50,
      "startDate": "2025-07-01", "endDate": "2025-07-31", "targetType": "GLOBAL", "active": true },
    { "id": 4, "name": "Spring sale", "discountType": "PERCENTAGE", "discountValue": 90,
      "startDate": "2025-03-01", "endDate": "2025-03-31", "targetType": "GLOBAL", "active": true },
    { "id": 5, "name": "Paused", "discountType": "FIXED_AMOUNT", "discountValue": 5000,
      "startDate": "2025-06-01", "endDate": "2025-06-30", "targetType": "GLOBAL", "active": false }
  ]
}"#;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

/// Catalog snapshot written to a temporary file, removed on drop.
pub struct TestCatalog {
    file: NamedTempFile,
}

impl TestCatalog {
    pub fn new() -> Self {
        let mut file = NamedTempFile::new().expect("Failed to create temporary catalog.");
        file.write_all(CATALOG_JSON.as_bytes())
            .expect("Failed to write temporary catalog.");
        TestCatalog { file }
    }

    pub fn repository(&self) -> MemoryRepository {
        let snapshot =
            CatalogSnapshot::from_path(self.file.path()).expect("Failed to read catalog.");
        MemoryRepository::from_snapshot(snapshot).expect("Failed to seed repository.")
    }
}
