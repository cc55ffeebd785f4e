use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reorder threshold applied when a product is registered without one.
pub const DEFAULT_REORDER_LEVEL: u32 = 5;

/// Highest base price accepted for a catalog item (1,000,000,000).
pub const MAX_BASE_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

fn default_reorder_level() -> u32 {
    DEFAULT_REORDER_LEVEL
}

/// Domain representation of a catalog item (product or service line).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i64,
    /// Human-readable name of the product.
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Free-form category label, e.g. `POWER TOOLS`.
    pub category: String,
    /// Selling price before any promotion is applied.
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    /// Units currently in stock.
    pub stock_quantity: u32,
    /// Stock level at or below which the product should be reordered.
    #[serde(default = "default_reorder_level")]
    pub reorder_level: u32,
    /// Opaque image reference resolved by the presentation layer.
    #[serde(default)]
    pub image_url: String,
}

impl Product {
    /// Whether the base price lies in `(0, MAX_BASE_PRICE]`.
    pub fn has_valid_base_price(&self) -> bool {
        self.base_price > Decimal::ZERO && self.base_price <= MAX_BASE_PRICE
    }

    /// Whether stock has fallen to the reorder threshold.
    pub fn needs_restock(&self) -> bool {
        self.stock_quantity <= self.reorder_level
    }
}

/// Payload required to register a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: String,
    pub base_price: Decimal,
    pub stock_quantity: u32,
    pub reorder_level: u32,
    pub image_url: String,
}

impl NewProduct {
    /// Build a new product payload with the default reorder level and no image.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        base_price: Decimal,
        stock_quantity: u32,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: category.into(),
            base_price,
            stock_quantity,
            reorder_level: DEFAULT_REORDER_LEVEL,
            image_url: String::new(),
        }
    }

    /// Override the reorder threshold.
    pub fn with_reorder_level(mut self, reorder_level: u32) -> Self {
        self.reorder_level = reorder_level;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach an image reference to the product payload.
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Materialize the payload as a stored product with the given id.
    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            base_price: self.base_price,
            stock_quantity: self.stock_quantity,
            reorder_level: self.reorder_level,
            image_url: self.image_url,
        }
    }
}

/// Query definition used to list catalog products.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductListQuery {
    /// Optional exact category filter (case-insensitive).
    pub category: Option<String>,
    /// Optional case-insensitive substring match on the name.
    pub search: Option<String>,
}

impl ProductListQuery {
    /// Construct a query that targets every product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the results to a single category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Filter the results by a search term applied to the name.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Whether `product` satisfies every filter of the query.
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|category| product.category.eq_ignore_ascii_case(category.trim()));

        let search_ok = self.search.as_deref().is_none_or(|term| {
            product
                .name
                .to_lowercase()
                .contains(&term.trim().to_lowercase())
        });

        category_ok && search_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drill() -> Product {
        NewProduct::new("Cordless Drill", "POWER TOOLS", Decimal::from(25_000), 3).into_product(1)
    }

    #[test]
    fn new_product_defaults_reorder_level() {
        let payload = NewProduct::new("Gloves", "SAFETY GEAR", Decimal::from(900), 40);
        assert_eq!(payload.reorder_level, DEFAULT_REORDER_LEVEL);
        assert!(payload.image_url.is_empty());
    }

    #[test]
    fn needs_restock_at_or_below_threshold() {
        let mut product = drill();
        assert!(product.needs_restock());

        product.stock_quantity = product.reorder_level;
        assert!(product.needs_restock());

        product.stock_quantity = product.reorder_level + 1;
        assert!(!product.needs_restock());
    }

    #[test]
    fn list_query_filters_by_category_and_search() {
        let product = drill();

        assert!(ProductListQuery::new().matches(&product));
        assert!(ProductListQuery::new().category("power tools").matches(&product));
        assert!(!ProductListQuery::new().category("SAFETY GEAR").matches(&product));
        assert!(ProductListQuery::new().search("drill").matches(&product));
        assert!(!ProductListQuery::new().search("saw").matches(&product));
    }

    #[test]
    fn product_missing_reorder_level_deserializes_with_default() {
        let payload = r#"{
            "id": 9,
            "name": "Angle Grinder",
            "category": "POWER TOOLS",
            "basePrice": 18500,
            "stockQuantity": 12
        }"#;

        let product: Product = serde_json::from_str(payload).expect("deserialize");

        assert_eq!(product.reorder_level, DEFAULT_REORDER_LEVEL);
        assert_eq!(product.base_price, Decimal::from(18_500));
        assert!(product.description.is_empty());
    }

    #[test]
    fn base_price_must_be_positive_and_capped() {
        let mut product = drill();
        assert!(product.has_valid_base_price());

        product.base_price = MAX_BASE_PRICE;
        assert!(product.has_valid_base_price());

        product.base_price = MAX_BASE_PRICE + Decimal::ONE;
        assert!(!product.has_valid_base_price());

        product.base_price = Decimal::ZERO;
        assert!(!product.has_valid_base_price());
    }
}
