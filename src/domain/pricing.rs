use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{product::Product, promotion::Promotion};

/// Effective selling price of a product at a point in time.
///
/// Derived per call and never persisted or cached.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPrice {
    /// Product the price was resolved for.
    pub product: Product,
    /// Price after the winning promotion, or the base price when none applies.
    #[serde(with = "rust_decimal::serde::float")]
    pub effective_price: Decimal,
    /// Whether a promotion was applied.
    pub is_discounted: bool,
    /// Winning promotion, if any.
    pub applied_promotion: Option<Promotion>,
    /// Last day of the applied promotion.
    pub discount_end_date: Option<NaiveDate>,
}

impl ResolvedPrice {
    /// Amount taken off the base price.
    pub fn savings(&self) -> Decimal {
        self.product.base_price - self.effective_price
    }
}
