use std::cmp::Ordering;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::{
    pricing::ResolvedPrice,
    product::Product,
    promotion::{DiscountType, Promotion, TargetType},
};
use crate::engine::lifecycle::is_live;

/// Whether `promotion` is scoped to `product`, ignoring its status.
pub fn targets_product(promotion: &Promotion, product: &Product) -> bool {
    match promotion.target_type {
        TargetType::Global => true,
        TargetType::Product | TargetType::Service => promotion.target_id == Some(product.id),
    }
}

/// Amount `promotion` takes off `base_price`, never more than the base price.
pub fn discount_amount(promotion: &Promotion, base_price: Decimal) -> Decimal {
    let amount = match promotion.discount_type {
        DiscountType::Percentage => {
            let rate = promotion.discount_value / Decimal::ONE_HUNDRED;
            base_price.checked_mul(rate).unwrap_or(base_price)
        }
        DiscountType::FixedAmount => promotion.discount_value,
    };

    amount.clamp(Decimal::ZERO, base_price.max(Decimal::ZERO))
}

/// Resolve the effective price of `product` on `today`.
///
/// Among the live promotions targeting the product the largest discount
/// wins. Equal discounts go to the earliest start date, then to the lowest id.
pub fn resolve_price(
    product: &Product,
    promotions: &[Promotion],
    today: NaiveDate,
) -> ResolvedPrice {
    let winner = promotions
        .iter()
        .filter(|promotion| is_live(promotion, today) && targets_product(promotion, product))
        .map(|promotion| (promotion, discount_amount(promotion, product.base_price)))
        .max_by(|(a, a_amount), (b, b_amount)| rank(a, *a_amount, b, *b_amount));

    match winner {
        Some((promotion, amount)) => ResolvedPrice {
            product: product.clone(),
            effective_price: (product.base_price - amount).max(Decimal::ZERO),
            is_discounted: true,
            applied_promotion: Some(promotion.clone()),
            discount_end_date: Some(promotion.end_date),
        },
        None => ResolvedPrice {
            product: product.clone(),
            effective_price: product.base_price,
            is_discounted: false,
            applied_promotion: None,
            discount_end_date: None,
        },
    }
}

// Greater means preferred.
fn rank(a: &Promotion, a_amount: Decimal, b: &Promotion, b_amount: Decimal) -> Ordering {
    a_amount
        .cmp(&b_amount)
        .then_with(|| b.start_date.cmp(&a.start_date))
        .then_with(|| b.id.cmp(&a.id))
}
