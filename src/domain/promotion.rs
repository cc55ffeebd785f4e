use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the discount value of a promotion is interpreted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    /// `discount_value` is a percentage of the base price in `(0, 100]`.
    Percentage,
    /// `discount_value` is an absolute amount taken off the base price.
    FixedAmount,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "PERCENTAGE",
            DiscountType::FixedAmount => "FIXED_AMOUNT",
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scope a promotion applies to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    /// Every item in the catalog.
    Global,
    /// A single product line identified by `target_id`.
    Product,
    /// A single service line identified by `target_id`.
    Service,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Global => "GLOBAL",
            TargetType::Product => "PRODUCT",
            TargetType::Service => "SERVICE",
        }
    }

    /// Whether promotions of this scope must reference a catalog entry.
    pub fn requires_target(&self) -> bool {
        !matches!(self, TargetType::Global)
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime status derived from a promotion's dates, its enable flag and the
/// current date. Never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromotionStatus {
    Scheduled,
    Active,
    Expired,
    Disabled,
}

impl PromotionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromotionStatus::Scheduled => "SCHEDULED",
            PromotionStatus::Active => "ACTIVE",
            PromotionStatus::Expired => "EXPIRED",
            PromotionStatus::Disabled => "DISABLED",
        }
    }
}

impl fmt::Display for PromotionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain representation of a stored promotion campaign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    /// Repository-assigned identifier, immutable after creation.
    pub id: i64,
    /// Display label of the campaign.
    pub name: String,
    /// Interpretation of `discount_value`.
    pub discount_type: DiscountType,
    /// Percentage or absolute amount, depending on `discount_type`.
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_value: Decimal,
    /// First calendar day the campaign applies (inclusive).
    pub start_date: NaiveDate,
    /// Last calendar day the campaign applies (inclusive).
    pub end_date: NaiveDate,
    /// Scope of the campaign.
    pub target_type: TargetType,
    /// Targeted product or service; `None` for global campaigns.
    #[serde(default)]
    pub target_id: Option<i64>,
    /// Operator-controlled enable flag, independent of the date range.
    pub active: bool,
}

/// Validated promotion payload used for both creation and full-record updates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPromotion {
    pub name: String,
    pub discount_type: DiscountType,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_value: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub target_type: TargetType,
    #[serde(default)]
    pub target_id: Option<i64>,
    pub active: bool,
}

impl NewPromotion {
    /// Materialize the payload as a stored promotion with the given id.
    pub fn into_promotion(self, id: i64) -> Promotion {
        let NewPromotion {
            name,
            discount_type,
            discount_value,
            start_date,
            end_date,
            target_type,
            target_id,
            active,
        } = self;

        Promotion {
            id,
            name,
            discount_type,
            discount_value,
            start_date,
            end_date,
            target_type,
            target_id,
            active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_use_screaming_snake_case_on_the_wire() {
        let value = serde_json::to_value(DiscountType::FixedAmount).expect("serialize");
        assert_eq!(value, serde_json::json!("FIXED_AMOUNT"));

        let target: TargetType = serde_json::from_str("\"SERVICE\"").expect("deserialize");
        assert_eq!(target, TargetType::Service);

        assert_eq!(PromotionStatus::Disabled.to_string(), "DISABLED");
    }

    #[test]
    fn promotion_deserializes_from_dashboard_payload() {
        let payload = r#"{
            "id": 4,
            "name": "Avurudu Sale",
            "discountValue": 12.5,
            "discountType": "PERCENTAGE",
            "startDate": "2025-04-01",
            "endDate": "2025-04-20",
            "targetType": "GLOBAL",
            "targetId": null,
            "active": true
        }"#;

        let promotion: Promotion = serde_json::from_str(payload).expect("deserialize");

        assert_eq!(promotion.id, 4);
        assert_eq!(promotion.discount_value, Decimal::new(125, 1));
        assert_eq!(
            promotion.start_date,
            NaiveDate::from_ymd_opt(2025, 4, 1).expect("valid date")
        );
        assert!(promotion.target_id.is_none());
    }

    #[test]
    fn global_scope_does_not_require_target() {
        assert!(!TargetType::Global.requires_target());
        assert!(TargetType::Product.requires_target());
        assert!(TargetType::Service.requires_target());
    }
}
