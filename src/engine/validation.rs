use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::promotion::{DiscountType, NewPromotion, Promotion, TargetType};

/// Upper bound for percentage discounts.
const MAX_PERCENTAGE: Decimal = Decimal::ONE_HUNDRED;

/// Business-rule violations detected while validating a promotion request.
///
/// Only the first failing rule is reported.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PromotionValidationError {
    #[error("discount value must be greater than zero, got {value}")]
    NonPositiveValue { value: Decimal },
    #[error("percentage discount cannot exceed 100, got {value}")]
    PercentageOutOfRange { value: Decimal },
    #[error("start date {start_date} is before today ({today})")]
    StartDateInPast {
        start_date: NaiveDate,
        today: NaiveDate,
    },
    #[error("end date {end_date} is before start date {start_date}")]
    EndBeforeStart {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    #[error("{target_type} promotions require an existing target")]
    MissingOrInvalidTarget {
        target_type: TargetType,
        target_id: Option<i64>,
    },
}

/// Whether a request creates a new promotion or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    /// Edits may keep a start date that already lies in the past.
    Edit,
}

/// Lookup used to check that a targeted product or service exists.
pub trait TargetCatalog {
    fn contains_target(&self, target_type: TargetType, id: i64) -> bool;
}

impl<F> TargetCatalog for F
where
    F: Fn(TargetType, i64) -> bool,
{
    fn contains_target(&self, target_type: TargetType, id: i64) -> bool {
        self(target_type, id)
    }
}

/// Sanitized promotion request awaiting business-rule validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionRequest {
    pub name: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub target_type: TargetType,
    pub target_id: Option<i64>,
    pub active: bool,
}

impl From<&Promotion> for PromotionRequest {
    fn from(promotion: &Promotion) -> Self {
        Self {
            name: promotion.name.clone(),
            discount_type: promotion.discount_type,
            discount_value: promotion.discount_value,
            start_date: promotion.start_date,
            end_date: promotion.end_date,
            target_type: promotion.target_type,
            target_id: promotion.target_id,
            active: promotion.active,
        }
    }
}

/// Validate a create or update request against the promotion rules.
///
/// Rules run in a fixed order and the first failure is returned. On success
/// the payload is normalized: global promotions lose their target id and new
/// promotions always start enabled.
pub fn validate_promotion<C>(
    request: &PromotionRequest,
    today: NaiveDate,
    mode: ValidationMode,
    catalog: &C,
) -> Result<NewPromotion, PromotionValidationError>
where
    C: TargetCatalog + ?Sized,
{
    let value = request.discount_value;

    if value <= Decimal::ZERO {
        return Err(PromotionValidationError::NonPositiveValue { value });
    }

    if request.discount_type == DiscountType::Percentage && value > MAX_PERCENTAGE {
        return Err(PromotionValidationError::PercentageOutOfRange { value });
    }

    if mode == ValidationMode::Create && request.start_date < today {
        return Err(PromotionValidationError::StartDateInPast {
            start_date: request.start_date,
            today,
        });
    }

    if request.end_date < request.start_date {
        return Err(PromotionValidationError::EndBeforeStart {
            start_date: request.start_date,
            end_date: request.end_date,
        });
    }

    let target_id = if request.target_type.requires_target() {
        match request.target_id {
            Some(id) if catalog.contains_target(request.target_type, id) => Some(id),
            other => {
                return Err(PromotionValidationError::MissingOrInvalidTarget {
                    target_type: request.target_type,
                    target_id: other,
                });
            }
        }
    } else {
        None
    };

    let active = match mode {
        ValidationMode::Create => true,
        ValidationMode::Edit => request.active,
    };

    Ok(NewPromotion {
        name: request.name.clone(),
        discount_type: request.discount_type,
        discount_value: value,
        start_date: request.start_date,
        end_date: request.end_date,
        target_type: request.target_type,
        target_id,
        active,
    })
}
