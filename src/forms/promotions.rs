use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::promotion::{DiscountType, TargetType};
use crate::engine::validation::PromotionRequest;
use crate::forms::{empty_string_as_none_id, sanitize_inline_text};

/// Maximum allowed length for a promotion name.
const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Result type returned by the promotion form helpers.
pub type PromotionFormResult<T> = Result<T, PromotionFormError>;

/// Errors that can occur while processing promotion forms.
#[derive(Debug, Error)]
pub enum PromotionFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("promotion name cannot be empty")]
    EmptyName,
}

/// Form payload emitted by the "Create promotion" and "Edit promotion" modal.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PromotionForm {
    /// Campaign label entered by the operator.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    /// Percentage or absolute amount, accepted as a number or numeric string.
    pub discount_value: Decimal,
    pub discount_type: DiscountType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub target_type: TargetType,
    /// Targeted product or service id; blank input means none.
    #[serde(default, deserialize_with = "empty_string_as_none_id")]
    pub target_id: Option<i64>,
    /// Enable flag; when omitted the caller decides the default.
    #[serde(default)]
    pub active: Option<bool>,
}

impl PromotionForm {
    /// Validates and sanitizes the payload into an engine request.
    ///
    /// `default_active` is used when the form does not carry an enable flag.
    pub fn into_request(self, default_active: bool) -> PromotionFormResult<PromotionRequest> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(PromotionFormError::EmptyName);
        }

        Ok(PromotionRequest {
            name,
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            start_date: self.start_date,
            end_date: self.end_date,
            target_type: self.target_type,
            target_id: self.target_id,
            active: self.active.unwrap_or(default_active),
        })
    }
}
