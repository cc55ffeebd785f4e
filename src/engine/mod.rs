//! Pure promotion rules: request validation, lifecycle status and price
//! resolution. Nothing in here performs I/O or holds state.

pub mod lifecycle;
pub mod resolver;
pub mod validation;

pub use lifecycle::{is_live, promotion_status};
pub use resolver::{discount_amount, resolve_price, targets_product};
pub use validation::{
    PromotionRequest, PromotionValidationError, TargetCatalog, ValidationMode, validate_promotion,
};
