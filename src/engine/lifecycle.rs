use chrono::NaiveDate;

use crate::domain::promotion::{Promotion, PromotionStatus};

/// Derive the runtime status of `promotion` on `today`.
///
/// The enable flag wins over the date range; both ends of the range are
/// inclusive.
pub fn promotion_status(promotion: &Promotion, today: NaiveDate) -> PromotionStatus {
    if !promotion.active {
        PromotionStatus::Disabled
    } else if today < promotion.start_date {
        PromotionStatus::Scheduled
    } else if today > promotion.end_date {
        PromotionStatus::Expired
    } else {
        PromotionStatus::Active
    }
}

/// Whether `promotion` takes part in price resolution on `today`.
pub fn is_live(promotion: &Promotion, today: NaiveDate) -> bool {
    promotion_status(promotion, today) == PromotionStatus::Active
}
