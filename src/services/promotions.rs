use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::promotion::{NewPromotion, Promotion, PromotionStatus, TargetType};
use crate::engine::lifecycle::promotion_status;
use crate::engine::validation::{PromotionRequest, ValidationMode, validate_promotion};
use crate::forms::promotions::PromotionForm;
use crate::repository::{ProductReader, PromotionReader, PromotionWriter};
use crate::services::{ServiceError, ServiceResult};

/// Promotion together with its status on the requested day.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PromotionView {
    #[serde(flatten)]
    pub promotion: Promotion,
    pub status: PromotionStatus,
}

/// Per-status counters shown above the campaign list.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PromotionSummary {
    pub total: usize,
    pub active: usize,
    pub scheduled: usize,
    pub expired: usize,
    pub disabled: usize,
}

impl PromotionSummary {
    fn record(&mut self, status: PromotionStatus) {
        self.total += 1;
        match status {
            PromotionStatus::Active => self.active += 1,
            PromotionStatus::Scheduled => self.scheduled += 1,
            PromotionStatus::Expired => self.expired += 1,
            PromotionStatus::Disabled => self.disabled += 1,
        }
    }
}

/// Data required to render the promotions dashboard.
#[derive(Debug, Serialize)]
pub struct PromotionsPageData {
    pub promotions: Vec<PromotionView>,
    pub summary: PromotionSummary,
}

/// Loads every promotion with its derived status.
pub fn load_promotions_page<R>(repo: &R, today: NaiveDate) -> ServiceResult<PromotionsPageData>
where
    R: PromotionReader + ?Sized,
{
    let promotions = repo.list_promotions()?;

    let mut summary = PromotionSummary::default();
    let promotions: Vec<PromotionView> = promotions
        .into_iter()
        .map(|promotion| {
            let status = promotion_status(&promotion, today);
            summary.record(status);
            PromotionView { promotion, status }
        })
        .collect();

    Ok(PromotionsPageData {
        promotions,
        summary,
    })
}

/// Validates and stores a new promotion. New promotions always start enabled.
pub fn create_promotion<R>(
    repo: &R,
    form: PromotionForm,
    today: NaiveDate,
) -> ServiceResult<Promotion>
where
    R: PromotionWriter + ProductReader + ?Sized,
{
    let payload = validate_form(repo, form, today, ValidationMode::Create, true)?;

    let created = repo.create_promotion(&payload)?;
    log::info!("Created promotion {} ({})", created.id, created.name);

    Ok(created)
}

/// Replaces every field of an existing promotion.
///
/// The start date may already lie in the past. When the form omits the
/// enable flag the stored value is kept.
pub fn update_promotion<R>(
    repo: &R,
    promotion_id: i64,
    form: PromotionForm,
    today: NaiveDate,
) -> ServiceResult<Promotion>
where
    R: PromotionReader + PromotionWriter + ProductReader + ?Sized,
{
    let existing = repo
        .get_promotion_by_id(promotion_id)?
        .ok_or(ServiceError::NotFound)?;

    let payload = validate_form(repo, form, today, ValidationMode::Edit, existing.active)?;

    let updated = repo.update_promotion(promotion_id, &payload)?;
    log::info!("Updated promotion {}", updated.id);

    Ok(updated)
}

/// Flips the enable flag of a promotion.
pub fn toggle_promotion<R>(repo: &R, promotion_id: i64) -> ServiceResult<Promotion>
where
    R: PromotionReader + PromotionWriter + ?Sized,
{
    let existing = repo
        .get_promotion_by_id(promotion_id)?
        .ok_or(ServiceError::NotFound)?;

    let updated = repo.set_promotion_active(promotion_id, !existing.active)?;
    log::info!(
        "Promotion {} is now {}",
        updated.id,
        if updated.active { "enabled" } else { "disabled" }
    );

    Ok(updated)
}

/// Deletes a promotion. Unknown ids are ignored.
pub fn delete_promotion<R>(repo: &R, promotion_id: i64) -> ServiceResult<()>
where
    R: PromotionWriter + ?Sized,
{
    repo.delete_promotion(promotion_id)?;
    log::info!("Deleted promotion {promotion_id}");
    Ok(())
}

fn validate_form<R>(
    repo: &R,
    form: PromotionForm,
    today: NaiveDate,
    mode: ValidationMode,
    default_active: bool,
) -> ServiceResult<NewPromotion>
where
    R: ProductReader + ?Sized,
{
    let request = form
        .into_request(default_active)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let known_target = lookup_target(repo, &request)?;
    let catalog = |_: TargetType, id: i64| known_target == Some(id);

    validate_promotion(&request, today, mode, &catalog).map_err(|err| {
        log::warn!("Rejected promotion `{}`: {err}", request.name);
        ServiceError::from(err)
    })
}

// Product and service lines share the catalog, so both target types resolve
// through the product reader.
fn lookup_target<R>(repo: &R, request: &PromotionRequest) -> ServiceResult<Option<i64>>
where
    R: ProductReader + ?Sized,
{
    match request.target_id {
        Some(id) if request.target_type.requires_target() => {
            Ok(repo.get_product_by_id(id)?.map(|product| product.id))
        }
        _ => Ok(None),
    }
}
