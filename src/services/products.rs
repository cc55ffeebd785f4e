use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::pricing::ResolvedPrice;
use crate::domain::product::{Product, ProductListQuery};
use crate::engine::resolver::resolve_price;
use crate::forms::products::{AddProductForm, UploadProductsForm};
use crate::repository::{ProductReader, ProductWriter, PromotionReader};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the inventory grid.
#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    /// Optional category filter.
    pub category: Option<String>,
    /// Optional search string entered by the user.
    pub search: Option<String>,
}

/// Read-model rendered by the inventory grid.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub product: Product,
    #[serde(with = "rust_decimal::serde::float")]
    pub effective_price: Decimal,
    pub is_discounted: bool,
    pub formatted_price: String,
    /// Last day of the applied offer.
    pub end_date: Option<NaiveDate>,
    pub applied_promotion_id: Option<i64>,
    pub needs_restock: bool,
}

impl ProductView {
    fn from_resolved(resolved: ResolvedPrice, currency_prefix: &str) -> Self {
        let ResolvedPrice {
            product,
            effective_price,
            is_discounted,
            applied_promotion,
            discount_end_date,
        } = resolved;

        Self {
            needs_restock: product.needs_restock(),
            formatted_price: format_price(effective_price, currency_prefix),
            product,
            effective_price,
            is_discounted,
            end_date: discount_end_date,
            applied_promotion_id: applied_promotion.map(|promotion| promotion.id),
        }
    }
}

/// Loads the inventory grid with prices resolved against the current promotions.
///
/// Promotions are read once per call so every row sees the same snapshot.
pub fn load_inventory<R>(
    repo: &R,
    query: InventoryQuery,
    today: NaiveDate,
    currency_prefix: &str,
) -> ServiceResult<Vec<ProductView>>
where
    R: ProductReader + PromotionReader + ?Sized,
{
    let mut list_query = ProductListQuery::new();

    if let Some(category) = query.category.as_ref() {
        list_query = list_query.category(category);
    }

    if let Some(search) = query.search.as_ref() {
        list_query = list_query.search(search);
    }

    let products = repo.list_products(list_query)?;
    let promotions = repo.list_promotions()?;

    Ok(products
        .iter()
        .map(|product| {
            ProductView::from_resolved(resolve_price(product, &promotions, today), currency_prefix)
        })
        .collect())
}

/// Resolves the effective price of a single product.
pub fn resolve_product_price<R>(
    repo: &R,
    product_id: i64,
    today: NaiveDate,
) -> ServiceResult<ResolvedPrice>
where
    R: ProductReader + PromotionReader + ?Sized,
{
    let product = repo
        .get_product_by_id(product_id)?
        .ok_or(ServiceError::NotFound)?;
    let promotions = repo.list_promotions()?;

    Ok(resolve_price(&product, &promotions, today))
}

/// Registers a new product.
pub fn create_product<R>(repo: &R, form: AddProductForm) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    let payload = form
        .into_new_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let created = repo.create_product(&payload)?;
    log::info!("Registered product {} ({})", created.id, created.name);

    Ok(created)
}

/// Imports products from an uploaded CSV file.
pub fn import_products<R>(repo: &R, form: UploadProductsForm) -> ServiceResult<usize>
where
    R: ProductWriter + ?Sized,
{
    let file_name = form.file_name.clone().unwrap_or_default();
    let payloads = form.into_new_products().map_err(|err| {
        log::warn!("Rejected product upload `{file_name}`: {err}");
        ServiceError::Form(err.to_string())
    })?;

    let created = repo.create_products(&payloads)?;
    log::info!("Imported {created} products from `{file_name}`");

    Ok(created)
}

/// Render `amount` with two decimals and comma thousands separators,
/// e.g. `Rs. 20,000.00`.
pub fn format_price(amount: Decimal, currency_prefix: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let digits = format!("{:.2}", rounded.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, ch) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let prefix = currency_prefix.trim();
    if prefix.is_empty() {
        format!("{sign}{grouped}.{fraction}")
    } else {
        format!("{prefix} {sign}{grouped}.{fraction}")
    }
}
