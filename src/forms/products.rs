use std::io::Cursor;
use std::str::FromStr;

use csv::{StringRecord, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{DEFAULT_REORDER_LEVEL, MAX_BASE_PRICE, NewProduct};
use crate::forms::sanitize_inline_text;

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Maximum allowed length for a category label.
const CATEGORY_MAX_LEN: usize = 64;
const CATEGORY_MAX_LEN_VALIDATOR: u64 = CATEGORY_MAX_LEN as u64;

/// Maximum allowed length for a product description.
const DESCRIPTION_MAX_LEN_VALIDATOR: u64 = 2048;

/// Maximum allowed length for an image reference.
const IMAGE_URL_MAX_LEN_VALIDATOR: u64 = 2048;

/// Upper bound for stock and reorder quantities.
const MAX_QUANTITY: i64 = 1_000_000;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("product name cannot be empty")]
    EmptyName,
    /// The provided category is empty after sanitization.
    #[error("product category cannot be empty")]
    EmptyCategory,
    /// The base price is zero or negative.
    #[error("base price must be greater than zero, got {value}")]
    NonPositivePrice { value: Decimal },
    /// The base price exceeds the supported maximum.
    #[error("base price must not exceed {max}, got {value}", max = MAX_BASE_PRICE)]
    PriceTooHigh { value: Decimal },
    /// A quantity does not fit the supported range.
    #[error("invalid quantity {value}")]
    InvalidQuantity { value: i64 },
    /// The uploaded CSV is missing required columns.
    #[error(
        "upload is missing the required `name`, `category`, `base_price` or `stock_quantity` headers"
    )]
    MissingRequiredHeaders,
    /// A CSV row did not include a product name.
    #[error("row {row} is missing a product name")]
    UploadMissingName { row: usize },
    /// A CSV row did not include a category.
    #[error("row {row} is missing a category")]
    UploadMissingCategory { row: usize },
    /// A CSV row contained an unparsable or non-positive price.
    #[error("row {row} has invalid price `{value}`")]
    UploadInvalidPrice { row: usize, value: String },
    /// A CSV row contained an unparsable quantity.
    #[error("row {row} has invalid quantity `{value}`")]
    UploadInvalidQuantity { row: usize, value: String },
    /// The uploaded CSV did not contain any usable products.
    #[error("upload contains no products")]
    EmptyUpload,
    /// CSV parsing failures.
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Form payload emitted when submitting the "Register new stock" form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddProductForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub description: Option<String>,
    #[validate(length(min = 1, max = CATEGORY_MAX_LEN_VALIDATOR))]
    pub category: String,
    pub base_price: Decimal,
    #[validate(range(min = 0, max = MAX_QUANTITY))]
    pub stock_quantity: i64,
    #[validate(range(min = 0, max = MAX_QUANTITY))]
    #[serde(default)]
    pub reorder_level: Option<i64>,
    #[validate(length(max = IMAGE_URL_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub image_url: Option<String>,
}

impl AddProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self) -> ProductFormResult<NewProduct> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let category = sanitize_category(&self.category);
        if category.is_empty() {
            return Err(ProductFormError::EmptyCategory);
        }

        if self.base_price <= Decimal::ZERO {
            return Err(ProductFormError::NonPositivePrice {
                value: self.base_price,
            });
        }

        if self.base_price > MAX_BASE_PRICE {
            return Err(ProductFormError::PriceTooHigh {
                value: self.base_price,
            });
        }

        let stock_quantity = to_quantity(self.stock_quantity)?;
        let reorder_level = match self.reorder_level {
            Some(level) => to_quantity(level)?,
            None => DEFAULT_REORDER_LEVEL,
        };

        let mut product = NewProduct::new(name, category, self.base_price, stock_quantity)
            .with_reorder_level(reorder_level);

        if let Some(description) = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            product = product.with_description(description);
        }

        if let Some(image_url) = self
            .image_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            product = product.with_image_url(image_url);
        }

        Ok(product)
    }
}

/// Upload payload for bulk product registration.
#[derive(Debug)]
pub struct UploadProductsForm {
    /// Optional filename provided by the client.
    pub file_name: Option<String>,
    /// Raw CSV bytes received from the upload.
    pub bytes: Vec<u8>,
}

impl UploadProductsForm {
    /// Construct a new upload payload.
    pub fn new(file_name: Option<String>, bytes: Vec<u8>) -> Self {
        Self { file_name, bytes }
    }

    /// Parse the uploaded CSV and convert it into domain `NewProduct` values.
    pub fn into_new_products(self) -> ProductFormResult<Vec<NewProduct>> {
        let UploadProductsForm { bytes, .. } = self;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(Cursor::new(bytes));

        let headers = reader.headers()?.clone();
        let Some(indexes) = locate_product_headers(&headers) else {
            return Err(ProductFormError::MissingRequiredHeaders);
        };

        let mut products = Vec::new();

        for (index, row) in reader.records().enumerate() {
            let row_number = index + 2; // account for header row
            let record = row?;

            if record.iter().all(|field| field.is_empty()) {
                continue;
            }

            let name = sanitize_inline_text(field(&record, Some(indexes.name)));
            if name.is_empty() {
                return Err(ProductFormError::UploadMissingName { row: row_number });
            }

            let category = sanitize_category(field(&record, Some(indexes.category)));
            if category.is_empty() {
                return Err(ProductFormError::UploadMissingCategory { row: row_number });
            }

            let price_raw = field(&record, Some(indexes.base_price));
            let base_price = Decimal::from_str(price_raw)
                .ok()
                .filter(|price| *price > Decimal::ZERO && *price <= MAX_BASE_PRICE)
                .ok_or_else(|| ProductFormError::UploadInvalidPrice {
                    row: row_number,
                    value: price_raw.to_string(),
                })?;

            let stock_quantity = parse_quantity(field(&record, Some(indexes.stock_quantity)))
                .ok_or_else(|| ProductFormError::UploadInvalidQuantity {
                    row: row_number,
                    value: field(&record, Some(indexes.stock_quantity)).to_string(),
                })?;

            let reorder_raw = field(&record, indexes.reorder_level);
            let reorder_level = if reorder_raw.is_empty() {
                DEFAULT_REORDER_LEVEL
            } else {
                parse_quantity(reorder_raw).ok_or_else(|| {
                    ProductFormError::UploadInvalidQuantity {
                        row: row_number,
                        value: reorder_raw.to_string(),
                    }
                })?
            };

            let mut product = NewProduct::new(name, category, base_price, stock_quantity)
                .with_reorder_level(reorder_level);

            let description = field(&record, indexes.description);
            if !description.is_empty() {
                product = product.with_description(description);
            }

            let image_url = field(&record, indexes.image_url);
            if !image_url.is_empty() {
                product = product.with_image_url(image_url);
            }

            products.push(product);
        }

        if products.is_empty() {
            return Err(ProductFormError::EmptyUpload);
        }

        Ok(products)
    }
}

struct ProductHeaderIndexes {
    name: usize,
    category: usize,
    base_price: usize,
    stock_quantity: usize,
    reorder_level: Option<usize>,
    description: Option<usize>,
    image_url: Option<usize>,
}

fn locate_product_headers(headers: &StringRecord) -> Option<ProductHeaderIndexes> {
    Some(ProductHeaderIndexes {
        name: locate_header(headers, &["name"])?,
        category: locate_header(headers, &["category"])?,
        base_price: locate_header(headers, &["base_price", "baseprice", "price"])?,
        stock_quantity: locate_header(headers, &["stock_quantity", "stockquantity", "stock"])?,
        reorder_level: locate_header(headers, &["reorder_level", "reorderlevel"]),
        description: locate_header(headers, &["description"]),
        image_url: locate_header(headers, &["image_url", "imageurl"]),
    })
}

fn locate_header(headers: &StringRecord, candidates: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        candidates
            .iter()
            .any(|candidate| header.eq_ignore_ascii_case(candidate))
    })
}

fn field(record: &StringRecord, index: Option<usize>) -> &str {
    index.and_then(|idx| record.get(idx)).unwrap_or("")
}

fn parse_quantity(input: &str) -> Option<u32> {
    input
        .parse::<i64>()
        .ok()
        .filter(|value| (0..=MAX_QUANTITY).contains(value))
        .and_then(|value| u32::try_from(value).ok())
}

fn to_quantity(value: i64) -> ProductFormResult<u32> {
    u32::try_from(value).map_err(|_| ProductFormError::InvalidQuantity { value })
}

fn sanitize_category(input: &str) -> String {
    sanitize_inline_text(input).to_uppercase()
}
