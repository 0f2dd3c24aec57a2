use std::fs;
use std::io;
use std::path::Path;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use chrono::Local;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{
    MAX_PRODUCT_IMAGES, NewProduct, Product, ProductAttributes, UpdateProduct, merge_image_slots,
};
use crate::forms::{parse_optional_id, sanitize_description, sanitize_inline_text};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN_VALIDATOR: u64 = 128;
/// Maximum allowed length for a product description.
const DESCRIPTION_MAX_LEN_VALIDATOR: u64 = 4096;
/// Maximum allowed length for free-text watch attributes.
const ATTRIBUTE_MAX_LEN_VALIDATOR: u64 = 64;

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
    /// A numeric field could not be parsed.
    #[error("invalid {field} `{value}`")]
    InvalidNumber { field: &'static str, value: String },
}

/// Validated product fields shared by the add and edit forms.
#[derive(Debug, Deserialize, Validate)]
pub struct ProductForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub category_id: i32,
    #[serde(default)]
    pub brand_id: Option<i32>,
    #[validate(range(min = 0))]
    pub price: i64,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock_quantity: i32,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub thickness: Option<f64>,
    #[validate(length(max = ATTRIBUTE_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub shape: Option<String>,
    #[validate(length(max = ATTRIBUTE_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub water_resistance: Option<String>,
    #[validate(length(max = ATTRIBUTE_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub warranty_period: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub strap_width: Option<f64>,
    #[serde(default)]
    pub is_listed: bool,
}

struct SanitizedProduct {
    name: String,
    description: Option<String>,
    attributes: ProductAttributes,
}

impl ProductForm {
    fn sanitize(&self) -> ProductFormResult<SanitizedProduct> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let inline = |value: &Option<String>| {
            value
                .as_deref()
                .map(sanitize_inline_text)
                .filter(|value| !value.is_empty())
        };

        Ok(SanitizedProduct {
            name,
            description: sanitize_description(self.description.as_deref()),
            attributes: ProductAttributes {
                thickness: self.thickness,
                shape: inline(&self.shape),
                water_resistance: inline(&self.water_resistance),
                warranty_period: inline(&self.warranty_period),
                strap_width: self.strap_width,
            },
        })
    }

    /// Validates the payload into a `NewProduct` carrying the stored image paths.
    pub fn into_new_product(
        self,
        hub_id: i32,
        images: Vec<String>,
    ) -> ProductFormResult<NewProduct> {
        let sanitized = self.sanitize()?;

        let mut new_product = NewProduct::new(hub_id, sanitized.name, self.category_id, self.price)
            .with_stock_quantity(self.stock_quantity)
            .with_attributes(sanitized.attributes)
            .with_images(images);
        new_product.is_listed = self.is_listed;

        if let Some(description) = sanitized.description {
            new_product = new_product.with_description(description);
        }
        if let Some(brand_id) = self.brand_id {
            new_product = new_product.with_brand_id(brand_id);
        }

        Ok(new_product)
    }

    /// Validates the payload into an `UpdateProduct` for `existing`.
    ///
    /// Uploaded images replace existing ones slot by slot.
    pub fn into_update_product(
        self,
        existing: &Product,
        uploaded: &[String],
    ) -> ProductFormResult<UpdateProduct> {
        let sanitized = self.sanitize()?;

        Ok(UpdateProduct {
            name: sanitized.name,
            description: sanitized.description,
            category_id: self.category_id,
            brand_id: self.brand_id,
            price: self.price,
            stock_quantity: self.stock_quantity,
            attributes: sanitized.attributes,
            images: merge_image_slots(uploaded, &existing.images),
            is_listed: self.is_listed,
            updated_at: Local::now().naive_utc(),
        })
    }
}

/// Multipart payload submitted by the product add and edit forms.
#[derive(MultipartForm)]
pub struct ProductUploadForm {
    pub name: Text<String>,
    pub description: Option<Text<String>>,
    pub category_id: Text<String>,
    pub brand_id: Option<Text<String>>,
    pub price: Text<String>,
    pub stock_quantity: Option<Text<String>>,
    pub thickness: Option<Text<String>>,
    pub shape: Option<Text<String>>,
    pub water_resistance: Option<Text<String>>,
    pub warranty_period: Option<Text<String>>,
    pub strap_width: Option<Text<String>>,
    pub is_listed: Option<Text<String>>,
    #[multipart(limit = "10MB")]
    pub images: Vec<TempFile>,
}

fn text(value: Option<Text<String>>) -> Option<String> {
    value
        .map(Text::into_inner)
        .filter(|value| !value.trim().is_empty())
}

fn parse_number<T: std::str::FromStr>(field: &'static str, raw: &str) -> ProductFormResult<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ProductFormError::InvalidNumber {
            field,
            value: raw.trim().to_string(),
        })
}

fn parse_optional_number<T: std::str::FromStr>(
    field: &'static str,
    raw: Option<String>,
) -> ProductFormResult<Option<T>> {
    raw.map(|value| parse_number(field, &value)).transpose()
}

impl ProductUploadForm {
    /// Split the multipart payload into the typed form and the non-empty uploads.
    pub fn into_parts(self) -> ProductFormResult<(ProductForm, Vec<TempFile>)> {
        let brand_id = text(self.brand_id);
        let brand_id =
            parse_optional_id(brand_id.as_deref()).map_err(|value| {
                ProductFormError::InvalidNumber {
                    field: "brand",
                    value,
                }
            })?;

        let is_listed = text(self.is_listed)
            .map(|value| matches!(value.trim(), "on" | "true" | "1"))
            .unwrap_or(false);

        let form = ProductForm {
            name: self.name.into_inner(),
            description: text(self.description),
            category_id: parse_number("category", &self.category_id)?,
            brand_id,
            price: parse_number("price", &self.price)?,
            stock_quantity: parse_optional_number("stock quantity", text(self.stock_quantity))?
                .unwrap_or(0),
            thickness: parse_optional_number("thickness", text(self.thickness))?,
            shape: text(self.shape),
            water_resistance: text(self.water_resistance),
            warranty_period: text(self.warranty_period),
            strap_width: parse_optional_number("strap width", text(self.strap_width))?,
            is_listed,
        };

        let uploads = self
            .images
            .into_iter()
            .filter(|file| file.size > 0)
            .take(MAX_PRODUCT_IMAGES)
            .collect();

        Ok((form, uploads))
    }
}

/// Copy uploaded images into `upload_dir` and return their public paths.
pub fn store_images(files: Vec<TempFile>, upload_dir: &Path) -> io::Result<Vec<String>> {
    fs::create_dir_all(upload_dir)?;

    let stamp = Local::now().format("%Y%m%d%H%M%S%3f").to_string();
    let mut stored = Vec::with_capacity(files.len());

    for (index, file) in files.into_iter().enumerate() {
        let extension = file
            .file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "bin".to_string());

        let file_name = format!("{stamp}-{index}.{extension}");
        fs::copy(file.file.path(), upload_dir.join(&file_name))?;
        stored.push(format!("/uploads/{file_name}"));
    }

    Ok(stored)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::NaiveDate;
    use tempfile::NamedTempFile;

    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            name: "  Chronograph   X ".to_string(),
            description: Some(" Steel case ".to_string()),
            category_id: 4,
            brand_id: Some(2),
            price: 1200,
            stock_quantity: 5,
            thickness: Some(11.5),
            shape: Some(" round ".to_string()),
            water_resistance: Some(" ".to_string()),
            warranty_period: None,
            strap_width: None,
            is_listed: true,
        }
    }

    fn existing_product(images: Vec<String>) -> Product {
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("valid datetime");
        Product {
            id: 9,
            hub_id: 1,
            name: "Old".to_string(),
            description: None,
            category_id: 4,
            brand_id: None,
            price: 1000,
            stock_quantity: 1,
            attributes: ProductAttributes::default(),
            images,
            is_listed: true,
            is_deleted: false,
            offer_id: None,
            discounted_price: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn new_product_is_sanitized() {
        let product = form()
            .into_new_product(1, vec!["/uploads/a.png".to_string()])
            .expect("valid product");

        assert_eq!(product.name, "Chronograph X");
        assert_eq!(product.description.as_deref(), Some("Steel case"));
        assert_eq!(product.brand_id, Some(2));
        assert_eq!(product.attributes.shape.as_deref(), Some("round"));
        assert!(product.attributes.water_resistance.is_none());
        assert_eq!(product.images, vec!["/uploads/a.png".to_string()]);
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut invalid = form();
        invalid.price = -1;

        assert!(matches!(
            invalid.into_new_product(1, Vec::new()),
            Err(ProductFormError::Validation(_))
        ));
    }

    #[test]
    fn update_merges_image_slots() {
        let existing = existing_product(vec![
            "/uploads/old-0.png".to_string(),
            "/uploads/old-1.png".to_string(),
        ]);

        let update = form()
            .into_update_product(&existing, &["/uploads/new-0.png".to_string()])
            .expect("valid update");

        assert_eq!(
            update.images,
            vec![
                "/uploads/new-0.png".to_string(),
                "/uploads/old-1.png".to_string()
            ]
        );
    }

    #[test]
    fn stored_images_keep_extension() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(b"png").expect("write image");

        let upload = TempFile {
            file,
            content_type: None,
            file_name: Some("dial.PNG".to_string()),
            size: 3,
        };

        let stored = store_images(vec![upload], dir.path()).expect("stored");

        assert_eq!(stored.len(), 1);
        assert!(stored[0].starts_with("/uploads/"));
        assert!(stored[0].ends_with(".png"));
    }
}
