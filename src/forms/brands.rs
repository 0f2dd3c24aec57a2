use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::brand::{NewBrand, UpdateBrand};
use crate::forms::{sanitize_description, sanitize_inline_text};

const NAME_MAX_LEN_VALIDATOR: u64 = 128;
const DESCRIPTION_MAX_LEN_VALIDATOR: u64 = 2048;

pub type BrandFormResult<T> = Result<T, BrandFormError>;

#[derive(Debug, Error)]
pub enum BrandFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("brand name cannot be empty")]
    EmptyName,
}

/// Form payload emitted when submitting the "Add brand" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddBrandForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub description: Option<String>,
    /// Create the brand unlisted.
    #[serde(default)]
    pub is_deleted: bool,
}

impl AddBrandForm {
    pub fn into_new_brand(self, hub_id: i32) -> BrandFormResult<NewBrand> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(BrandFormError::EmptyName);
        }

        let mut new_brand = NewBrand::new(hub_id, name).unlisted(self.is_deleted);
        if let Some(description) = sanitize_description(self.description.as_deref()) {
            new_brand = new_brand.with_description(description);
        }

        Ok(new_brand)
    }
}

#[derive(Debug)]
pub struct EditBrandPayload {
    pub brand_id: i32,
    pub update: UpdateBrand,
}

/// Form payload emitted when editing a brand.
#[derive(Debug, Deserialize, Validate)]
pub struct EditBrandForm {
    #[validate(range(min = 1))]
    pub brand_id: i32,
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub description: Option<String>,
}

impl EditBrandForm {
    pub fn into_update_brand(self) -> BrandFormResult<EditBrandPayload> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(BrandFormError::EmptyName);
        }

        Ok(EditBrandPayload {
            brand_id: self.brand_id,
            update: UpdateBrand::new(
                name,
                sanitize_description(self.description.as_deref()),
                None,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_brand_form_keeps_listing_flag() {
        let form = AddBrandForm {
            name: " Seiko ".to_string(),
            description: None,
            is_deleted: true,
        };

        let brand = form.into_new_brand(3).expect("valid brand");

        assert_eq!(brand.name, "Seiko");
        assert!(brand.is_deleted);
    }

    #[test]
    fn edit_brand_form_rejects_invalid_id() {
        let form = EditBrandForm {
            brand_id: 0,
            name: "Casio".to_string(),
            description: None,
        };

        assert!(matches!(
            form.into_update_brand(),
            Err(BrandFormError::Validation(_))
        ));
    }
}
