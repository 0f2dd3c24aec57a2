use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::offer::{NewOffer, OfferScope, OfferType, UpdateOffer};
use crate::forms::sanitize_inline_text;

const NAME_MAX_LEN_VALIDATOR: u64 = 128;

pub type OfferFormResult<T> = Result<T, OfferFormError>;

#[derive(Debug, Error)]
pub enum OfferFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("offer name cannot be empty")]
    EmptyName,
    #[error("discount must be a finite number")]
    InvalidDiscount,
    #[error("unknown offer type `{0}`")]
    InvalidOfferType(String),
    #[error("failed to decode offer form: {0}")]
    Decode(#[from] serde::de::value::Error),
}

/// Offer form shared by creation and editing.
///
/// `references` repeats once per selected product or category, so the body is
/// decoded with `serde_html_form` rather than `web::Form`.
#[derive(Debug, Deserialize, Validate)]
pub struct OfferForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    #[serde(alias = "offerName")]
    pub name: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount: f64,
    #[serde(alias = "expireDate")]
    pub expire_date: NaiveDate,
    #[serde(alias = "offerType")]
    pub offer_type: String,
    #[serde(default)]
    pub references: Vec<i32>,
}

struct SanitizedOffer {
    name: String,
    scope: OfferScope,
}

impl OfferForm {
    /// Decode an `application/x-www-form-urlencoded` body.
    pub fn from_body(body: &[u8]) -> OfferFormResult<Self> {
        Ok(serde_html_form::from_bytes(body)?)
    }

    fn sanitize(&self) -> OfferFormResult<SanitizedOffer> {
        if !self.discount.is_finite() {
            return Err(OfferFormError::InvalidDiscount);
        }
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(OfferFormError::EmptyName);
        }

        let offer_type = OfferType::parse(&self.offer_type)
            .ok_or_else(|| OfferFormError::InvalidOfferType(self.offer_type.clone()))?;

        let mut references: Vec<i32> = self
            .references
            .iter()
            .copied()
            .filter(|id| *id > 0)
            .collect();
        references.sort_unstable();
        references.dedup();

        Ok(SanitizedOffer {
            name,
            scope: OfferScope::new(offer_type, references),
        })
    }

    pub fn into_new_offer(self, hub_id: i32) -> OfferFormResult<NewOffer> {
        let sanitized = self.sanitize()?;
        Ok(NewOffer::new(
            hub_id,
            sanitized.name,
            self.discount,
            self.expire_date,
            sanitized.scope,
        ))
    }

    pub fn into_update_offer(self) -> OfferFormResult<UpdateOffer> {
        let sanitized = self.sanitize()?;
        Ok(UpdateOffer::new(
            sanitized.name,
            self.discount,
            self.expire_date,
            sanitized.scope,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_references_are_decoded() {
        let body = b"name=Summer+Sale&discount=20&expire_date=2030-06-01&offer_type=category&references=3&references=1&references=3";

        let offer = OfferForm::from_body(body)
            .expect("decoded form")
            .into_new_offer(7)
            .expect("valid offer");

        assert_eq!(offer.hub_id, 7);
        assert_eq!(offer.name, "Summer Sale");
        assert_eq!(offer.scope, OfferScope::Categories(vec![1, 3]));
    }

    #[test]
    fn camel_case_fields_are_accepted() {
        let body = b"offerName=Flash&discount=5&expireDate=2030-01-01&offerType=product&references=9";

        let update = OfferForm::from_body(body)
            .expect("decoded form")
            .into_update_offer()
            .expect("valid offer");

        assert_eq!(update.scope, OfferScope::Products(vec![9]));
    }

    #[test]
    fn discount_above_hundred_is_rejected() {
        let form = OfferForm {
            name: "Too much".to_string(),
            discount: 150.0,
            expire_date: NaiveDate::from_ymd_opt(2030, 1, 1).expect("valid date"),
            offer_type: "product".to_string(),
            references: vec![1],
        };

        assert!(matches!(
            form.into_new_offer(1),
            Err(OfferFormError::Validation(_))
        ));
    }

    #[test]
    fn unknown_offer_type_is_rejected() {
        let form = OfferForm {
            name: "Brand day".to_string(),
            discount: 10.0,
            expire_date: NaiveDate::from_ymd_opt(2030, 1, 1).expect("valid date"),
            offer_type: "brand".to_string(),
            references: Vec::new(),
        };

        assert!(matches!(
            form.into_new_offer(1),
            Err(OfferFormError::InvalidOfferType(value)) if value == "brand"
        ));
    }

    #[test]
    fn nan_discount_is_rejected() {
        let body = b"name=Flash&discount=NaN&expire_date=2030-01-01&offer_type=product&references=1";
        let form = OfferForm::from_body(body).expect("decodes");
        assert!(form.discount.is_nan());

        assert!(matches!(
            form.into_new_offer(1),
            Err(OfferFormError::InvalidDiscount)
        ));
    }
}
