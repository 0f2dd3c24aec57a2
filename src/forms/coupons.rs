use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::coupon::{NewCoupon, UpdateCoupon};
use crate::forms::{sanitize_description, sanitize_inline_text};

const CODE_MAX_LEN_VALIDATOR: u64 = 32;
const DESCRIPTION_MAX_LEN_VALIDATOR: u64 = 1024;

pub type CouponFormResult<T> = Result<T, CouponFormError>;

#[derive(Debug, Error)]
pub enum CouponFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("coupon code cannot be empty")]
    EmptyCode,
    #[error("discount must be a finite number")]
    InvalidDiscount,
}

/// Form payload emitted by the "Create coupon" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddCouponForm {
    #[validate(length(min = 1, max = CODE_MAX_LEN_VALIDATOR))]
    pub code: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount: f64,
    #[validate(range(min = 0))]
    #[serde(default, alias = "minAmount")]
    pub min_amount: i64,
    #[validate(range(min = 0))]
    #[serde(default, alias = "maxDiscount")]
    pub max_discount: i64,
    #[serde(alias = "expiryDate")]
    pub expiry_date: NaiveDate,
}

impl AddCouponForm {
    pub fn into_new_coupon(self, hub_id: i32) -> CouponFormResult<NewCoupon> {
        if !self.discount.is_finite() {
            return Err(CouponFormError::InvalidDiscount);
        }
        self.validate()?;

        let code: String = sanitize_inline_text(&self.code)
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .collect();
        if code.is_empty() {
            return Err(CouponFormError::EmptyCode);
        }

        let mut coupon = NewCoupon::new(hub_id, code, self.discount, self.expiry_date)
            .with_limits(self.min_amount, self.max_discount);
        if let Some(description) = sanitize_description(self.description.as_deref()) {
            coupon = coupon.with_description(description);
        }

        Ok(coupon)
    }
}

#[derive(Debug)]
pub struct EditCouponPayload {
    pub coupon_id: i32,
    pub update: UpdateCoupon,
}

/// Form payload emitted by the coupon edit modal.
#[derive(Debug, Deserialize, Validate)]
pub struct EditCouponForm {
    #[validate(range(min = 1))]
    #[serde(alias = "id")]
    pub coupon_id: i32,
    #[validate(length(min = 1, max = CODE_MAX_LEN_VALIDATOR))]
    pub code: String,
    #[validate(length(max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount: f64,
    #[validate(range(min = 0))]
    #[serde(default, alias = "minAmount")]
    pub min_amount: i64,
    #[validate(range(min = 0))]
    #[serde(default, alias = "maxDiscount")]
    pub max_discount: i64,
    #[serde(alias = "expiryDate")]
    pub expiry_date: NaiveDate,
}

impl EditCouponForm {
    pub fn into_update_coupon(self, hub_id: i32) -> CouponFormResult<EditCouponPayload> {
        self.validate()?;

        let coupon_id = self.coupon_id;
        let fields = AddCouponForm {
            code: self.code,
            description: self.description,
            discount: self.discount,
            min_amount: self.min_amount,
            max_discount: self.max_discount,
            expiry_date: self.expiry_date,
        };

        Ok(EditCouponPayload {
            coupon_id,
            update: UpdateCoupon::from_new(fields.into_new_coupon(hub_id)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(code: &str) -> AddCouponForm {
        AddCouponForm {
            code: code.to_string(),
            description: Some("  New  customers ".to_string()),
            discount: 10.0,
            min_amount: 1000,
            max_discount: 200,
            expiry_date: NaiveDate::from_ymd_opt(2030, 1, 1).expect("valid date"),
        }
    }

    #[test]
    fn coupon_code_is_compacted_and_uppercased() {
        let coupon = fields(" welcome 10 ").into_new_coupon(2).expect("valid coupon");

        assert_eq!(coupon.code, "WELCOME10");
        assert_eq!(coupon.description.as_deref(), Some("New customers"));
        assert_eq!(coupon.min_amount, 1000);
    }

    #[test]
    fn edit_form_carries_identifier() {
        let fields = fields("save5");
        let form = EditCouponForm {
            coupon_id: 4,
            code: fields.code,
            description: fields.description,
            discount: fields.discount,
            min_amount: fields.min_amount,
            max_discount: fields.max_discount,
            expiry_date: fields.expiry_date,
        };

        let payload = form.into_update_coupon(2).expect("valid coupon");

        assert_eq!(payload.coupon_id, 4);
        assert_eq!(payload.update.code, "SAVE5");
    }

    #[test]
    fn negative_limits_are_rejected() {
        let mut form = fields("bad");
        form.max_discount = -5;

        assert!(matches!(
            form.into_new_coupon(1),
            Err(CouponFormError::Validation(_))
        ));
    }

    #[test]
    fn infinite_discount_is_rejected() {
        let mut form = fields("wild");
        form.discount = f64::INFINITY;

        assert!(matches!(
            form.into_new_coupon(1),
            Err(CouponFormError::InvalidDiscount)
        ));
    }
}
